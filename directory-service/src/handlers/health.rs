use axum::{http::header, response::IntoResponse, Json};
use serde_json::json;

use crate::services::metrics as service_metrics;

pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "directory-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Prometheus text exposition.
pub async fn metrics() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        service_metrics::render(),
    )
}
