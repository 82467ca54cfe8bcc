use crate::error::{ErrorResponse, codes};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::any::Any;

/// Panic handler for `tower_http::catch_panic::CatchPanicLayer::custom`.
///
/// Turns a panicking handler into the generic `internal_error` body instead
/// of tearing down the connection.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    tracing::error!(panic = %detail, "Handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: codes::INTERNAL_ERROR.to_string(),
            error_message: "Internal server error".to_string(),
        }),
    )
        .into_response()
}
