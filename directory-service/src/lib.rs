pub mod config;
pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod startup;
pub mod utils;

use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use service_core::middleware::{
    metrics::metrics_middleware,
    rate_limit::{ip_rate_limit_middleware, IpRateLimiter},
    recover::panic_response,
    security_headers::security_headers_middleware,
    tracing::{request_id_middleware, REQUEST_ID_HEADER},
};
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::config::DirectoryConfig;
use crate::services::{AuthService, DirectoryStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<DirectoryConfig>,
    pub auth: AuthService,
    pub directory: Arc<dyn DirectoryStore>,
    pub token_rate_limiter: IpRateLimiter,
}

pub fn build_router(state: AppState) -> Router {
    let token_route = Router::new()
        .route("/v1/token", post(handlers::issue_token))
        .layer(from_fn_with_state(
            state.token_rate_limiter.clone(),
            ip_rate_limit_middleware,
        ));

    let protected_routes = Router::new()
        .route("/v1/depts", get(handlers::list_departments))
        .route("/v1/depts/search", get(handlers::search_departments))
        .route("/v1/users", get(handlers::list_users_in_department))
        .route("/v1/users/search", get(handlers::search_users))
        .route("/v1/groups", get(handlers::list_groups))
        .route("/v1/groups/search", get(handlers::search_groups))
        .route("/v1/groups/users", get(handlers::list_users_in_group))
        .layer(from_fn_with_state(
            state.clone(),
            middleware::bearer_auth_middleware,
        ));

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics))
        .route("/v1/.well-known", get(handlers::well_known))
        .merge(token_route)
        .merge(protected_routes)
        .with_state(state)
        .layer(from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(
            |request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            },
        ))
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(CatchPanicLayer::custom(panic_response))
}
