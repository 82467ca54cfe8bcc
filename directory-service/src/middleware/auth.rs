use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use service_core::error::AppError;

use crate::AppState;

const BEARER: &str = "Bearer";

/// Require a valid bearer token. The client id it resolves to is stored in
/// the request extensions for [`AuthenticatedClient`].
pub async fn bearer_auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(bearer_token)
        .unwrap_or_default();

    let client_id = state.auth.authenticate(token)?;

    tracing::debug!(client_id = %client_id, "Request authenticated");
    req.extensions_mut().insert(AuthenticatedClient(client_id));

    Ok(next.run(req).await)
}

/// The token part of an `Authorization` header value, or `""` when the
/// value does not use the Bearer scheme. The scheme is case-insensitive.
fn bearer_token(value: &str) -> &str {
    let scheme_len = BEARER.len();
    match (value.get(..scheme_len), value.get(scheme_len + 1..)) {
        (Some(scheme), Some(token)) if scheme.eq_ignore_ascii_case(BEARER) => token.trim(),
        _ => "",
    }
}

/// Client id of the caller, as resolved by [`bearer_auth_middleware`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedClient(pub String);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthenticatedClient
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedClient>()
            .cloned()
            .ok_or_else(|| {
                AppError::InternalError(anyhow::anyhow!(
                    "Authenticated client missing from request extensions"
                ))
            })
    }
}
