use axum::{body::Bytes, extract::State, http::HeaderMap, Json};
use service_core::error::AppError;
use validator::Validate;

use crate::{dtos::token::TokenRequest, models::Token, AppState};

/// `POST /v1/token`: exchange client credentials for a bearer token.
pub async fn issue_token(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Token>, AppError> {
    let request = TokenRequest::from_body(&headers, &body)?.with_basic_auth(&headers);
    request.validate()?;

    let token = state
        .auth
        .exchange(&request.client_id, &request.client_secret)?;

    Ok(Json(token))
}
