use axum::http::{header, HeaderMap};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Deserialize;
use service_core::error::AppError;
use validator::Validate;

/// Body of `POST /v1/token`, as JSON or as an urlencoded form.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct TokenRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "client_id is required"))]
    pub client_id: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "client_secret is required"))]
    pub client_secret: String,
}

impl TokenRequest {
    /// Parse the request body according to its content type. An empty body
    /// is an empty request, to be completed from the Basic header.
    pub fn from_body(headers: &HeaderMap, body: &[u8]) -> Result<Self, AppError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        let content_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        if content_type.starts_with("application/json") {
            serde_json::from_slice(body)
                .map_err(|e| AppError::InvalidRequest(anyhow::anyhow!("Invalid JSON body: {}", e)))
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            serde_urlencoded::from_bytes(body)
                .map_err(|e| AppError::InvalidRequest(anyhow::anyhow!("Invalid form body: {}", e)))
        } else {
            Err(AppError::InvalidRequest(anyhow::anyhow!(
                "Unsupported content type {:?}",
                content_type
            )))
        }
    }

    /// Credentials in an `Authorization: Basic` header replace the body's.
    pub fn with_basic_auth(self, headers: &HeaderMap) -> Self {
        match basic_credentials(headers) {
            Some((client_id, client_secret)) => Self {
                client_id,
                client_secret,
            },
            None => self,
        }
    }
}

fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (id, secret) = decoded.split_once(':')?;
    Some((id.to_string(), secret.to_string()))
}
