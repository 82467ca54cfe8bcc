use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Machine-readable error codes carried in the `error` field of every
/// failure response.
pub mod codes {
    pub const INVALID_REQUEST: &str = "invalid_request";
    pub const INVALID_CLIENT: &str = "invalid_client";
    pub const INVALID_TOKEN: &str = "invalid_token";
    pub const UNSUPPORTED: &str = "unsupported";
    pub const TOO_MANY_REQUESTS: &str = "too_many_requests";
    pub const INTERNAL_ERROR: &str = "internal_error";
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    InvalidRequest(anyhow::Error),

    #[error("Validation error: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Invalid client: {0}")]
    InvalidClient(anyhow::Error),

    #[error("Invalid token: {0}")]
    InvalidToken(anyhow::Error),

    #[error("Unsupported: {0}")]
    Unsupported(anyhow::Error),

    #[error("Too many requests: {0}")]
    TooManyRequests(String, Option<u64>),

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

/// Wire shape of every failure response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_message: String,
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidRequest(_) | AppError::ValidationError(_) => codes::INVALID_REQUEST,
            AppError::InvalidClient(_) => codes::INVALID_CLIENT,
            AppError::InvalidToken(_) => codes::INVALID_TOKEN,
            AppError::Unsupported(_) => codes::UNSUPPORTED,
            AppError::TooManyRequests(_, _) => codes::TOO_MANY_REQUESTS,
            AppError::InternalError(_) | AppError::ConfigError(_) => codes::INTERNAL_ERROR,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidRequest(_) | AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidClient(_) | AppError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            AppError::Unsupported(_) => StatusCode::NOT_IMPLEMENTED,
            AppError::TooManyRequests(_, _) => StatusCode::TOO_MANY_REQUESTS,
            AppError::InternalError(_) | AppError::ConfigError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        let (error_message, retry_after) = match self {
            AppError::InvalidRequest(err)
            | AppError::InvalidClient(err)
            | AppError::InvalidToken(err)
            | AppError::Unsupported(err) => (err.to_string(), None),
            AppError::ValidationError(err) => (err.to_string(), None),
            AppError::TooManyRequests(msg, retry) => (msg, retry),
            AppError::InternalError(err) | AppError::ConfigError(err) => {
                // Details stay in the logs.
                tracing::error!(error = ?err, "Request failed with internal error");
                ("Internal server error".to_string(), None)
            }
        };

        let mut res = (
            status,
            Json(ErrorResponse {
                error: code.to_string(),
                error_message,
            }),
        )
            .into_response();

        if code == codes::INVALID_TOKEN {
            res.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static("Bearer error=\"invalid_token\""),
            );
        }

        if let Some(retry) = retry_after {
            res.headers_mut().insert(header::RETRY_AFTER, retry.into());
        }

        res
    }
}
