use service_core::error::AppError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("invalid cursor {0:?}")]
    InvalidCursor(String),

    /// Unknown client id and wrong secret deliberately share this variant.
    #[error("invalid client id or client secret")]
    InvalidClient,

    #[error(transparent)]
    InvalidToken(#[from] TokenRejection),

    #[error("{0} is not supported by this directory")]
    Unsupported(&'static str),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Why a presented bearer token was refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenRejection {
    #[error("missing access_token in header Authorization: Bearer <your_access_token>")]
    Missing,

    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("token signature is invalid")]
    BadSignature,

    #[error("token has expired")]
    Expired,

    #[error("token is not valid yet")]
    NotYetValid,

    #[error("unexpected token version")]
    WrongVersion,

    #[error("token has no subject")]
    MissingSubject,

    #[error("invalid client_id {0:?}")]
    UnknownSubject(String),
}

impl TokenRejection {
    /// Low-cardinality label for metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            TokenRejection::Missing => "missing",
            TokenRejection::Malformed(_) => "malformed",
            TokenRejection::BadSignature => "signature",
            TokenRejection::Expired => "expired",
            TokenRejection::NotYetValid => "not_yet_valid",
            TokenRejection::WrongVersion => "version",
            TokenRejection::MissingSubject => "subject",
            TokenRejection::UnknownSubject(_) => "unknown_subject",
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidCursor(_) => AppError::InvalidRequest(anyhow::anyhow!(err.to_string())),
            ServiceError::InvalidClient => AppError::InvalidClient(anyhow::anyhow!(err.to_string())),
            ServiceError::InvalidToken(reason) => AppError::InvalidToken(anyhow::Error::new(reason)),
            ServiceError::Unsupported(_) => AppError::Unsupported(anyhow::anyhow!(err.to_string())),
            ServiceError::Internal(e) => AppError::InternalError(e),
        }
    }
}
