use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use service_core::error::AppError;
use validator::Validate;

/// Query-string extractor that also runs `validator` rules. Both parse and
/// validation failures are reported as `invalid_request`.
pub struct ValidatedQuery<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::InvalidRequest(anyhow::anyhow!(e.body_text())))?;

        value.validate()?;

        Ok(ValidatedQuery(value))
    }
}
