//! Axum extractors shared by the domain APIs

use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use validator::Validate;

use crate::ServiceError;

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 100;

/// Offset/limit query parameters for list endpoints.
///
/// Raw values are kept as sent; the accessors clamp, so a limit of 0 or
/// a negative offset can never reach a repository query.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub offset: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
}

impl Pagination {
    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }
}

/// JSON body extractor that runs `validator` rules before the handler
/// sees the value.
///
/// Both malformed JSON and failed validation surface as the same flat
/// `INVALID_REQUEST` body the rest of the error taxonomy produces, so
/// handlers take `ValidatedJson<T>` and never look at input errors.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ServiceError::InvalidRequest(e.body_text()))?;
        value
            .validate()
            .map_err(|e| ServiceError::InvalidRequest(format!("validation failed: {e}")))?;
        Ok(ValidatedJson(value))
    }
}
