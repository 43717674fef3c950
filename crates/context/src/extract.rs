//! Authentication extractors
//!
//! [`BearerClaims`] verifies the request's bearer token against the
//! session's verifier and hands the handler its claims. Account lookup
//! is the accounts domain's business and layered on top of this.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderValue},
};

use hexagon_common::ServiceError;
use hexagon_identity::ClaimSet;

use crate::session::ResourceSession;

/// Verified claims from the request's `Authorization: Bearer` token.
pub struct BearerClaims(pub ClaimSet);

impl<S> FromRequestParts<S> for BearerClaims
where
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts.headers.get(header::AUTHORIZATION).ok_or_else(|| {
            ServiceError::Unauthorized("authorization header required".to_string())
        })?;
        let token = extract_bearer_token(header)?;
        let session = ResourceSession::current()?;
        let claims = session.verifier().verify(&token).await?;
        Ok(BearerClaims(claims))
    }
}

/// Extract the token from an `Authorization: Bearer ..` header value.
pub fn extract_bearer_token(header: &HeaderValue) -> Result<String, ServiceError> {
    let header_str = header.to_str().map_err(|_| {
        ServiceError::Unauthorized("invalid authorization header format".to_string())
    })?;

    if let Some(token) = header_str.strip_prefix("Bearer ") {
        Ok(token.to_string())
    } else {
        Err(ServiceError::Unauthorized(
            "invalid authorization header format".to_string(),
        ))
    }
}
