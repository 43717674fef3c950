//! Account-aware request extractors
//!
//! [`CurrentAccount`] is the authorization seam used by any handler that
//! needs a signed-in account: it verifies the bearer token and resolves
//! the active account behind it, refreshing `last_login_at` on the way.
//! [`MaybeAccount`] is the anonymous-tolerant variant for endpoints that
//! merely behave differently for signed-in callers.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use hexagon_common::ServiceError;
use hexagon_context::BearerClaims;

use crate::domain::entities::Account;
use crate::service;

/// The active account behind the request's bearer token.
///
/// Rejects with `Unauthorized` when the header is missing, the token
/// does not verify, or the subject has no active account.
pub struct CurrentAccount(pub Account);

impl<S> FromRequestParts<S> for CurrentAccount
where
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let BearerClaims(claims) = BearerClaims::from_request_parts(parts, state).await?;
        let account = service::sign_in(&claims.sub).await?;
        Ok(CurrentAccount(account))
    }
}

/// Like [`CurrentAccount`], but anonymous requests pass through.
///
/// No `Authorization` header and a token whose subject never signed up
/// both yield `None`. A header that is present but fails verification
/// still rejects; a garbage token is an error, not anonymity.
pub struct MaybeAccount(pub Option<Account>);

impl<S> FromRequestParts<S> for MaybeAccount
where
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if !parts.headers.contains_key(header::AUTHORIZATION) {
            return Ok(MaybeAccount(None));
        }

        let BearerClaims(claims) = BearerClaims::from_request_parts(parts, state).await?;
        match service::sign_in(&claims.sub).await {
            Ok(account) => Ok(MaybeAccount(Some(account))),
            Err(ServiceError::Unauthorized(_)) => Ok(MaybeAccount(None)),
            Err(other) => Err(other),
        }
    }
}
