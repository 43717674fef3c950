//! Account API handlers
//!
//! - POST /v1/session - sign up (or refresh) the token's account
//! - GET /v1/me - current profile
//! - PATCH /v1/me - update profile fields
//! - DELETE /v1/me - withdraw the account

use axum::{http::StatusCode, response::Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use hexagon_common::{ServiceResult, ValidatedJson};
use hexagon_context::{BearerClaims, ResourceSession};
use hexagon_storage::UrlOptions;

use crate::api::extract::CurrentAccount;
use crate::domain::entities::Account;
use crate::service::{self, SignUp};

/// Response for account operations
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub login_method: String,
    /// Browser-usable picture URL, resolved from storage when mirrored
    pub picture: Option<String>,
    pub bio: Option<String>,
    pub joined_at: DateTime<Utc>,
    pub last_login_at: DateTime<Utc>,
}

impl AccountResponse {
    /// Build the response, resolving a mirrored picture key into a URL
    /// through the session's storage backend.
    pub async fn build(account: Account) -> ServiceResult<Self> {
        let picture = match account.picture_path.as_deref() {
            Some(path) if path.starts_with("http") => Some(path.to_string()),
            Some(path) => {
                let session = ResourceSession::current()?;
                let url = session.storage().url_for(path, UrlOptions::default()).await?;
                Some(url)
            }
            None => None,
        };

        Ok(Self {
            id: account.id,
            email: account.email,
            display_name: account.display_name,
            login_method: account.login_method,
            picture,
            bio: account.bio,
            joined_at: account.joined_at,
            last_login_at: account.last_login_at,
        })
    }
}

/// Request for updating the caller's profile
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100))]
    pub display_name: Option<String>,

    #[validate(length(max = 2000))]
    pub bio: Option<String>,
}

/// POST /v1/session - Sign up, or refresh an existing account
///
/// Takes a verified token straight from the identity provider; this is
/// the only endpoint an account does not have to exist for yet.
pub async fn open_session(
    BearerClaims(claims): BearerClaims,
) -> ServiceResult<(StatusCode, Json<AccountResponse>)> {
    let account = service::sign_up(SignUp::from(&claims)).await?;
    let response = AccountResponse::build(account).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /v1/me - Current account profile
pub async fn get_profile(
    CurrentAccount(account): CurrentAccount,
) -> ServiceResult<Json<AccountResponse>> {
    Ok(Json(AccountResponse::build(account).await?))
}

/// PATCH /v1/me - Update profile fields
pub async fn update_profile(
    CurrentAccount(account): CurrentAccount,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> ServiceResult<Json<AccountResponse>> {
    let updated = service::update_profile(
        account.id,
        request.display_name.as_deref(),
        request.bio.as_deref(),
    )
    .await?;
    Ok(Json(AccountResponse::build(updated).await?))
}

/// DELETE /v1/me - Withdraw the account
pub async fn withdraw(CurrentAccount(account): CurrentAccount) -> ServiceResult<StatusCode> {
    service::withdraw(&account).await?;
    Ok(StatusCode::NO_CONTENT)
}
