//! Account services
//!
//! Every function runs against the ambient request session: database
//! work joins the session's single transaction and commits or rolls
//! back with the request. Storage side effects are best-effort and never
//! fail the surrounding operation.

use tracing::warn;
use uuid::Uuid;

use hexagon_common::{ServiceError, ServiceResult};
use hexagon_context::ResourceSession;
use hexagon_identity::ClaimSet;

use crate::domain::entities::{picture_object_key, Account, GOOGLE_PROVIDER};
use crate::repository;

/// Sign-up input distilled from a verified token.
#[derive(Debug, Clone)]
pub struct SignUp {
    pub subject: String,
    pub email: String,
    pub display_name: String,
    pub login_method: String,
    pub picture_url: Option<String>,
}

impl From<&ClaimSet> for SignUp {
    fn from(claims: &ClaimSet) -> Self {
        Self {
            subject: claims.sub.clone(),
            email: claims.email.clone().unwrap_or_default(),
            display_name: claims.display_name(),
            login_method: claims.sign_in_provider().to_string(),
            picture_url: claims.picture.clone(),
        }
    }
}

/// Create an account for a first sign-up, or refresh the existing one.
///
/// The subject row is looked up under a row lock so concurrent sign-ups
/// for the same subject serialize; a lost insert race falls back to the
/// winner's row. Exactly one account per subject survives either way.
///
/// Google avatars are mirrored into our storage; other providers keep
/// the URL the token carried. A deactivated account cannot sign up
/// again and gets `Unauthorized`.
pub async fn sign_up(input: SignUp) -> ServiceResult<Account> {
    let session = ResourceSession::current()?;

    let existing = {
        let mut tx = session.tx().await?;
        repository::find_by_subject_for_update_tx(&mut tx, &input.subject).await?
    };
    if let Some(account) = existing {
        return refresh_returning_account(&session, account, &input).await;
    }

    let candidate = Account::new(
        input.subject.clone(),
        input.email.clone(),
        input.display_name.clone(),
        input.login_method.clone(),
    );
    let inserted = {
        let mut tx = session.tx().await?;
        repository::insert_account_if_absent_tx(&mut tx, &candidate).await?
    };

    let mut account = match inserted {
        Some(account) => account,
        None => {
            // Lost the insert race; the winner's committed row is
            // visible once our conflicting insert returns.
            let mut tx = session.tx().await?;
            return repository::find_by_subject_tx(&mut tx, &input.subject)
                .await?
                .ok_or_else(|| {
                    ServiceError::Internal(anyhow::anyhow!(
                        "account missing after sign-up insert conflict"
                    ))
                });
        }
    };

    if let Some(source_url) = input.picture_url.as_deref() {
        let stored = if account.login_method == GOOGLE_PROVIDER {
            mirror_profile_picture(&session, account.id, source_url).await
        } else {
            source_url.to_string()
        };
        let mut tx = session.tx().await?;
        repository::set_picture_tx(&mut tx, account.id, &stored).await?;
        account.picture_path = Some(stored);
    }

    Ok(account)
}

/// Refresh path of [`sign_up`] for an already-known subject.
async fn refresh_returning_account(
    session: &ResourceSession,
    account: Account,
    input: &SignUp,
) -> ServiceResult<Account> {
    if !account.active {
        return Err(ServiceError::Unauthorized(
            "account has been deactivated".to_string(),
        ));
    }

    let mut refreshed = {
        let mut tx = session.tx().await?;
        repository::touch_last_login_tx(&mut tx, account.id)
            .await?
            .unwrap_or(account)
    };

    // Re-mirror when the provider refreshed the avatar, or fill in a
    // picture the account never had.
    if let Some(source_url) = input.picture_url.as_deref() {
        if refreshed.picture_path.is_none() || refreshed.login_method == GOOGLE_PROVIDER {
            let stored = mirror_profile_picture(session, refreshed.id, source_url).await;
            let mut tx = session.tx().await?;
            repository::set_picture_tx(&mut tx, refreshed.id, &stored).await?;
            refreshed.picture_path = Some(stored);
        }
    }

    Ok(refreshed)
}

/// Authenticate an existing account by subject.
///
/// Unknown and deactivated subjects both get `Unauthorized`; a valid
/// token alone is not enough to act on the platform before sign-up.
pub async fn sign_in(subject: &str) -> ServiceResult<Account> {
    if subject.is_empty() {
        return Err(ServiceError::InvalidRequest("missing subject".to_string()));
    }

    let session = ResourceSession::current()?;
    let mut tx = session.tx().await?;

    let account = repository::find_by_subject_tx(&mut tx, subject)
        .await?
        .filter(|account| account.active)
        .ok_or_else(|| ServiceError::Unauthorized("account is not signed up".to_string()))?;

    let refreshed = repository::touch_last_login_tx(&mut tx, account.id)
        .await?
        .unwrap_or(account);
    Ok(refreshed)
}

/// Update the caller's profile fields. `None` keeps the current value.
pub async fn update_profile(
    account_id: Uuid,
    display_name: Option<&str>,
    bio: Option<&str>,
) -> ServiceResult<Account> {
    let session = ResourceSession::current()?;
    let mut tx = session.tx().await?;

    repository::update_profile_tx(&mut tx, account_id, display_name, bio)
        .await?
        .ok_or_else(|| ServiceError::NotFound("account not found".to_string()))
}

/// Withdraw an account: deactivate it and its enrollments, and drop the
/// mirrored profile picture from storage (best-effort).
pub async fn withdraw(account: &Account) -> ServiceResult<()> {
    let session = ResourceSession::current()?;

    {
        let mut tx = session.tx().await?;
        let released = repository::deactivate_enrollments_tx(&mut tx, account.id).await?;
        repository::deactivate_account_tx(&mut tx, account.id).await?;
        tracing::debug!(
            account_id = %account.id,
            enrollments_released = released,
            "account withdrawn"
        );
    }

    // An external picture URL has no mirrored object to clean up.
    if let Some(key) = account.picture_path.as_deref() {
        if !account.picture_is_external() {
            if let Err(error) = session.storage().delete(key).await {
                warn!(account_id = %account.id, %error, "failed to delete profile picture");
            }
        }
    }

    Ok(())
}

/// Download an avatar and store it under the public picture prefix.
///
/// Best-effort: any failure is logged and the source URL is returned,
/// so the profile still points at a picture.
async fn mirror_profile_picture(
    session: &ResourceSession,
    account_id: Uuid,
    source_url: &str,
) -> String {
    match fetch_picture(source_url).await {
        Ok((bytes, content_type)) => {
            let key = picture_object_key(account_id, source_url);
            match session
                .storage()
                .write(&key, &bytes, content_type.as_deref())
                .await
            {
                Ok(()) => key,
                Err(error) => {
                    warn!(%account_id, %error, "failed to store mirrored profile picture");
                    source_url.to_string()
                }
            }
        }
        Err(error) => {
            warn!(%account_id, %error, "failed to download profile picture");
            source_url.to_string()
        }
    }
}

async fn fetch_picture(source_url: &str) -> anyhow::Result<(Vec<u8>, Option<String>)> {
    let response = reqwest::get(source_url).await?.error_for_status()?;
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let bytes = response.bytes().await?;
    Ok((bytes.to_vec(), content_type))
}
