//! Transactional queries over the accounts table

use crate::domain::entities::Account;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

const ACCOUNT_COLUMNS: &str = "id, subject, email, display_name, login_method, picture_path, \
     bio, active, joined_at, last_login_at";

/// Look up an account by identity-provider subject.
pub async fn find_by_subject_tx(
    transaction: &mut Transaction<'_, Postgres>,
    subject: &str,
) -> std::result::Result<Option<Account>, sqlx::Error> {
    sqlx::query_as::<_, Account>(&format!(
        "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE subject = $1"
    ))
    .bind(subject)
    .fetch_optional(&mut **transaction)
    .await
}

/// Look up an account by subject and take a row lock on it.
///
/// Concurrent sign-ups for the same subject serialize on this lock, so
/// the refresh path never runs against a row another transaction is
/// still creating.
pub async fn find_by_subject_for_update_tx(
    transaction: &mut Transaction<'_, Postgres>,
    subject: &str,
) -> std::result::Result<Option<Account>, sqlx::Error> {
    sqlx::query_as::<_, Account>(&format!(
        "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE subject = $1 FOR UPDATE"
    ))
    .bind(subject)
    .fetch_optional(&mut **transaction)
    .await
}

/// Insert an account unless one with the same subject already exists.
///
/// Returns `None` when another transaction won the insert race; the
/// caller re-reads the surviving row in that case.
pub async fn insert_account_if_absent_tx(
    transaction: &mut Transaction<'_, Postgres>,
    account: &Account,
) -> std::result::Result<Option<Account>, sqlx::Error> {
    sqlx::query_as::<_, Account>(&format!(
        "INSERT INTO accounts ({ACCOUNT_COLUMNS}) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
         ON CONFLICT (subject) DO NOTHING \
         RETURNING {ACCOUNT_COLUMNS}"
    ))
    .bind(account.id)
    .bind(&account.subject)
    .bind(&account.email)
    .bind(&account.display_name)
    .bind(&account.login_method)
    .bind(&account.picture_path)
    .bind(&account.bio)
    .bind(account.active)
    .bind(account.joined_at)
    .bind(account.last_login_at)
    .fetch_optional(&mut **transaction)
    .await
}

/// Get an account by id.
pub async fn get_account_tx(
    transaction: &mut Transaction<'_, Postgres>,
    account_id: Uuid,
) -> std::result::Result<Option<Account>, sqlx::Error> {
    sqlx::query_as::<_, Account>(&format!(
        "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"
    ))
    .bind(account_id)
    .fetch_optional(&mut **transaction)
    .await
}

/// Refresh `last_login_at` to now and return the updated row.
pub async fn touch_last_login_tx(
    transaction: &mut Transaction<'_, Postgres>,
    account_id: Uuid,
) -> std::result::Result<Option<Account>, sqlx::Error> {
    sqlx::query_as::<_, Account>(&format!(
        "UPDATE accounts SET last_login_at = NOW() WHERE id = $1 RETURNING {ACCOUNT_COLUMNS}"
    ))
    .bind(account_id)
    .fetch_optional(&mut **transaction)
    .await
}

/// Update profile fields, keeping current values where `None` is given.
pub async fn update_profile_tx(
    transaction: &mut Transaction<'_, Postgres>,
    account_id: Uuid,
    display_name: Option<&str>,
    bio: Option<&str>,
) -> std::result::Result<Option<Account>, sqlx::Error> {
    sqlx::query_as::<_, Account>(&format!(
        "UPDATE accounts SET \
             display_name = COALESCE($2, display_name), \
             bio = COALESCE($3, bio) \
         WHERE id = $1 \
         RETURNING {ACCOUNT_COLUMNS}"
    ))
    .bind(account_id)
    .bind(display_name)
    .bind(bio)
    .fetch_optional(&mut **transaction)
    .await
}

/// Record where an account's profile picture now lives.
pub async fn set_picture_tx(
    transaction: &mut Transaction<'_, Postgres>,
    account_id: Uuid,
    picture_path: &str,
) -> std::result::Result<(), sqlx::Error> {
    sqlx::query("UPDATE accounts SET picture_path = $2 WHERE id = $1")
        .bind(account_id)
        .bind(picture_path)
        .execute(&mut **transaction)
        .await?;
    Ok(())
}

/// Soft-delete an account.
pub async fn deactivate_account_tx(
    transaction: &mut Transaction<'_, Postgres>,
    account_id: Uuid,
) -> std::result::Result<(), sqlx::Error> {
    sqlx::query("UPDATE accounts SET active = FALSE, last_login_at = NOW() WHERE id = $1")
        .bind(account_id)
        .execute(&mut **transaction)
        .await?;
    Ok(())
}

/// Deactivate every enrollment held by an account, returning how many
/// rows were affected.
pub async fn deactivate_enrollments_tx(
    transaction: &mut Transaction<'_, Postgres>,
    account_id: Uuid,
) -> std::result::Result<u64, sqlx::Error> {
    let result = sqlx::query("UPDATE enrollments SET active = FALSE WHERE account_id = $1 AND active")
        .bind(account_id)
        .execute(&mut **transaction)
        .await?;
    Ok(result.rows_affected())
}
