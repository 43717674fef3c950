//! Enrollment services

use tracing::warn;
use uuid::Uuid;

use hexagon_accounts::Account;
use hexagon_common::{ServiceError, ServiceResult};
use hexagon_context::ResourceSession;

use crate::domain::entities::{Enrollment, EnrollmentStatus, EnrollmentSummary};
use crate::repository;

/// List the account's active enrollments with the total for paging.
pub async fn list_enrollments(
    account: &Account,
    status: Option<EnrollmentStatus>,
    offset: i64,
    limit: i64,
) -> ServiceResult<(Vec<EnrollmentSummary>, i64)> {
    let session = ResourceSession::current()?;
    let mut tx = session.tx().await?;

    let enrollments =
        repository::list_for_account_tx(&mut tx, account.id, status, offset, limit).await?;
    let total = repository::count_for_account_tx(&mut tx, account.id, status).await?;
    Ok((enrollments, total))
}

/// Get one of the account's enrollments.
pub async fn get_enrollment(account: &Account, enrollment_id: Uuid) -> ServiceResult<EnrollmentSummary> {
    let session = ResourceSession::current()?;
    let mut tx = session.tx().await?;

    repository::get_summary_for_account_tx(&mut tx, enrollment_id, account.id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("enrollment not found".to_string()))
}

/// Enroll the account into the class behind a class code.
///
/// The class row is locked for the duration of the transaction, so the
/// capacity check and the insert are atomic against other enrollments
/// into the same class. A duplicate active enrollment is rejected
/// whether it is seen up front or only at insert time.
pub async fn enroll_by_class_code(account: &Account, code: &str) -> ServiceResult<EnrollmentSummary> {
    let session = ResourceSession::current()?;

    let summary = {
        let mut tx = session.tx().await?;

        let class = repository::get_open_class_by_code_tx(&mut tx, code)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound("class not found or not open for enrollment".to_string())
            })?;

        if repository::exists_active_enrollment_tx(&mut tx, account.id, class.id).await? {
            return Err(ServiceError::InvalidRequest(
                "already enrolled in this class".to_string(),
            ));
        }

        let active = repository::count_active_for_class_tx(&mut tx, class.id).await?;
        if !class.has_capacity(active) {
            return Err(ServiceError::InvalidRequest("class is full".to_string()));
        }

        let enrollment = Enrollment::new_by_class_code(account.id, class.id);
        let inserted = repository::insert_enrollment_tx(&mut tx, &enrollment)
            .await?
            .ok_or_else(|| {
                ServiceError::InvalidRequest("already enrolled in this class".to_string())
            })?;

        repository::get_summary_tx(&mut tx, inserted.id)
            .await?
            .ok_or_else(|| {
                ServiceError::Internal(anyhow::anyhow!("enrollment missing right after insert"))
            })?
    };

    // Confirmation email; the enrollment stands even when sending fails.
    if let Err(error) = session
        .email()
        .send_enrollment_confirmation(
            &account.email,
            &account.display_name,
            &summary.course_title,
            &summary.class_code,
            summary.id,
        )
        .await
    {
        warn!(enrollment_id = %summary.id, %error, "failed to send enrollment confirmation");
    }

    Ok(summary)
}
