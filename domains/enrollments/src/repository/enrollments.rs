//! Transactional queries over enrollments and course classes

use crate::domain::entities::{CourseClass, Enrollment, EnrollmentStatus, EnrollmentSummary};
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

const CLASS_COLUMNS: &str = "id, course_id, code, title, capacity, open_for_enrollment, active";

const ENROLLMENT_COLUMNS: &str =
    "id, account_id, class_id, status, method, enrolled_on, active, created_at";

const SUMMARY_SELECT: &str = "SELECT e.id, e.status, e.method, e.enrolled_on, e.created_at, \
            cc.code AS class_code, cc.title AS class_title, \
            c.slug AS course_slug, c.title AS course_title \
     FROM enrollments e \
     JOIN course_classes cc ON cc.id = e.class_id \
     JOIN courses c ON c.id = cc.course_id";

/// Find an enrollable class by its code and lock its row.
///
/// The lock serializes concurrent enrollments into the same class, so
/// the capacity count taken afterwards cannot be stale by commit time.
pub async fn get_open_class_by_code_tx(
    transaction: &mut Transaction<'_, Postgres>,
    code: &str,
) -> std::result::Result<Option<CourseClass>, sqlx::Error> {
    sqlx::query_as::<_, CourseClass>(&format!(
        "SELECT {CLASS_COLUMNS} FROM course_classes \
         WHERE code = $1 AND active AND open_for_enrollment \
         FOR UPDATE"
    ))
    .bind(code)
    .fetch_optional(&mut **transaction)
    .await
}

/// Whether the account already holds an active enrollment in the class.
pub async fn exists_active_enrollment_tx(
    transaction: &mut Transaction<'_, Postgres>,
    account_id: Uuid,
    class_id: Uuid,
) -> std::result::Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS ( \
             SELECT 1 FROM enrollments \
             WHERE account_id = $1 AND class_id = $2 AND active \
         )",
    )
    .bind(account_id)
    .bind(class_id)
    .fetch_one(&mut **transaction)
    .await
}

/// Count a class's active enrollments.
pub async fn count_active_for_class_tx(
    transaction: &mut Transaction<'_, Postgres>,
    class_id: Uuid,
) -> std::result::Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM enrollments WHERE class_id = $1 AND active",
    )
    .bind(class_id)
    .fetch_one(&mut **transaction)
    .await
}

/// Insert an enrollment unless the account already holds an active one
/// for the same class.
///
/// Returns `None` when the partial unique index rejected the row, which
/// means a concurrent request enrolled the account first.
pub async fn insert_enrollment_tx(
    transaction: &mut Transaction<'_, Postgres>,
    enrollment: &Enrollment,
) -> std::result::Result<Option<Enrollment>, sqlx::Error> {
    sqlx::query_as::<_, Enrollment>(&format!(
        "INSERT INTO enrollments ({ENROLLMENT_COLUMNS}) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
         ON CONFLICT (account_id, class_id) WHERE active DO NOTHING \
         RETURNING {ENROLLMENT_COLUMNS}"
    ))
    .bind(enrollment.id)
    .bind(enrollment.account_id)
    .bind(enrollment.class_id)
    .bind(enrollment.status)
    .bind(enrollment.method)
    .bind(enrollment.enrolled_on)
    .bind(enrollment.active)
    .bind(enrollment.created_at)
    .fetch_optional(&mut **transaction)
    .await
}

/// List an account's active enrollments, newest first, optionally
/// filtered by status.
pub async fn list_for_account_tx(
    transaction: &mut Transaction<'_, Postgres>,
    account_id: Uuid,
    status: Option<EnrollmentStatus>,
    offset: i64,
    limit: i64,
) -> std::result::Result<Vec<EnrollmentSummary>, sqlx::Error> {
    sqlx::query_as::<_, EnrollmentSummary>(&format!(
        "{SUMMARY_SELECT} \
         WHERE e.account_id = $1 AND e.active \
           AND ($2::enrollment_status IS NULL OR e.status = $2) \
         ORDER BY e.enrolled_on DESC, e.created_at DESC \
         OFFSET $3 LIMIT $4"
    ))
    .bind(account_id)
    .bind(status)
    .bind(offset)
    .bind(limit)
    .fetch_all(&mut **transaction)
    .await
}

/// Count the rows [`list_for_account_tx`] would return unpaged.
pub async fn count_for_account_tx(
    transaction: &mut Transaction<'_, Postgres>,
    account_id: Uuid,
    status: Option<EnrollmentStatus>,
) -> std::result::Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM enrollments e \
         WHERE e.account_id = $1 AND e.active \
           AND ($2::enrollment_status IS NULL OR e.status = $2)",
    )
    .bind(account_id)
    .bind(status)
    .fetch_one(&mut **transaction)
    .await
}

/// Get one of the account's active enrollments by id.
pub async fn get_summary_for_account_tx(
    transaction: &mut Transaction<'_, Postgres>,
    enrollment_id: Uuid,
    account_id: Uuid,
) -> std::result::Result<Option<EnrollmentSummary>, sqlx::Error> {
    sqlx::query_as::<_, EnrollmentSummary>(&format!(
        "{SUMMARY_SELECT} WHERE e.id = $1 AND e.account_id = $2 AND e.active"
    ))
    .bind(enrollment_id)
    .bind(account_id)
    .fetch_optional(&mut **transaction)
    .await
}

/// Get an enrollment summary by id alone.
pub async fn get_summary_tx(
    transaction: &mut Transaction<'_, Postgres>,
    enrollment_id: Uuid,
) -> std::result::Result<Option<EnrollmentSummary>, sqlx::Error> {
    sqlx::query_as::<_, EnrollmentSummary>(&format!("{SUMMARY_SELECT} WHERE e.id = $1"))
        .bind(enrollment_id)
        .fetch_optional(&mut **transaction)
        .await
}
