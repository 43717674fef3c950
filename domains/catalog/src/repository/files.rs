//! Transactional queries over course files

use crate::domain::entities::CourseFile;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

const FILE_COLUMNS: &str =
    "id, course_id, name, object_key, access, downloadable, active, download_count";

/// List a course's active files, ordered by name.
pub async fn list_files_for_course_tx(
    transaction: &mut Transaction<'_, Postgres>,
    course_id: Uuid,
) -> std::result::Result<Vec<CourseFile>, sqlx::Error> {
    sqlx::query_as::<_, CourseFile>(&format!(
        "SELECT {FILE_COLUMNS} FROM course_files WHERE course_id = $1 AND active ORDER BY name"
    ))
    .bind(course_id)
    .fetch_all(&mut **transaction)
    .await
}

/// Get an active file by id.
pub async fn get_file_tx(
    transaction: &mut Transaction<'_, Postgres>,
    file_id: Uuid,
) -> std::result::Result<Option<CourseFile>, sqlx::Error> {
    sqlx::query_as::<_, CourseFile>(&format!(
        "SELECT {FILE_COLUMNS} FROM course_files WHERE id = $1 AND active"
    ))
    .bind(file_id)
    .fetch_optional(&mut **transaction)
    .await
}

/// Record one more download of a file.
pub async fn bump_download_count_tx(
    transaction: &mut Transaction<'_, Postgres>,
    file_id: Uuid,
) -> std::result::Result<(), sqlx::Error> {
    sqlx::query("UPDATE course_files SET download_count = download_count + 1 WHERE id = $1")
        .bind(file_id)
        .execute(&mut **transaction)
        .await?;
    Ok(())
}

/// Whether an account holds an active enrollment in any class of the
/// given course.
pub async fn is_account_enrolled_tx(
    transaction: &mut Transaction<'_, Postgres>,
    account_id: Uuid,
    course_id: Uuid,
) -> std::result::Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS ( \
             SELECT 1 FROM enrollments e \
             JOIN course_classes cc ON cc.id = e.class_id \
             WHERE e.account_id = $1 AND cc.course_id = $2 AND e.active \
         )",
    )
    .bind(account_id)
    .bind(course_id)
    .fetch_one(&mut **transaction)
    .await
}
