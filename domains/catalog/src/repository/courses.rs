//! Transactional queries over the courses table
//!
//! The public catalog only ever sees active courses; every query here
//! filters on `active` rather than leaving that to callers.

use crate::domain::entities::Course;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

const COURSE_COLUMNS: &str = "id, slug, title, summary, active, created_at";

/// List active courses, ordered by title.
pub async fn list_courses_tx(
    transaction: &mut Transaction<'_, Postgres>,
    offset: i64,
    limit: i64,
) -> std::result::Result<Vec<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!(
        "SELECT {COURSE_COLUMNS} FROM courses WHERE active ORDER BY title OFFSET $1 LIMIT $2"
    ))
    .bind(offset)
    .bind(limit)
    .fetch_all(&mut **transaction)
    .await
}

/// Count active courses.
pub async fn count_courses_tx(
    transaction: &mut Transaction<'_, Postgres>,
) -> std::result::Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM courses WHERE active")
        .fetch_one(&mut **transaction)
        .await
}

/// Get an active course by its slug.
pub async fn get_course_by_slug_tx(
    transaction: &mut Transaction<'_, Postgres>,
    slug: &str,
) -> std::result::Result<Option<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!(
        "SELECT {COURSE_COLUMNS} FROM courses WHERE slug = $1 AND active"
    ))
    .bind(slug)
    .fetch_optional(&mut **transaction)
    .await
}

/// Get an active course by id.
pub async fn get_course_tx(
    transaction: &mut Transaction<'_, Postgres>,
    course_id: Uuid,
) -> std::result::Result<Option<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!(
        "SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1 AND active"
    ))
    .bind(course_id)
    .fetch_optional(&mut **transaction)
    .await
}
