//! Transactional queries for contact inquiries and site settings

use crate::domain::entities::ContactInquiry;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

const INQUIRY_COLUMNS: &str = "id, full_name, phone, email, message, course_id, created_at";

/// Store a submitted inquiry.
pub async fn insert_inquiry_tx(
    transaction: &mut Transaction<'_, Postgres>,
    inquiry: &ContactInquiry,
) -> std::result::Result<ContactInquiry, sqlx::Error> {
    sqlx::query_as::<_, ContactInquiry>(&format!(
        "INSERT INTO contact_inquiries ({INQUIRY_COLUMNS}) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         RETURNING {INQUIRY_COLUMNS}"
    ))
    .bind(inquiry.id)
    .bind(&inquiry.full_name)
    .bind(&inquiry.phone)
    .bind(&inquiry.email)
    .bind(&inquiry.message)
    .bind(inquiry.course_id)
    .bind(inquiry.created_at)
    .fetch_one(&mut **transaction)
    .await
}

/// Read a site setting's value.
pub async fn get_setting_tx(
    transaction: &mut Transaction<'_, Postgres>,
    key: &str,
) -> std::result::Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>("SELECT value FROM site_settings WHERE key = $1")
        .bind(key)
        .fetch_optional(&mut **transaction)
        .await
}

/// Title of an active course, used to label the inquiry for the admin.
pub async fn get_course_title_tx(
    transaction: &mut Transaction<'_, Postgres>,
    course_id: Uuid,
) -> std::result::Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>("SELECT title FROM courses WHERE id = $1 AND active")
        .bind(course_id)
        .fetch_optional(&mut **transaction)
        .await
}
