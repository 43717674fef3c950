//! Domain entities for the contact domain

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Site-setting key holding the inbox inquiries are announced to
pub const ADMIN_NOTIFICATION_EMAIL: &str = "admin_notification_email";

/// A submitted contact inquiry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ContactInquiry {
    pub id: Uuid,
    pub full_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub message: String,
    pub course_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl ContactInquiry {
    /// Create an inquiry from form input, trimming the free-text fields
    /// and dropping a blank email.
    pub fn new(
        full_name: &str,
        phone: &str,
        email: Option<&str>,
        message: &str,
        course_id: Option<Uuid>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            full_name: full_name.trim().to_string(),
            phone: phone.trim().to_string(),
            email: email
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty()),
            message: message.trim().to_string(),
            course_id,
            created_at: Utc::now(),
        }
    }
}
