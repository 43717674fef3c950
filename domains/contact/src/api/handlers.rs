//! Contact API handlers
//!
//! - POST /v1/contact - submit a course inquiry

use axum::{http::StatusCode, response::Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use hexagon_common::{ServiceResult, ValidatedJson};

use crate::domain::entities::ContactInquiry;
use crate::service::{self, InquiryInput};

/// Request for submitting an inquiry
#[derive(Debug, Deserialize, Validate)]
pub struct ContactRequest {
    #[validate(length(min = 1, max = 100))]
    pub full_name: String,

    #[validate(length(min = 1, max = 20))]
    pub phone: String,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(length(min = 1, max = 2000))]
    pub message: String,

    pub course_id: Option<Uuid>,
}

/// Response for a stored inquiry
#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<ContactInquiry> for ContactResponse {
    fn from(inquiry: ContactInquiry) -> Self {
        Self {
            id: inquiry.id,
            created_at: inquiry.created_at,
        }
    }
}

/// POST /v1/contact - Submit a course inquiry
pub async fn submit_inquiry(
    ValidatedJson(request): ValidatedJson<ContactRequest>,
) -> ServiceResult<(StatusCode, Json<ContactResponse>)> {
    let inquiry = service::submit_inquiry(InquiryInput {
        full_name: request.full_name,
        phone: request.phone,
        email: request.email,
        message: request.message,
        course_id: request.course_id,
    })
    .await?;
    Ok((StatusCode::CREATED, Json(inquiry.into())))
}
