//! Contact services

use tracing::warn;
use uuid::Uuid;

use hexagon_common::{ServiceError, ServiceResult};
use hexagon_context::ResourceSession;

use crate::domain::entities::{ContactInquiry, ADMIN_NOTIFICATION_EMAIL};
use crate::repository;

/// Inquiry form input, already validated at the API edge.
#[derive(Debug, Clone)]
pub struct InquiryInput {
    pub full_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub message: String,
    pub course_id: Option<Uuid>,
}

/// Store a contact inquiry and announce it.
///
/// The inquiry is stored first. A missing admin inbox setting then
/// surfaces as a `Config` error, which is not a session fault, so the
/// stored inquiry still commits and staff can find it in the back
/// office. Send failures only warn; the submission never depends on the
/// mail provider.
pub async fn submit_inquiry(input: InquiryInput) -> ServiceResult<ContactInquiry> {
    let session = ResourceSession::current()?;

    let (inquiry, course_title, admin_email) = {
        let mut tx = session.tx().await?;

        let course_title = match input.course_id {
            Some(course_id) => Some(
                repository::get_course_title_tx(&mut tx, course_id)
                    .await?
                    .ok_or_else(|| ServiceError::NotFound("course not found".to_string()))?,
            ),
            None => None,
        };

        let inquiry = ContactInquiry::new(
            &input.full_name,
            &input.phone,
            input.email.as_deref(),
            &input.message,
            input.course_id,
        );
        let inquiry = repository::insert_inquiry_tx(&mut tx, &inquiry).await?;
        let admin_email = repository::get_setting_tx(&mut tx, ADMIN_NOTIFICATION_EMAIL).await?;

        (inquiry, course_title, admin_email)
    };

    let admin_email = admin_email.ok_or_else(|| {
        ServiceError::Config(format!("site setting {ADMIN_NOTIFICATION_EMAIL} is not set"))
    })?;

    if let Err(error) = session
        .email()
        .send_inquiry_admin_notification(
            &admin_email,
            &inquiry.full_name,
            &inquiry.phone,
            inquiry.email.as_deref(),
            &inquiry.message,
            course_title.as_deref(),
        )
        .await
    {
        warn!(inquiry_id = %inquiry.id, %error, "failed to notify admin of inquiry");
    }

    if let Some(customer_email) = inquiry.email.as_deref() {
        if let Err(error) = session
            .email()
            .send_inquiry_confirmation(customer_email, &inquiry.full_name)
            .await
        {
            warn!(inquiry_id = %inquiry.id, %error, "failed to send inquiry confirmation");
        }
    }

    Ok(inquiry)
}
