//! Enrollment API handlers
//!
//! - GET /v1/enrollments - the caller's enrollments
//! - POST /v1/enrollments - enroll via class code
//! - GET /v1/enrollments/{id} - one enrollment

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use hexagon_accounts::CurrentAccount;
use hexagon_common::{Pagination, ServiceResult, ValidatedJson};

use crate::domain::entities::{EnrollmentStatus, EnrollmentSummary};
use crate::service;

/// Query parameters for listing enrollments
#[derive(Debug, Deserialize)]
pub struct ListEnrollmentsParams {
    pub status: Option<EnrollmentStatus>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

/// Paged enrollment list
#[derive(Debug, Serialize)]
pub struct EnrollmentListResponse {
    pub enrollments: Vec<EnrollmentSummary>,
    pub total: i64,
}

/// Request to enroll by class code
#[derive(Debug, Deserialize, Validate)]
pub struct EnrollRequest {
    #[validate(length(min = 1, max = 50))]
    pub class_code: String,
}

/// GET /v1/enrollments - List the caller's enrollments
pub async fn list_enrollments(
    CurrentAccount(account): CurrentAccount,
    Query(params): Query<ListEnrollmentsParams>,
) -> ServiceResult<Json<EnrollmentListResponse>> {
    let page = Pagination {
        offset: params.offset,
        limit: params.limit,
    };
    let (enrollments, total) =
        service::list_enrollments(&account, params.status, page.offset(), page.limit()).await?;
    Ok(Json(EnrollmentListResponse { enrollments, total }))
}

/// POST /v1/enrollments - Enroll the caller via a class code
pub async fn enroll(
    CurrentAccount(account): CurrentAccount,
    ValidatedJson(request): ValidatedJson<EnrollRequest>,
) -> ServiceResult<(StatusCode, Json<EnrollmentSummary>)> {
    let enrollment = service::enroll_by_class_code(&account, &request.class_code).await?;
    Ok((StatusCode::CREATED, Json(enrollment)))
}

/// GET /v1/enrollments/{id} - Get one of the caller's enrollments
pub async fn get_enrollment(
    CurrentAccount(account): CurrentAccount,
    Path(enrollment_id): Path<Uuid>,
) -> ServiceResult<Json<EnrollmentSummary>> {
    let enrollment = service::get_enrollment(&account, enrollment_id).await?;
    Ok(Json(enrollment))
}
