//! Catalog API handlers
//!
//! - GET /v1/courses - paged course catalog
//! - GET /v1/courses/{slug} - one course by slug
//! - GET /v1/courses/{id}/files - a course's files
//! - GET /v1/files/{id}/download - authorize a download

use axum::{
    extract::{Path, Query},
    response::Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use hexagon_accounts::MaybeAccount;
use hexagon_common::{Pagination, ServiceResult};

use crate::domain::entities::{Course, CourseFile, FileAccess};
use crate::service;

/// Response for a single course
#[derive(Debug, Serialize)]
pub struct CourseResponse {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub summary: String,
    pub created_at: DateTime<Utc>,
}

impl From<Course> for CourseResponse {
    fn from(course: Course) -> Self {
        Self {
            id: course.id,
            slug: course.slug,
            title: course.title,
            summary: course.summary,
            created_at: course.created_at,
        }
    }
}

/// Paged course list
#[derive(Debug, Serialize)]
pub struct CourseListResponse {
    pub courses: Vec<CourseResponse>,
    pub total: i64,
}

/// Response for a course file
#[derive(Debug, Serialize)]
pub struct CourseFileResponse {
    pub id: Uuid,
    pub course_id: Uuid,
    pub name: String,
    pub access: FileAccess,
    pub downloadable: bool,
    pub download_count: i64,
}

impl From<CourseFile> for CourseFileResponse {
    fn from(file: CourseFile) -> Self {
        Self {
            id: file.id,
            course_id: file.course_id,
            name: file.name,
            access: file.access,
            downloadable: file.downloadable,
            download_count: file.download_count,
        }
    }
}

/// Response for an authorized download
#[derive(Debug, Serialize)]
pub struct DownloadResponse {
    pub file: CourseFileResponse,
    /// Fetchable URL; short-lived for non-public objects
    pub download_url: String,
}

/// GET /v1/courses - List active courses
pub async fn list_courses(
    Query(pagination): Query<Pagination>,
) -> ServiceResult<Json<CourseListResponse>> {
    let (courses, total) = service::list_courses(pagination.offset(), pagination.limit()).await?;
    Ok(Json(CourseListResponse {
        courses: courses.into_iter().map(Into::into).collect(),
        total,
    }))
}

/// GET /v1/courses/{slug} - Get one course
pub async fn get_course(Path(slug): Path<String>) -> ServiceResult<Json<CourseResponse>> {
    let course = service::get_course(&slug).await?;
    Ok(Json(course.into()))
}

/// GET /v1/courses/{id}/files - List a course's files
pub async fn list_course_files(
    Path(course_id): Path<Uuid>,
) -> ServiceResult<Json<Vec<CourseFileResponse>>> {
    let files = service::list_course_files(course_id).await?;
    Ok(Json(files.into_iter().map(Into::into).collect()))
}

/// GET /v1/files/{id}/download - Authorize a file download
///
/// Anonymous callers can fetch public files; enrolled-only files need a
/// signed-in, enrolled account.
pub async fn download_file(
    Path(file_id): Path<Uuid>,
    MaybeAccount(account): MaybeAccount,
) -> ServiceResult<Json<DownloadResponse>> {
    let (file, download_url) = service::download_file(file_id, account.as_ref()).await?;
    Ok(Json(DownloadResponse {
        file: file.into(),
        download_url,
    }))
}
