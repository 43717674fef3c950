//! Catalog services

use uuid::Uuid;

use hexagon_accounts::Account;
use hexagon_common::{ServiceError, ServiceResult};
use hexagon_context::ResourceSession;
use hexagon_storage::UrlOptions;

use crate::domain::entities::{Course, CourseFile, FileAccess};
use crate::repository;

/// List active courses with the total count for paging.
pub async fn list_courses(offset: i64, limit: i64) -> ServiceResult<(Vec<Course>, i64)> {
    let session = ResourceSession::current()?;
    let mut tx = session.tx().await?;

    let courses = repository::list_courses_tx(&mut tx, offset, limit).await?;
    let total = repository::count_courses_tx(&mut tx).await?;
    Ok((courses, total))
}

/// Get an active course by slug.
pub async fn get_course(slug: &str) -> ServiceResult<Course> {
    let session = ResourceSession::current()?;
    let mut tx = session.tx().await?;

    repository::get_course_by_slug_tx(&mut tx, slug)
        .await?
        .ok_or_else(|| ServiceError::NotFound("course not found".to_string()))
}

/// List the active files of an active course.
pub async fn list_course_files(course_id: Uuid) -> ServiceResult<Vec<CourseFile>> {
    let session = ResourceSession::current()?;
    let mut tx = session.tx().await?;

    repository::get_course_tx(&mut tx, course_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("course not found".to_string()))?;
    Ok(repository::list_files_for_course_tx(&mut tx, course_id).await?)
}

/// Authorize a file download and hand back the file with a fetchable
/// URL.
///
/// Public files download for anyone; enrolled-only files require the
/// caller to hold an active enrollment in the file's course. Each
/// successful download bumps the file's counter.
pub async fn download_file(
    file_id: Uuid,
    account: Option<&Account>,
) -> ServiceResult<(CourseFile, String)> {
    let session = ResourceSession::current()?;

    let file = {
        let mut tx = session.tx().await?;
        let file = repository::get_file_tx(&mut tx, file_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("file not found".to_string()))?;

        let enrolled = match (account, file.access) {
            (Some(account), FileAccess::Enrolled) => {
                repository::is_account_enrolled_tx(&mut tx, account.id, file.course_id).await?
            }
            _ => false,
        };
        if !file.can_download(enrolled) {
            return Err(ServiceError::Forbidden(if file.downloadable {
                "file requires an enrollment".to_string()
            } else {
                "file is not available for download".to_string()
            }));
        }
        file
    };

    let url = session
        .storage()
        .url_for(&file.object_key, UrlOptions::default())
        .await?;

    let mut tx = session.tx().await?;
    repository::bump_download_count_tx(&mut tx, file.id).await?;

    Ok((file, url))
}
