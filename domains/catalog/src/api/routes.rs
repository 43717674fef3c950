//! Route definitions for the catalog domain API

use axum::{routing::get, Router};

use super::handlers;

/// Create catalog routes.
pub fn routes() -> Router {
    Router::new()
        .route("/v1/courses", get(handlers::list_courses))
        .route("/v1/courses/{slug}", get(handlers::get_course))
        .route("/v1/courses/{id}/files", get(handlers::list_course_files))
        .route("/v1/files/{id}/download", get(handlers::download_file))
}
