//! Route definitions for the enrollments domain API

use axum::{routing::get, Router};

use super::handlers;

/// Create enrollment routes.
pub fn routes() -> Router {
    Router::new()
        .route(
            "/v1/enrollments",
            get(handlers::list_enrollments).post(handlers::enroll),
        )
        .route("/v1/enrollments/{id}", get(handlers::get_enrollment))
}
