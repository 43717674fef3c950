//! Route definitions for the contact domain API

use axum::{routing::post, Router};

use super::handlers;

/// Create contact routes.
pub fn routes() -> Router {
    Router::new().route("/v1/contact", post(handlers::submit_inquiry))
}
