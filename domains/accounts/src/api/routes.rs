//! Route definitions for the accounts domain API

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;

/// Create account routes.
///
/// Handlers reach their resources through the ambient request session,
/// so the router carries no state of its own.
pub fn routes() -> Router {
    Router::new()
        .route("/v1/session", post(handlers::open_session))
        .route(
            "/v1/me",
            get(handlers::get_profile)
                .patch(handlers::update_profile)
                .delete(handlers::withdraw),
        )
}
