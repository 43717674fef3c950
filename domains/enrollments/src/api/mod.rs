//! API layer for the enrollments domain

pub mod handlers;
pub mod routes;

pub use routes::routes;
