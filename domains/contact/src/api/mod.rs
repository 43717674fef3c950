//! API layer for the contact domain

pub mod handlers;
pub mod routes;

pub use routes::routes;
