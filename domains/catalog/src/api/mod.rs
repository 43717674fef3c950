//! API layer for the catalog domain

pub mod handlers;
pub mod routes;

pub use routes::routes;
