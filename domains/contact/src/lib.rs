//! Contact domain: course inquiries and admin notification

pub mod api;
pub mod domain;
pub mod repository;
pub mod service;

// Re-export domain types at the crate root for convenience
pub use domain::entities::*;
// Re-export repository functions
pub use repository::{get_course_title_tx, get_setting_tx, insert_inquiry_tx};

// Re-export API types
pub use api::routes;
