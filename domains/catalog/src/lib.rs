//! Catalog domain: courses, course files, downloads

pub mod api;
pub mod domain;
pub mod repository;
pub mod service;

// Re-export domain types at the crate root for convenience
pub use domain::entities::*;
// Re-export repository functions
pub use repository::{
    bump_download_count_tx, count_courses_tx, get_course_by_slug_tx, get_course_tx, get_file_tx,
    is_account_enrolled_tx, list_courses_tx, list_files_for_course_tx,
};

// Re-export API types
pub use api::routes;
