//! Enrollments domain: class enrollment by code, enrollment history

pub mod api;
pub mod domain;
pub mod repository;
pub mod service;

// Re-export domain types at the crate root for convenience
pub use domain::entities::*;
// Re-export repository functions
pub use repository::{
    count_active_for_class_tx, count_for_account_tx, exists_active_enrollment_tx,
    get_open_class_by_code_tx, get_summary_for_account_tx, get_summary_tx, insert_enrollment_tx,
    list_for_account_tx,
};

// Re-export API types
pub use api::routes;
