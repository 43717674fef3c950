//! Accounts domain: sign-up, sign-in, profiles, withdrawal

pub mod api;
pub mod domain;
pub mod repository;
pub mod service;

// Re-export domain types at the crate root for convenience
pub use domain::entities::*;
// Re-export repository functions
pub use repository::{
    deactivate_account_tx, deactivate_enrollments_tx, find_by_subject_for_update_tx,
    find_by_subject_tx, get_account_tx, insert_account_if_absent_tx, set_picture_tx,
    touch_last_login_tx, update_profile_tx,
};

// Re-export API types
pub use api::extract::{CurrentAccount, MaybeAccount};
pub use api::routes;
