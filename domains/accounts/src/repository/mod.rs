//! Repository functions for the accounts domain
//!
//! All access runs inside the caller's transaction, which in practice is
//! the one owned by the ambient request session.

pub mod accounts;

pub use accounts::{
    deactivate_account_tx, deactivate_enrollments_tx, find_by_subject_for_update_tx,
    find_by_subject_tx, get_account_tx, insert_account_if_absent_tx, set_picture_tx,
    touch_last_login_tx, update_profile_tx,
};
