//! Repository functions for the enrollments domain

pub mod enrollments;

pub use enrollments::{
    count_active_for_class_tx, count_for_account_tx, exists_active_enrollment_tx,
    get_open_class_by_code_tx, get_summary_for_account_tx, get_summary_tx, insert_enrollment_tx,
    list_for_account_tx,
};
