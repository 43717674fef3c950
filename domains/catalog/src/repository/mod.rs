//! Repository functions for the catalog domain

pub mod courses;
pub mod files;

pub use courses::{count_courses_tx, get_course_by_slug_tx, get_course_tx, list_courses_tx};
pub use files::{
    bump_download_count_tx, get_file_tx, is_account_enrolled_tx, list_files_for_course_tx,
};
