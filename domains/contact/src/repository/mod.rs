//! Repository functions for the contact domain

pub mod inquiries;

pub use inquiries::{get_course_title_tx, get_setting_tx, insert_inquiry_tx};
