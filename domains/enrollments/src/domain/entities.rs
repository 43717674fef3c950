//! Domain entities for the enrollments domain
//!
//! Enrollments are soft-deleted like accounts: cancelling or withdrawing
//! flips `active` off, and the partial unique index on
//! `(account_id, class_id) WHERE active` only constrains live rows, so a
//! cancelled student can enroll in the same class again.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Enrollment lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "enrollment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentStatus {
    Pending,
    Confirmed,
    Cancelled,
}

/// How an enrollment was created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "enrollment_method", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentMethod {
    /// Student redeemed a class code themselves
    ClassCode,
    /// Back-office staff entered the enrollment from a submitted form
    OnlineForm,
}

/// A scheduled class of a course that students enroll into
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CourseClass {
    pub id: Uuid,
    pub course_id: Uuid,
    /// Code students redeem to enroll
    pub code: String,
    pub title: String,
    /// Maximum number of active enrollments
    pub capacity: i32,
    pub open_for_enrollment: bool,
    pub active: bool,
}

impl CourseClass {
    /// Whether one more enrollment fits, given the current active count.
    pub fn has_capacity(&self, active_enrollments: i64) -> bool {
        active_enrollments < i64::from(self.capacity)
    }
}

/// Enrollment row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Enrollment {
    pub id: Uuid,
    pub account_id: Uuid,
    pub class_id: Uuid,
    pub status: EnrollmentStatus,
    pub method: EnrollmentMethod,
    pub enrolled_on: NaiveDate,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl Enrollment {
    /// Create a fresh pending enrollment redeemed through a class code.
    pub fn new_by_class_code(account_id: Uuid, class_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            account_id,
            class_id,
            status: EnrollmentStatus::Pending,
            method: EnrollmentMethod::ClassCode,
            enrolled_on: now.date_naive(),
            active: true,
            created_at: now,
        }
    }
}

/// An enrollment joined with the class and course it belongs to, the
/// shape list and detail endpoints return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct EnrollmentSummary {
    pub id: Uuid,
    pub status: EnrollmentStatus,
    pub method: EnrollmentMethod,
    pub enrolled_on: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub class_code: String,
    pub class_title: String,
    pub course_slug: String,
    pub course_title: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_enrollment_is_pending_and_active() {
        let enrollment = Enrollment::new_by_class_code(Uuid::new_v4(), Uuid::new_v4());
        assert_eq!(enrollment.status, EnrollmentStatus::Pending);
        assert_eq!(enrollment.method, EnrollmentMethod::ClassCode);
        assert!(enrollment.active);
    }

    #[test]
    fn test_class_capacity_check() {
        let class = CourseClass {
            id: Uuid::new_v4(),
            course_id: Uuid::new_v4(),
            code: "RUST-101-A".to_string(),
            title: "Evening cohort".to_string(),
            capacity: 2,
            open_for_enrollment: true,
            active: true,
        };
        assert!(class.has_capacity(0));
        assert!(class.has_capacity(1));
        assert!(!class.has_capacity(2));
        assert!(!class.has_capacity(3));
    }

    #[test]
    fn test_status_and_method_serialize_snake_case() {
        assert_eq!(
            serde_json::to_string(&EnrollmentStatus::Pending).unwrap(),
            "\"pending\""
        );
        assert_eq!(
            serde_json::to_string(&EnrollmentMethod::ClassCode).unwrap(),
            "\"class_code\""
        );
    }
}
