//! Domain entities for the catalog domain

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Course entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Course {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub summary: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Who may download a course file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "file_access", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FileAccess {
    Public,
    Enrolled,
}

/// A downloadable object attached to a course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CourseFile {
    pub id: Uuid,
    pub course_id: Uuid,
    pub name: String,
    /// Storage key the object lives under
    pub object_key: String,
    pub access: FileAccess,
    pub downloadable: bool,
    pub active: bool,
    pub download_count: i64,
}

impl CourseFile {
    /// Whether a caller may download this file. `enrolled` states
    /// whether the caller holds an active enrollment in the file's
    /// course; anonymous callers pass `false`.
    pub fn can_download(&self, enrolled: bool) -> bool {
        if !self.downloadable {
            return false;
        }
        match self.access {
            FileAccess::Public => true,
            FileAccess::Enrolled => enrolled,
        }
    }
}
