//! Enrollments domain layer: entities and enrollment rules

pub mod entities;
