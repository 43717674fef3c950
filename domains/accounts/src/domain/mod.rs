//! Accounts domain layer: entities and profile rules

pub mod entities;
