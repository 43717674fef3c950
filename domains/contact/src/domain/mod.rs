//! Contact domain layer: entities

pub mod entities;
