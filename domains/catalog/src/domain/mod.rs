//! Catalog domain layer: entities and download rules

pub mod entities;
