//! Shared utilities, configuration, and error handling for Hexagon
//!
//! This crate provides common functionality used across the Hexagon application:
//! - Configuration management following 12-factor principles
//! - The service error taxonomy and its HTTP rendering
//! - Request extractors shared by all domains

pub mod config;
pub mod error;
pub mod extractors;

pub use config::Config;
pub use error::{ServiceError, ServiceResult, SessionFault};
pub use extractors::{Pagination, ValidatedJson};
