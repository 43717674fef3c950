//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Database connection URL (PostgreSQL)
    pub database_url: String,

    /// Storage backend URL, e.g. `file://./uploads`, `s3://bucket`,
    /// `minio://host:9000/bucket?access_key=..&secret_key=..`
    pub storage_url: String,
    /// Base URL under which locally stored objects are served
    pub storage_public_url: Option<String>,

    /// Identity provider configuration
    pub identity_project_id: String,
    /// `verify` (default) or `admin`
    pub identity_mode: String,
    pub identity_api_key: Option<String>,
    pub identity_credentials_file: Option<String>,

    /// Runtime configuration
    pub rust_log: String,
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let config = Self {
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL is required"))?,

            storage_url: env::var("STORAGE_URL")
                .unwrap_or_else(|_| "file://./uploads".to_string()),
            storage_public_url: env::var("STORAGE_PUBLIC_URL").ok(),

            identity_project_id: env::var("IDENTITY_PROJECT_ID")
                .map_err(|_| anyhow::anyhow!("IDENTITY_PROJECT_ID is required"))?,
            identity_mode: env::var("IDENTITY_MODE").unwrap_or_else(|_| "verify".to_string()),
            identity_api_key: env::var("IDENTITY_API_KEY").ok(),
            identity_credentials_file: env::var("IDENTITY_CREDENTIALS_FILE").ok(),

            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "hexagon=debug".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .unwrap_or(8000),
        };

        Ok(config)
    }
}
