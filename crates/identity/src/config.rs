//! Identity provider configuration

/// How the identity integration operates.
#[derive(Debug, Clone)]
pub enum IdentityMode {
    /// Verification only; minting is unavailable
    Verify,
    /// Verification plus token minting through the admin API
    Admin {
        api_key: String,
        credentials_file: String,
    },
}

#[derive(Debug, Clone)]
pub struct IdentityConfig {
    pub project_id: String,
    pub mode: IdentityMode,
}

impl IdentityConfig {
    pub fn verify_only(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            mode: IdentityMode::Verify,
        }
    }
}
