//! Identity provider integration for Hexagon
//!
//! Two capability levels, chosen by configuration:
//!
//! - [`TokenVerifier`] checks RS256 bearer tokens against the issuer's
//!   published signing keys. This is all that request handling ever
//!   needs.
//! - [`IdentityAdmin`] additionally mints token pairs through the
//!   provider's admin API, for tests and administrative tooling.
//!
//! [`Identity`] wraps whichever level is configured; callers that only
//! verify stay oblivious to the difference.

mod admin;
mod claims;
mod config;
mod error;
mod keys;
mod verifier;

pub use admin::{IdentityAdmin, ServiceAccount, TokenPair};
pub use claims::{ClaimSet, ProviderInfo};
pub use config::{IdentityConfig, IdentityMode};
pub use error::IdentityError;
pub use keys::{Jwk, KeySet, DEFAULT_JWKS_URL};
pub use verifier::{TokenVerifier, CLOCK_LEEWAY_SECS};

/// The configured identity capability.
pub enum Identity {
    Verifier(TokenVerifier),
    Admin(IdentityAdmin),
}

impl Identity {
    /// Build the capability described by `config`.
    pub fn configure(config: &IdentityConfig) -> Result<Self, IdentityError> {
        match &config.mode {
            IdentityMode::Verify => {
                tracing::info!(project = %config.project_id, "identity verifier ready");
                Ok(Identity::Verifier(TokenVerifier::new(&config.project_id)))
            }
            IdentityMode::Admin {
                api_key,
                credentials_file,
            } => {
                let service_account = ServiceAccount::from_file(credentials_file)?;
                tracing::info!(
                    project = %config.project_id,
                    service_account = %service_account.client_email,
                    "identity admin ready"
                );
                Ok(Identity::Admin(IdentityAdmin::new(
                    TokenVerifier::new(&config.project_id),
                    api_key.clone(),
                    service_account,
                )))
            }
        }
    }

    /// The verifier, available in every mode.
    pub fn verifier(&self) -> &TokenVerifier {
        match self {
            Identity::Verifier(verifier) => verifier,
            Identity::Admin(admin) => admin.verifier(),
        }
    }

    /// Minting rights, if configured.
    pub fn admin(&self) -> Option<&IdentityAdmin> {
        match self {
            Identity::Verifier(_) => None,
            Identity::Admin(admin) => Some(admin),
        }
    }
}
