//! Bearer token verification

use jsonwebtoken::{decode, decode_header, Algorithm, Validation};

use crate::claims::ClaimSet;
use crate::error::IdentityError;
use crate::keys::{KeySet, DEFAULT_JWKS_URL};

/// Clock skew tolerated when checking `exp` and `iat`, in seconds.
pub const CLOCK_LEEWAY_SECS: u64 = 30;

/// Verifies RS256 bearer tokens issued for one project.
pub struct TokenVerifier {
    project_id: String,
    keys: KeySet,
}

impl TokenVerifier {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self::with_key_set(project_id, KeySet::new(DEFAULT_JWKS_URL))
    }

    /// Use a specific key set instead of the default JWKS endpoint.
    pub fn with_key_set(project_id: impl Into<String>, keys: KeySet) -> Self {
        Self {
            project_id: project_id.into(),
            keys,
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// The exact issuer string tokens must carry.
    pub fn issuer(&self) -> String {
        format!("https://securetoken.google.com/{}", self.project_id)
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.project_id]);
        validation.set_issuer(&[self.issuer()]);
        validation.leeway = CLOCK_LEEWAY_SECS;
        validation
    }

    /// Verify `token` and return its claims.
    ///
    /// Anything wrong with the token itself (signature, audience,
    /// issuer, expiry, unknown signing key) is `InvalidCredential`;
    /// only a failure to reach the key set endpoint is reported as an
    /// infrastructure error.
    pub async fn verify(&self, token: &str) -> Result<ClaimSet, IdentityError> {
        let header = decode_header(token)
            .map_err(|e| IdentityError::InvalidCredential(format!("malformed token: {e}")))?;
        let kid = header.kid.ok_or_else(|| {
            IdentityError::InvalidCredential("token is missing the key id header".to_string())
        })?;
        let key = self.keys.decoding_key(&kid).await?;

        let token_data = decode::<ClaimSet>(token, &key, &self.validation()).map_err(|e| {
            tracing::debug!(error = %e, "token validation failed");
            IdentityError::InvalidCredential(format!("token validation failed: {e}"))
        })?;
        Ok(token_data.claims)
    }
}
