//! Issuer signing key cache
//!
//! The issuer rotates its RS256 signing keys; tokens name theirs by
//! `kid`. Keys are fetched lazily and kept in memory; a lookup miss
//! triggers one refetch before the credential is rejected, which is how
//! rotation is absorbed without a background job.

use std::collections::HashMap;

use jsonwebtoken::DecodingKey;
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::error::IdentityError;

/// JWKS endpoint for Google secure token signing keys
pub const DEFAULT_JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

/// One RSA public key from the issuer's JWKS document
#[derive(Debug, Clone, Deserialize)]
pub struct Jwk {
    pub kid: String,
    pub kty: String,
    /// base64url modulus
    pub n: String,
    /// base64url exponent
    pub e: String,
    #[serde(default)]
    pub alg: Option<String>,
}

#[derive(Debug, Deserialize)]
struct JwkDocument {
    keys: Vec<Jwk>,
}

/// Cache of the issuer's current signing keys, keyed by `kid`.
pub struct KeySet {
    url: String,
    http: reqwest::Client,
    keys: RwLock<HashMap<String, Jwk>>,
}

impl KeySet {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            http: reqwest::Client::new(),
            keys: RwLock::new(HashMap::new()),
        }
    }

    /// A key set seeded with known keys and no fetching. Test seam.
    pub fn fixed(keys: Vec<Jwk>) -> Self {
        let map = keys.into_iter().map(|k| (k.kid.clone(), k)).collect();
        Self {
            url: String::new(),
            http: reqwest::Client::new(),
            keys: RwLock::new(map),
        }
    }

    /// Resolve `kid` to a decoding key, refetching the set once on a miss.
    pub async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, IdentityError> {
        if let Some(jwk) = self.keys.read().await.get(kid) {
            return build_key(jwk);
        }
        self.refresh().await?;
        let keys = self.keys.read().await;
        let jwk = keys.get(kid).ok_or_else(|| {
            IdentityError::InvalidCredential(format!("unknown signing key id {kid:?}"))
        })?;
        build_key(jwk)
    }

    async fn refresh(&self) -> Result<(), IdentityError> {
        if self.url.is_empty() {
            // fixed key sets never refetch
            return Ok(());
        }
        let document: JwkDocument = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| IdentityError::KeySetUnavailable(e.to_string()))?
            .error_for_status()
            .map_err(|e| IdentityError::KeySetUnavailable(e.to_string()))?
            .json()
            .await
            .map_err(|e| IdentityError::KeySetUnavailable(format!("malformed key set: {e}")))?;

        let mut keys = self.keys.write().await;
        *keys = document
            .keys
            .into_iter()
            .map(|k| (k.kid.clone(), k))
            .collect();
        tracing::debug!(count = keys.len(), "issuer signing keys refreshed");
        Ok(())
    }
}

fn build_key(jwk: &Jwk) -> Result<DecodingKey, IdentityError> {
    DecodingKey::from_rsa_components(&jwk.n, &jwk.e)
        .map_err(|e| IdentityError::InvalidCredential(format!("unusable signing key: {e}")))
}
