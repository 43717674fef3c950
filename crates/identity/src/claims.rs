//! Verified identity token claims

use serde::{Deserialize, Serialize};

/// Claims carried by a verified identity token.
///
/// `sub` is the provider-assigned subject and the stable key accounts
/// are looked up by. The profile fields are whatever the sign-in
/// provider knew about the user and may all be absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimSet {
    /// Provider-assigned stable subject identifier
    pub sub: String,
    /// Audience, always the project id
    pub aud: String,
    /// Issuer URL
    pub iss: String,
    /// Expiry (seconds since epoch)
    pub exp: u64,
    /// Issued-at (seconds since epoch)
    pub iat: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firebase: Option<ProviderInfo>,
}

/// Provider block nested inside Google identity tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sign_in_provider: Option<String>,
}

impl ClaimSet {
    /// Best display name available: the profile name, else the local
    /// part of the email, else the subject itself.
    pub fn display_name(&self) -> String {
        if let Some(name) = &self.name {
            if !name.is_empty() {
                return name.clone();
            }
        }
        if let Some(email) = &self.email {
            if let Some((local, _)) = email.split_once('@') {
                return local.to_string();
            }
        }
        self.sub.clone()
    }

    /// Sign-in provider reported by the token, `"unknown"` when absent.
    pub fn sign_in_provider(&self) -> &str {
        self.firebase
            .as_ref()
            .and_then(|info| info.sign_in_provider.as_deref())
            .unwrap_or("unknown")
    }
}
