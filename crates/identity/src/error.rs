//! Identity errors

/// Errors from token verification and minting.
///
/// `InvalidCredential` is the caller's fault and maps to 401 at the HTTP
/// boundary; the other variants are infrastructure or configuration
/// problems.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("invalid credential: {0}")]
    InvalidCredential(String),

    #[error("issuer key set unavailable: {0}")]
    KeySetUnavailable(String),

    #[error("token mint failed: {0}")]
    MintFailed(String),

    #[error("identity configuration error: {0}")]
    Config(String),
}
