//! Common error types and handling for Hexagon
//!
//! Every error carries a kind that decides three things at the HTTP
//! boundary: the status code, the machine-readable `code` field in the
//! response body, and whether the request's resource session must roll
//! back. Domain failures (not found, forbidden, invalid input) are
//! normal outcomes and leave the session healthy; infrastructure faults
//! poison it.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Common result type for service operations
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// Common error type for the Hexagon application
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Storage error: {0}")]
    Storage(hexagon_storage::StorageError),

    #[error("Identity error: {0}")]
    Identity(hexagon_identity::IdentityError),

    #[error("Unexpected error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Response extension marking that the producing error poisoned the
/// request's resource session. The session middleware reads it to decide
/// between commit and rollback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionFault;

impl ServiceError {
    /// Get the appropriate HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
            ServiceError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ServiceError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ServiceError::Config(_)
            | ServiceError::Database(_)
            | ServiceError::Storage(_)
            | ServiceError::Identity(_)
            | ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceError::NotFound(_) => "NOT_FOUND",
            ServiceError::Forbidden(_) => "FORBIDDEN",
            ServiceError::Unauthorized(_) => "UNAUTHORIZED",
            ServiceError::InvalidRequest(_) => "INVALID_REQUEST",
            ServiceError::Config(_) => "CONFIGURATION_ERROR",
            ServiceError::Database(_)
            | ServiceError::Storage(_)
            | ServiceError::Identity(_)
            | ServiceError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether this error must roll back the request's resource session.
    ///
    /// Configuration errors are deliberately excluded: work done before
    /// the misconfiguration surfaced is still valid and commits.
    pub fn is_fault(&self) -> bool {
        matches!(
            self,
            ServiceError::Database(_)
                | ServiceError::Storage(_)
                | ServiceError::Identity(_)
                | ServiceError::Internal(_)
        )
    }
}

impl From<hexagon_storage::StorageError> for ServiceError {
    fn from(err: hexagon_storage::StorageError) -> Self {
        use hexagon_storage::StorageError;
        match err {
            // Object-not-found reads surface as a plain 404, not a fault
            StorageError::NotFound(path) => {
                ServiceError::NotFound(format!("stored object not found: {path}"))
            }
            StorageError::Config(message) => ServiceError::Config(message),
            other => ServiceError::Storage(other),
        }
    }
}

impl From<hexagon_identity::IdentityError> for ServiceError {
    fn from(err: hexagon_identity::IdentityError) -> Self {
        use hexagon_identity::IdentityError;
        match err {
            IdentityError::InvalidCredential(message) => ServiceError::Unauthorized(message),
            IdentityError::Config(message) => ServiceError::Config(message),
            other => ServiceError::Identity(other),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();
        let fault = self.is_fault();

        // Faults and misconfiguration are logged with full context; domain
        // failures are the caller's problem and stay quiet here.
        if fault {
            tracing::error!(error = %self, code = error_code, "request failed with a fault");
        } else if matches!(self, ServiceError::Config(_)) {
            tracing::error!(error = %self, "configuration error");
        }

        let body = Json(json!({
            "code": error_code,
            "message": self.to_string(),
        }));

        let mut response = (status, body).into_response();
        if fault {
            response.extensions_mut().insert(SessionFault);
        }
        response
    }
}
