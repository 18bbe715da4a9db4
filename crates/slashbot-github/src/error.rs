//! Error types for GitHub integration operations.
//!
//! Errors are classified for retry decisions through `is_transient()`. Messages
//! never contain key material, tokens or webhook secrets.

use thiserror::Error;

use crate::auth::InstallationId;

/// Authentication-related errors with retry classification.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The signing key is missing, unreadable or unusable (non-retryable).
    #[error("Authentication configuration error: {message}")]
    Configuration { message: String },

    /// JWT encoding failed for a key that was otherwise accepted.
    #[error("JWT generation failed: {message}")]
    JwtGenerationFailed { message: String },

    /// The identity exchange for an installation token failed. Nothing is
    /// cached, so the next request retries the exchange.
    #[error("Identity exchange failed for installation {installation_id}: {source}")]
    IdentityExchange {
        installation_id: InstallationId,
        #[source]
        source: ApiError,
    },

    /// Token cache operation failed.
    #[error("Token cache error: {0}")]
    CacheError(#[from] CacheError),

    /// The background refresh task ended without producing a result.
    #[error("Token refresh for installation {installation_id} did not complete")]
    RefreshInterrupted { installation_id: InstallationId },
}

impl AuthError {
    /// Check if this error represents a transient condition that may succeed if retried.
    ///
    /// Configuration and JWT encoding problems are permanent until the
    /// deployment is fixed. Exchange failures inherit the classification of the
    /// underlying API error.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Configuration { .. } => false,
            Self::JwtGenerationFailed { .. } => false,
            Self::IdentityExchange { source, .. } => source.is_transient(),
            Self::CacheError(_) => true,
            Self::RefreshInterrupted { .. } => true,
        }
    }
}

/// Errors during token caching operations.
#[derive(Debug, Error)]
pub enum CacheError {
    /// A cache operation failed for a specific reason.
    #[error("Cache operation failed: {message}")]
    OperationFailed { message: String },
}

/// Errors during GitHub API operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP error response from GitHub API.
    #[error("HTTP error: {status} - {message}")]
    HttpError { status: u16, message: String },

    /// Request to GitHub API timed out.
    #[error("Request timeout")]
    Timeout,

    /// The request was invalid (client error).
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    /// Authentication to GitHub API failed.
    #[error("Authentication failed")]
    AuthenticationFailed,

    /// Authorization check failed (insufficient permissions).
    #[error("Authorization failed")]
    AuthorizationFailed,

    /// The requested resource was not found.
    #[error("Resource not found")]
    NotFound,

    /// No installation token could be obtained for the request.
    #[error("Installation token unavailable: {message}")]
    TokenUnavailable { message: String },

    /// Failed to parse JSON response from GitHub API.
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// HTTP client error (network, TLS, etc.).
    #[error("HTTP client error: {0}")]
    HttpClientError(#[from] reqwest::Error),
}

impl ApiError {
    /// Map a transport failure, separating timeouts from other network errors.
    pub fn from_transport(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else {
            Self::HttpClientError(error)
        }
    }

    /// Map a non-success HTTP status and its (already extracted) message.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 => Self::AuthenticationFailed,
            403 => Self::AuthorizationFailed,
            404 => Self::NotFound,
            422 => Self::InvalidRequest { message },
            _ => Self::HttpError { status, message },
        }
    }

    /// Check if this error represents a transient condition that may succeed if retried.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::HttpError { status, .. } => *status >= 500 || *status == 429,
            Self::Timeout => true,
            Self::InvalidRequest { .. } => false,
            Self::AuthenticationFailed => false,
            Self::AuthorizationFailed => false,
            Self::NotFound => false,
            Self::TokenUnavailable { .. } => true,
            Self::JsonError(_) => false,
            Self::HttpClientError(_) => true,
        }
    }
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing.
    #[error("Required field missing: {field}")]
    Required { field: String },

    /// A field has an invalid format.
    #[error("Invalid format for {field}: {message}")]
    InvalidFormat { field: String, message: String },
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
