//! Error types for command dispatch and event routing.

use slashbot_github::{ApiError, AuthError};
use thiserror::Error;

/// Errors raised by the command dispatcher itself.
///
/// Handler failures never surface here; they become failed command results.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Invalid event context: {message}")]
    InvalidContext { message: String },
}

/// Errors raised while routing a webhook event.
#[derive(Debug, Error)]
pub enum EventError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Malformed event payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    #[error("Authentication failed: {0}")]
    Authentication(#[from] AuthError),

    #[error("GitHub API call failed: {0}")]
    Api(#[from] ApiError),

    #[error("Command dispatch failed: {0}")]
    Dispatch(#[from] DispatchError),
}

impl EventError {
    /// Check if error is transient and the event could succeed if redelivered
    pub fn is_transient(&self) -> bool {
        match self {
            Self::MissingField { .. } => false,
            Self::MalformedPayload(_) => false,
            Self::Authentication(e) => e.is_transient(),
            Self::Api(e) => e.is_transient(),
            Self::Dispatch(_) => false,
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
