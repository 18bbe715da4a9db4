//! Error types for the HTTP service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use tracing::{error, warn};

/// Webhook ingress errors with HTTP status code mapping
///
/// - `401 Unauthorized`: the request did not prove knowledge of the shared
///   secret; nothing else happens for that request
/// - `400 Bad Request`: authenticated but unusable (missing event header,
///   body that is not JSON)
/// - `500 Internal Server Error`: the service cannot verify anything because
///   no secret is configured
///
/// Messages returned to clients never contain secrets or signature material.
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    /// Signature header absent, malformed or not matching the payload
    #[error("Invalid webhook signature")]
    InvalidSignature,

    /// Required header missing after a valid signature
    #[error("Missing required header: {header}")]
    MissingHeader { header: String },

    /// Body is not valid JSON
    #[error("Invalid JSON payload: {message}")]
    InvalidJson { message: String },

    /// No webhook secret configured
    #[error("Webhook secret not configured")]
    SecretNotConfigured,
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::InvalidSignature => {
                warn!("Rejected webhook with invalid signature");
                (StatusCode::UNAUTHORIZED, self.to_string())
            }
            Self::MissingHeader { ref header } => {
                warn!(header = %header, "Rejected webhook with missing header");
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            Self::InvalidJson { ref message } => {
                warn!(error = %message, "Rejected webhook with invalid JSON");
                (StatusCode::BAD_REQUEST, "Invalid JSON payload".to_string())
            }
            Self::SecretNotConfigured => {
                error!("Webhook received but no webhook secret is configured");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error occurred. Please try again later.".to_string(),
                )
            }
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });

        (status, Json(body)).into_response()
    }
}

/// Service-level errors
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Failed to bind to address {address}: {message}")]
    BindFailed { address: String, message: String },

    #[error("Server failed: {message}")]
    ServerFailed { message: String },

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Missing required configuration: {key}")]
    Missing { key: String },
}

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;
