//! Request and response bodies for the API.

use serde::{Deserialize, Serialize};
use slashbot_core::Command;

/// Webhook accepted for asynchronous processing
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct WebhookResponse {
    pub status: String,
    pub event: String,
}

impl WebhookResponse {
    pub fn accepted(event: impl Into<String>) -> Self {
        Self {
            status: "accepted".to_string(),
            event: event.into(),
        }
    }
}

/// Liveness response for `GET /`
#[derive(Debug, Serialize, Deserialize)]
pub struct RootResponse {
    pub status: String,
    pub app: String,
    pub version: String,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub github_app_configured: bool,
    pub webhook_secret_configured: bool,
    pub timestamp: String,
}

/// Body of `POST /api/parse-comment`
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ParseCommentRequest {
    #[serde(default)]
    pub comment: String,
}

/// Commands found in a comment
#[derive(Debug, Serialize, Deserialize)]
pub struct ParseCommentResponse {
    pub success: bool,
    pub commands: Vec<Command>,
    pub count: usize,
}

/// Service status for `GET /api/status`
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub app_id: Option<u64>,
    pub features: FeatureSummary,
}

/// Supported commands and events
#[derive(Debug, Serialize, Deserialize)]
pub struct FeatureSummary {
    pub commands: Vec<String>,
    pub events: Vec<String>,
}
