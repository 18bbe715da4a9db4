//! # Webhook Event Routing
//!
//! Turns verified webhook payloads into actions:
//! - `issue_comment` (`created`) → parse commands → dispatch
//! - `pull_request` (`opened`) → welcome comment; (`synchronize`) → log
//! - `push` → log
//!
//! Everything else is logged and ignored.

use async_trait::async_trait;
use serde::Serialize;

use crate::commands::CommandResult;
use crate::error::EventError;

pub mod payload;
pub mod router;

pub use router::EventRouter;

/// Event types the router acts on.
pub const SUPPORTED_EVENTS: &[&str] = &["issue_comment", "pull_request", "push"];

/// What happened to an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum EventOutcome {
    /// Commands were found and executed
    CommandsExecuted { results: Vec<CommandResult> },

    /// A comment was created but contained no commands
    NoCommands,

    /// A welcome comment was posted on a newly opened pull request
    WelcomePosted { number: u64 },

    /// The event was recorded in the logs only
    Logged,

    /// The event was not acted on
    Ignored { reason: String },
}

impl EventOutcome {
    pub fn ignored(reason: impl Into<String>) -> Self {
        Self::Ignored {
            reason: reason.into(),
        }
    }
}

/// Processes a verified webhook event.
#[async_trait]
pub trait EventProcessor: Send + Sync {
    /// Handle one event of type `event_type` (the `X-GitHub-Event` header).
    async fn process(
        &self,
        event_type: &str,
        payload: serde_json::Value,
    ) -> Result<EventOutcome, EventError>;
}
