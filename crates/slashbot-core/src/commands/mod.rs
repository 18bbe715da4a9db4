//! # Slash Commands
//!
//! Extraction of `/command args` lines from comment text and their sequential
//! execution against a repository.
//!
//! Data flow: comment text → [`parse`] → [`CommandDispatcher`] → handler →
//! [`CommandResult`], posted back to the pull request or issue.

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod context;
pub mod dispatcher;
pub mod handlers;
pub mod parser;
pub mod report;

pub use context::{CommandContext, CommandSettings, EventContext};
pub use dispatcher::{CommandDispatcher, CommandHandler};
pub use handlers::{MergeCommand, ReportCommand, TestCommand, WELCOME_MESSAGE};
pub use parser::parse;

// ============================================================================
// Core Types
// ============================================================================

/// A command extracted from comment text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    /// Command name, lower-cased, without the leading `/`
    #[serde(rename = "command")]
    pub name: String,

    /// Argument text, trimmed; empty when absent
    pub args: String,

    /// Byte offset of the `/` in the source text
    pub position: usize,
}

impl Command {
    pub fn new(name: impl Into<String>, args: impl Into<String>, position: usize) -> Self {
        Self {
            name: name.into(),
            args: args.into(),
            position,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.args.is_empty() {
            write!(f, "/{}", self.name)
        } else {
            write!(f, "/{} {}", self.name, self.args)
        }
    }
}

/// Outcome of one command, shown to the user as a comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResult {
    pub success: bool,
    pub message: String,
}

impl CommandResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
