//! Execution context handed to command handlers.

use serde::{Deserialize, Serialize};
use slashbot_github::client::{Issue, PullRequest, Repository, RepositoryOperations, RepositoryRef};

use crate::error::DispatchError;

/// Default workflow triggered by `/test` without an argument.
pub const DEFAULT_WORKFLOW: &str = "ci.yml";

/// The pull request or issue a comment was made on.
#[derive(Debug, Clone, PartialEq)]
pub enum EventContext {
    PullRequest(Box<PullRequest>),
    Issue(Box<Issue>),
    None,
}

impl EventContext {
    /// Build a context from optional parts.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::InvalidContext` when both a pull request and an
    /// issue are supplied.
    pub fn from_parts(
        pull_request: Option<PullRequest>,
        issue: Option<Issue>,
    ) -> Result<Self, DispatchError> {
        match (pull_request, issue) {
            (Some(pr), None) => Ok(Self::PullRequest(Box::new(pr))),
            (None, Some(issue)) => Ok(Self::Issue(Box::new(issue))),
            (None, None) => Ok(Self::None),
            (Some(pr), Some(issue)) => Err(DispatchError::InvalidContext {
                message: format!(
                    "both pull request #{} and issue #{} supplied",
                    pr.number, issue.number
                ),
            }),
        }
    }

    /// Number of the pull request or issue, used to post replies.
    pub fn number(&self) -> Option<u64> {
        match self {
            Self::PullRequest(pr) => Some(pr.number),
            Self::Issue(issue) => Some(issue.number),
            Self::None => None,
        }
    }

    pub fn pull_request(&self) -> Option<&PullRequest> {
        match self {
            Self::PullRequest(pr) => Some(pr.as_ref()),
            _ => None,
        }
    }

    /// Short label for messages and logs: `PR`, `issue` or `none`.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PullRequest(_) => "PR",
            Self::Issue(_) => "issue",
            Self::None => "none",
        }
    }
}

/// Tunable command behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSettings {
    /// Workflow used by `/test` when no argument is given
    #[serde(default = "default_workflow")]
    pub default_workflow: String,
}

fn default_workflow() -> String {
    DEFAULT_WORKFLOW.to_string()
}

impl Default for CommandSettings {
    fn default() -> Self {
        Self {
            default_workflow: default_workflow(),
        }
    }
}

/// Everything a handler may use while executing one command.
pub struct CommandContext<'a> {
    pub repository: &'a Repository,
    pub repo: RepositoryRef,
    pub event: &'a EventContext,
    pub operations: &'a dyn RepositoryOperations,
    pub settings: &'a CommandSettings,
}

impl<'a> CommandContext<'a> {
    pub fn new(
        repository: &'a Repository,
        event: &'a EventContext,
        operations: &'a dyn RepositoryOperations,
        settings: &'a CommandSettings,
    ) -> Self {
        Self {
            repository,
            repo: repository.repository_ref(),
            event,
            operations,
            settings,
        }
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
