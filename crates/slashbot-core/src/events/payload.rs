//! Typed views of the webhook payloads slashbot reacts to.
//!
//! Only the fields used for routing are modelled; everything else in the
//! payload is ignored.

use serde::Deserialize;
use slashbot_github::auth::InstallationId;
use slashbot_github::client::{IssueUser, Repository};

#[derive(Debug, Clone, Deserialize)]
pub struct InstallationRef {
    pub id: u64,
}

/// Fields shared by every routed event.
#[derive(Debug, Clone, Deserialize)]
pub struct EventHeader {
    #[serde(default)]
    pub installation: Option<InstallationRef>,
}

impl EventHeader {
    pub fn installation_id(&self) -> Option<InstallationId> {
        self.installation.as_ref().map(|i| InstallationId::new(i.id))
    }
}

/// `issue_comment` event.
#[derive(Debug, Clone, Deserialize)]
pub struct IssueCommentEvent {
    pub action: String,
    pub comment: CommentPayload,
    pub issue: CommentedIssue,
    pub repository: Repository,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentPayload {
    #[serde(default)]
    pub body: Option<String>,
    pub user: IssueUser,
}

/// The issue a comment belongs to. Pull requests are issues carrying a
/// `pull_request` link object.
#[derive(Debug, Clone, Deserialize)]
pub struct CommentedIssue {
    pub number: u64,
    #[serde(default)]
    pub pull_request: Option<serde_json::Value>,
}

impl CommentedIssue {
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}

/// `pull_request` event.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestEvent {
    pub action: String,
    pub number: u64,
    pub repository: Repository,
}

/// `push` event.
#[derive(Debug, Clone, Deserialize)]
pub struct PushEvent {
    #[serde(rename = "ref")]
    pub git_ref: String,
    #[serde(default)]
    pub pusher: Option<Pusher>,
    #[serde(default)]
    pub commits: Vec<serde_json::Value>,
    pub repository: Repository,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Pusher {
    pub name: String,
}

impl PushEvent {
    pub fn pusher_name(&self) -> &str {
        self.pusher.as_ref().map_or("unknown", |p| p.name.as_str())
    }

    /// True when the push targets the repository's default branch.
    pub fn is_default_branch(&self) -> bool {
        self.git_ref
            .strip_prefix("refs/heads/")
            .is_some_and(|branch| branch == self.repository.default_branch)
    }
}

#[cfg(test)]
#[path = "payload_tests.rs"]
mod tests;
