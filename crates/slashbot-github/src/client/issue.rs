//! Issue and comment types and operations.

use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::client::{InstallationClient, RepositoryRef};
use crate::error::ApiError;

/// GitHub issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    pub state: String, // "open" or "closed"
    pub user: IssueUser,
    #[serde(default)]
    pub labels: Vec<Label>,
    /// Number of comments on the issue.
    #[serde(default)]
    pub comments: u64,
    #[serde(default)]
    pub html_url: String,
}

/// User reference in issues and pull requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueUser {
    pub login: String,
    #[serde(default)]
    pub id: u64,
    /// Account type: "User", "Bot" or "Organization".
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub account_type: Option<String>,
}

impl IssueUser {
    /// True for GitHub App and other bot accounts.
    pub fn is_bot(&self) -> bool {
        self.account_type.as_deref() == Some("Bot")
    }
}

/// Issue label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
    #[serde(default)]
    pub color: String,
}

/// Request body for creating a comment.
#[derive(Debug, Clone, Serialize)]
pub struct CreateCommentRequest<'a> {
    pub body: &'a str,
}

impl InstallationClient {
    /// Get an issue by number.
    pub async fn get_issue(&self, repo: &RepositoryRef, number: u64) -> Result<Issue, ApiError> {
        let path = format!("repos/{}/{}/issues/{}", repo.owner, repo.name, number);
        let request = self.authorized(Method::GET, &path).await?;
        self.client().send_json(request).await
    }

    /// Create a comment on an issue or pull request.
    pub async fn create_comment(
        &self,
        repo: &RepositoryRef,
        issue_number: u64,
        body: &str,
    ) -> Result<(), ApiError> {
        let path = format!(
            "repos/{}/{}/issues/{}/comments",
            repo.owner, repo.name, issue_number
        );
        let request = self
            .authorized(Method::POST, &path)
            .await?
            .json(&CreateCommentRequest { body });

        self.client().send(request).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "issue_tests.rs"]
mod tests;
