//! Pull request types and operations.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::client::{
    error_from_response, github_error_message, InstallationClient, IssueUser, RepositoryRef,
};
use crate::error::{ApiError, ValidationError};

/// GitHub pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub state: String, // "open", "closed"
    pub user: IssueUser,
    pub head: PullRequestBranch,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub merged: bool,
    /// `None` while GitHub is still computing mergeability.
    #[serde(default)]
    pub mergeable: Option<bool>,
    #[serde(default)]
    pub changed_files: u64,
    #[serde(default)]
    pub additions: u64,
    #[serde(default)]
    pub deletions: u64,
    #[serde(default)]
    pub html_url: String,
}

/// Head or base branch of a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestBranch {
    #[serde(rename = "ref")]
    pub branch_ref: String,
    pub sha: String,
}

/// Merge strategy for a pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeMethod {
    Merge,
    #[default]
    Squash,
    Rebase,
}

impl MergeMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Merge => "merge",
            Self::Squash => "squash",
            Self::Rebase => "rebase",
        }
    }
}

impl std::fmt::Display for MergeMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MergeMethod {
    type Err = ValidationError;

    /// Case-insensitive, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "merge" => Ok(Self::Merge),
            "squash" => Ok(Self::Squash),
            "rebase" => Ok(Self::Rebase),
            _ => Err(ValidationError::InvalidFormat {
                field: "merge_method".to_string(),
                message: format!("expected squash, merge or rebase, got '{}'", s),
            }),
        }
    }
}

/// Request body for merging a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergePullRequestRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_message: Option<String>,

    pub merge_method: MergeMethod,
}

/// Outcome of a merge attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeResult {
    pub merged: bool,
    #[serde(default)]
    pub sha: Option<String>,
    #[serde(default)]
    pub message: String,
}

impl InstallationClient {
    /// Get a pull request by number.
    pub async fn get_pull_request(
        &self,
        repo: &RepositoryRef,
        number: u64,
    ) -> Result<PullRequest, ApiError> {
        let path = format!("repos/{}/{}/pulls/{}", repo.owner, repo.name, number);
        let request = self.authorized(Method::GET, &path).await?;
        self.client().send_json(request).await
    }

    /// Merge a pull request.
    ///
    /// GitHub answers 405 when the pull request is not mergeable and 409 when
    /// the head moved; both come back as an unmerged [`MergeResult`] rather
    /// than an error.
    pub async fn merge_pull_request(
        &self,
        repo: &RepositoryRef,
        number: u64,
        merge: &MergePullRequestRequest,
    ) -> Result<MergeResult, ApiError> {
        let path = format!("repos/{}/{}/pulls/{}/merge", repo.owner, repo.name, number);
        let request = self.authorized(Method::PUT, &path).await?.json(merge);

        let response = request.send().await.map_err(ApiError::from_transport)?;
        let status = response.status().as_u16();

        match status {
            200..=299 => {
                let body = response.bytes().await.map_err(ApiError::from_transport)?;
                Ok(serde_json::from_slice(&body)?)
            }
            405 | 409 => {
                let body = response.text().await.unwrap_or_default();
                Ok(MergeResult {
                    merged: false,
                    sha: None,
                    message: github_error_message(&body),
                })
            }
            _ => Err(error_from_response(response).await),
        }
    }
}

#[cfg(test)]
#[path = "pull_request_tests.rs"]
mod tests;
