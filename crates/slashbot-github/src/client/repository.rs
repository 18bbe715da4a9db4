//! Repository and commit status types and operations.

use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::client::InstallationClient;
use crate::error::{ApiError, ValidationError};

/// Owner and name of a repository, as used in API paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepositoryRef {
    pub owner: String,
    pub name: String,
}

impl RepositoryRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Parse an `owner/name` full name.
    ///
    /// # Examples
    ///
    /// ```
    /// use slashbot_github::client::RepositoryRef;
    ///
    /// let repo = RepositoryRef::parse("octocat/hello-world").unwrap();
    /// assert_eq!(repo.owner, "octocat");
    /// assert_eq!(repo.name, "hello-world");
    /// assert!(RepositoryRef::parse("no-slash").is_err());
    /// ```
    pub fn parse(full_name: &str) -> Result<Self, ValidationError> {
        match full_name.split_once('/') {
            Some((owner, name))
                if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
            {
                Ok(Self::new(owner, name))
            }
            _ => Err(ValidationError::InvalidFormat {
                field: "repository".to_string(),
                message: format!("expected 'owner/name', got '{}'", full_name),
            }),
        }
    }
}

impl std::fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// GitHub repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub owner: RepositoryOwner,
    #[serde(default)]
    pub private: bool,
    pub default_branch: String,
    #[serde(default)]
    pub html_url: String,
}

impl Repository {
    /// The owner/name pair for API paths.
    pub fn repository_ref(&self) -> RepositoryRef {
        RepositoryRef::new(self.owner.login.clone(), self.name.clone())
    }
}

/// Repository owner (user or organization).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryOwner {
    pub login: String,
    #[serde(default)]
    pub id: u64,
}

/// Combined status of all commit statuses for a ref.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinedStatus {
    /// "success", "pending" or "failure"
    pub state: String,
    #[serde(default)]
    pub sha: String,
    #[serde(default)]
    pub statuses: Vec<CommitStatus>,
}

/// Individual commit status reported by a CI context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitStatus {
    pub context: String,
    /// "error", "failure", "pending" or "success"
    pub state: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl InstallationClient {
    /// Get repository details.
    pub async fn get_repository(&self, repo: &RepositoryRef) -> Result<Repository, ApiError> {
        let path = format!("repos/{}/{}", repo.owner, repo.name);
        let request = self.authorized(Method::GET, &path).await?;
        self.client().send_json(request).await
    }

    /// Get the combined status for a ref or commit SHA.
    pub async fn get_combined_status(
        &self,
        repo: &RepositoryRef,
        sha: &str,
    ) -> Result<CombinedStatus, ApiError> {
        let path = format!("repos/{}/{}/commits/{}/status", repo.owner, repo.name, sha);
        let request = self.authorized(Method::GET, &path).await?;
        self.client().send_json(request).await
    }
}

#[cfg(test)]
#[path = "repository_tests.rs"]
mod tests;
