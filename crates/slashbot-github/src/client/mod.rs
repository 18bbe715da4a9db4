//! GitHub API client for authenticated operations.
//!
//! [`GitHubClient`] owns the HTTP client and performs app-level calls that are
//! authenticated with an app assertion: the installation token exchange and the
//! repository installation lookup. [`InstallationClient`] performs the
//! repository calls the bot commands need, authenticated with an installation
//! token, and implements [`RepositoryOperations`].

mod installation;
mod issue;
mod pull_request;
mod repository;
mod workflow;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::ACCEPT;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::auth::{IdentityExchange, InstallationId, JsonWebToken};
use crate::error::ApiError;

pub use installation::{InstallationClient, InstallationClients, RepositoryClientProvider};
pub use issue::{CreateCommentRequest, Issue, IssueUser, Label};
pub use pull_request::{
    MergeMethod, MergePullRequestRequest, MergeResult, PullRequest, PullRequestBranch,
};
pub use repository::{CombinedStatus, CommitStatus, Repository, RepositoryOwner, RepositoryRef};
pub use workflow::{TriggerWorkflowRequest, Workflow};

const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";
const GITHUB_API_VERSION: &str = "2022-11-28";

/// Configuration for the GitHub API client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// User agent sent with every request (GitHub rejects requests without one)
    pub user_agent: String,

    /// Per-request timeout; a timed-out request is a failure
    pub timeout: Duration,

    /// GitHub API base URL (for GitHub Enterprise support)
    pub github_api_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("slashbot/{}", env!("CARGO_PKG_VERSION")),
            timeout: Duration::from_secs(30),
            github_api_url: "https://api.github.com".to_string(),
        }
    }
}

impl ClientConfig {
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_github_api_url(mut self, url: impl Into<String>) -> Self {
        self.github_api_url = url.into();
        self
    }
}

/// Repository operations used by the bot commands.
///
/// Implemented by [`InstallationClient`] in production and by recording mocks
/// in tests.
#[async_trait]
pub trait RepositoryOperations: Send + Sync {
    async fn get_repository(&self, repo: &RepositoryRef) -> Result<Repository, ApiError>;

    async fn get_pull_request(
        &self,
        repo: &RepositoryRef,
        number: u64,
    ) -> Result<PullRequest, ApiError>;

    async fn get_issue(&self, repo: &RepositoryRef, number: u64) -> Result<Issue, ApiError>;

    /// Workflows in listing order.
    async fn list_workflows(&self, repo: &RepositoryRef) -> Result<Vec<Workflow>, ApiError>;

    /// Request a `workflow_dispatch` run. Returns whether GitHub accepted it.
    async fn trigger_workflow(
        &self,
        repo: &RepositoryRef,
        workflow_id: u64,
        git_ref: &str,
    ) -> Result<bool, ApiError>;

    /// Combined commit status for a ref or SHA.
    async fn get_combined_status(
        &self,
        repo: &RepositoryRef,
        sha: &str,
    ) -> Result<CombinedStatus, ApiError>;

    async fn merge_pull_request(
        &self,
        repo: &RepositoryRef,
        number: u64,
        request: &MergePullRequestRequest,
    ) -> Result<MergeResult, ApiError>;

    /// Post a comment on an issue or pull request.
    async fn create_comment(
        &self,
        repo: &RepositoryRef,
        issue_number: u64,
        body: &str,
    ) -> Result<(), ApiError>;
}

/// Low-level GitHub API client.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http_client: reqwest::Client,
    config: ClientConfig,
}

#[derive(Debug, Deserialize)]
struct AccessTokenResponse {
    token: String,
    #[serde(default)]
    expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct InstallationResponse {
    id: u64,
}

impl GitHubClient {
    /// Create a client from configuration.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            http_client,
            config,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Look up the installation of this app on a repository.
    ///
    /// Authenticated with an app assertion.
    pub async fn installation_id_for_repo(
        &self,
        assertion: &JsonWebToken,
        repo: &RepositoryRef,
    ) -> Result<InstallationId, ApiError> {
        let path = format!("repos/{}/{}/installation", repo.owner, repo.name);
        let request = self
            .request(Method::GET, &path)
            .bearer_auth(assertion.token());

        let installation: InstallationResponse = self.send_json(request).await?;
        Ok(InstallationId::new(installation.id))
    }

    /// Build a request against the API base URL with GitHub's standard headers.
    pub(crate) fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let normalized_path = path.strip_prefix('/').unwrap_or(path);
        let url = format!(
            "{}/{}",
            self.config.github_api_url.trim_end_matches('/'),
            normalized_path
        );

        self.http_client
            .request(method, url)
            .header(ACCEPT, GITHUB_MEDIA_TYPE)
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION)
    }

    /// Send a request and fail on any non-success status.
    pub(crate) async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, ApiError> {
        let response = request.send().await.map_err(ApiError::from_transport)?;

        if response.status().is_success() {
            Ok(response)
        } else {
            Err(error_from_response(response).await)
        }
    }

    /// Send a request and decode a JSON success body.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        let body = response.bytes().await.map_err(ApiError::from_transport)?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl IdentityExchange for GitHubClient {
    async fn exchange(
        &self,
        assertion: &JsonWebToken,
        installation_id: InstallationId,
    ) -> Result<String, ApiError> {
        let path = format!("app/installations/{}/access_tokens", installation_id);
        let request = self
            .request(Method::POST, &path)
            .bearer_auth(assertion.token());

        let response: AccessTokenResponse = self.send_json(request).await?;

        debug!(
            installation_id = %installation_id,
            github_expires_at = ?response.expires_at,
            "Exchanged app assertion for installation token"
        );

        Ok(response.token)
    }
}

/// Convert a failed response into an error, preferring GitHub's `message`
/// field over the raw body.
pub(crate) async fn error_from_response(response: reqwest::Response) -> ApiError {
    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unable to read error body".to_string());

    ApiError::from_status(status, github_error_message(&body))
}

pub(crate) fn github_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

#[cfg(test)]
#[path = "test_support.rs"]
pub(crate) mod test_support;
