//! Installation-scoped access to GitHub API operations.
//!
//! An [`InstallationClient`] is bound to one installation id and authenticates
//! every request with that installation's token (never with an app JWT).

use async_trait::async_trait;
use reqwest::Method;
use std::sync::Arc;
use tracing::warn;

use crate::auth::{AuthenticationProvider, InstallationId};
use crate::client::{
    CombinedStatus, GitHubClient, Issue, MergePullRequestRequest, MergeResult, PullRequest,
    Repository, RepositoryOperations, RepositoryRef, Workflow,
};
use crate::error::{ApiError, AuthError};

/// GitHub API client bound to a single installation.
#[derive(Clone)]
pub struct InstallationClient {
    client: Arc<GitHubClient>,
    auth: Arc<dyn AuthenticationProvider>,
    installation_id: InstallationId,
}

impl InstallationClient {
    pub fn new(
        client: Arc<GitHubClient>,
        auth: Arc<dyn AuthenticationProvider>,
        installation_id: InstallationId,
    ) -> Self {
        Self {
            client,
            auth,
            installation_id,
        }
    }

    pub fn installation_id(&self) -> InstallationId {
        self.installation_id
    }

    pub(crate) fn client(&self) -> &GitHubClient {
        &self.client
    }

    /// Build a request carrying the installation token.
    pub(crate) async fn authorized(
        &self,
        method: Method,
        path: &str,
    ) -> Result<reqwest::RequestBuilder, ApiError> {
        let token = self
            .auth
            .installation_token(self.installation_id)
            .await
            .map_err(|e| {
                warn!(
                    installation_id = %self.installation_id,
                    error = %e,
                    "No installation token for request"
                );
                ApiError::TokenUnavailable {
                    message: e.to_string(),
                }
            })?;

        Ok(self.client.request(method, path).bearer_auth(token))
    }
}

impl std::fmt::Debug for InstallationClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstallationClient")
            .field("installation_id", &self.installation_id)
            .field("auth", &"<AuthenticationProvider>")
            .finish()
    }
}

#[async_trait]
impl RepositoryOperations for InstallationClient {
    async fn get_repository(&self, repo: &RepositoryRef) -> Result<Repository, ApiError> {
        InstallationClient::get_repository(self, repo).await
    }

    async fn get_pull_request(
        &self,
        repo: &RepositoryRef,
        number: u64,
    ) -> Result<PullRequest, ApiError> {
        InstallationClient::get_pull_request(self, repo, number).await
    }

    async fn get_issue(&self, repo: &RepositoryRef, number: u64) -> Result<Issue, ApiError> {
        InstallationClient::get_issue(self, repo, number).await
    }

    async fn list_workflows(&self, repo: &RepositoryRef) -> Result<Vec<Workflow>, ApiError> {
        InstallationClient::list_workflows(self, repo).await
    }

    async fn trigger_workflow(
        &self,
        repo: &RepositoryRef,
        workflow_id: u64,
        git_ref: &str,
    ) -> Result<bool, ApiError> {
        InstallationClient::trigger_workflow(self, repo, workflow_id, git_ref).await
    }

    async fn get_combined_status(
        &self,
        repo: &RepositoryRef,
        sha: &str,
    ) -> Result<CombinedStatus, ApiError> {
        InstallationClient::get_combined_status(self, repo, sha).await
    }

    async fn merge_pull_request(
        &self,
        repo: &RepositoryRef,
        number: u64,
        request: &MergePullRequestRequest,
    ) -> Result<MergeResult, ApiError> {
        InstallationClient::merge_pull_request(self, repo, number, request).await
    }

    async fn create_comment(
        &self,
        repo: &RepositoryRef,
        issue_number: u64,
        body: &str,
    ) -> Result<(), ApiError> {
        InstallationClient::create_comment(self, repo, issue_number, body).await
    }
}

/// Hands out authenticated repository clients per installation.
#[async_trait]
pub trait RepositoryClientProvider: Send + Sync {
    /// Get a client for an installation.
    ///
    /// Fails when no installation token can be obtained, so callers learn about
    /// authentication problems before issuing any repository call.
    async fn for_installation(
        &self,
        installation_id: InstallationId,
    ) -> Result<Arc<dyn RepositoryOperations>, AuthError>;
}

/// Production [`RepositoryClientProvider`] backed by [`InstallationClient`].
#[derive(Clone)]
pub struct InstallationClients {
    client: Arc<GitHubClient>,
    auth: Arc<dyn AuthenticationProvider>,
}

impl InstallationClients {
    pub fn new(client: Arc<GitHubClient>, auth: Arc<dyn AuthenticationProvider>) -> Self {
        Self { client, auth }
    }

    /// Look up which installation of this app covers a repository.
    pub async fn installation_id_for_repo(
        &self,
        repo: &RepositoryRef,
    ) -> Result<InstallationId, ApiError> {
        let assertion = self
            .auth
            .app_token()
            .await
            .map_err(|e| ApiError::TokenUnavailable {
                message: e.to_string(),
            })?;

        self.client.installation_id_for_repo(&assertion, repo).await
    }
}

#[async_trait]
impl RepositoryClientProvider for InstallationClients {
    async fn for_installation(
        &self,
        installation_id: InstallationId,
    ) -> Result<Arc<dyn RepositoryOperations>, AuthError> {
        self.auth.installation_token(installation_id).await?;

        Ok(Arc::new(InstallationClient::new(
            self.client.clone(),
            self.auth.clone(),
            installation_id,
        )))
    }
}

#[cfg(test)]
#[path = "installation_tests.rs"]
mod tests;
