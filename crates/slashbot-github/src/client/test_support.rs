//! Shared fixtures for client tests.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::auth::{AuthenticationProvider, GitHubAppId, InstallationId, JsonWebToken};
use crate::client::{ClientConfig, GitHubClient, InstallationClient};
use crate::error::{ApiError, AuthError};

pub const TEST_TOKEN: &str = "ghs_test_installation_token";
pub const TEST_JWT: &str = "test.app.jwt";

/// Authentication provider returning fixed credentials.
pub struct StaticAuthProvider {
    pub fail: bool,
    pub installation_calls: AtomicUsize,
}

impl StaticAuthProvider {
    pub fn new() -> Self {
        Self {
            fail: false,
            installation_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            installation_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl AuthenticationProvider for StaticAuthProvider {
    async fn app_token(&self) -> Result<JsonWebToken, AuthError> {
        let now = Utc::now();
        Ok(JsonWebToken::new(
            TEST_JWT.to_string(),
            GitHubAppId::new(1),
            now,
            now + Duration::minutes(10),
        ))
    }

    async fn installation_token(
        &self,
        installation_id: InstallationId,
    ) -> Result<String, AuthError> {
        self.installation_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(AuthError::IdentityExchange {
                installation_id,
                source: ApiError::NotFound,
            });
        }
        Ok(TEST_TOKEN.to_string())
    }
}

pub fn github_client(base_url: &str) -> Arc<GitHubClient> {
    let config = ClientConfig::default()
        .with_github_api_url(base_url)
        .with_timeout(std::time::Duration::from_secs(5));
    Arc::new(GitHubClient::new(config).unwrap())
}

pub fn installation_client(base_url: &str) -> InstallationClient {
    InstallationClient::new(
        github_client(base_url),
        Arc::new(StaticAuthProvider::new()),
        InstallationId::new(42),
    )
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}
