//! Common test utilities for slashbot integration tests
//!
//! Builds the production object graph (token manager, GitHub client, command
//! dispatcher, event router, HTTP router) against a `wiremock` stand-in for
//! the GitHub REST API.

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use slashbot_api::{create_router, AppState, ServiceConfig};
use slashbot_core::{CommandDispatcher, EventRouter};
use slashbot_github::{
    AuthConfig, ClientConfig, GitHubAppId, GitHubClient, InMemoryTokenCache, InstallationClients,
    InstallationTokenManager, PrivateKey, RS256JwtGenerator,
};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const WEBHOOK_SECRET: &str = "integration-secret";
pub const INSTALLATION_ID: u64 = 42;
pub const INSTALLATION_TOKEN: &str = "ghs_integrationtoken";
pub const OWNER: &str = "octocat";
pub const REPO: &str = "hello-world";

const TEST_KEY: &str = include_str!("../../../slashbot-github/testdata/app-key.pem");

/// Running service plus the mocked GitHub API behind it.
pub struct TestApp {
    pub router: Router,
    pub github: MockServer,
}

impl TestApp {
    pub async fn start() -> Self {
        let github = MockServer::start().await;

        let mut config = ServiceConfig::default();
        config.github.app_id = Some(12345);
        config.github.webhook_secret = Some(WEBHOOK_SECRET.to_string());
        config.github.api_url = github.uri();

        let client = Arc::new(
            GitHubClient::new(
                ClientConfig::default()
                    .with_timeout(Duration::from_secs(5))
                    .with_github_api_url(github.uri()),
            )
            .unwrap(),
        );
        let jwt_generator =
            RS256JwtGenerator::new(PrivateKey::from_pem(TEST_KEY).unwrap()).unwrap();
        let token_manager = Arc::new(
            InstallationTokenManager::new(
                GitHubAppId::new(12345),
                Arc::new(jwt_generator),
                client.clone(),
                Arc::new(InMemoryTokenCache::new()),
                AuthConfig::default(),
            )
            .unwrap(),
        );

        let clients = Arc::new(InstallationClients::new(client, token_manager));
        let dispatcher = Arc::new(CommandDispatcher::with_builtin_commands(
            config.commands.clone(),
        ));
        let commands = dispatcher
            .commands()
            .into_iter()
            .map(str::to_string)
            .collect();
        let processor = Arc::new(EventRouter::new(clients, dispatcher));

        let router = create_router(AppState::new(config, processor, commands));

        Self { router, github }
    }

    /// Send a request through the router and decode the JSON response body.
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    /// POST a correctly signed webhook.
    pub async fn deliver(&self, event: &str, payload: &serde_json::Value) -> (StatusCode, serde_json::Value) {
        let body = payload.to_string();
        let signature = sign(body.as_bytes());
        self.send(webhook_request(event, body, Some(&signature))).await
    }

    /// Wait until the mock GitHub has received `count` requests matching
    /// `method_name` and `request_path`, or give up after two seconds.
    pub async fn wait_for_request(&self, method_name: &str, request_path: &str, count: usize) -> bool {
        for _ in 0..40 {
            if self.count_requests(method_name, request_path).await >= count {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        false
    }

    pub async fn count_requests(&self, method_name: &str, request_path: &str) -> usize {
        self.github
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.method.as_str() == method_name && r.url.path() == request_path)
            .count()
    }

    pub async fn request_bodies(&self, method_name: &str, request_path: &str) -> Vec<serde_json::Value> {
        self.github
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.method.as_str() == method_name && r.url.path() == request_path)
            .filter_map(|r| serde_json::from_slice(&r.body).ok())
            .collect()
    }

    pub async fn mock_token_exchange(&self) {
        Mock::given(method("POST"))
            .and(path(format!(
                "/app/installations/{}/access_tokens",
                INSTALLATION_ID
            )))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "token": INSTALLATION_TOKEN,
                "expires_at": "2099-01-01T00:00:00Z"
            })))
            .mount(&self.github)
            .await;
    }

    pub async fn mock_pull_request(&self, number: u64) {
        Mock::given(method("GET"))
            .and(path(format!("/repos/{}/{}/pulls/{}", OWNER, REPO, number)))
            .respond_with(ResponseTemplate::new(200).set_body_json(pull_request_json(number)))
            .mount(&self.github)
            .await;
    }

    pub async fn mock_combined_status(&self, state: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/repos/{}/{}/commits/deadbeef/status", OWNER, REPO)))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "state": state,
                "sha": "deadbeef",
                "statuses": [
                    { "context": "ci/build", "state": state, "description": "Build" }
                ]
            })))
            .mount(&self.github)
            .await;
    }

    pub async fn mock_comments(&self, number: u64) {
        Mock::given(method("POST"))
            .and(path(comments_path(number)))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({ "id": 1 })))
            .mount(&self.github)
            .await;
    }
}

pub fn comments_path(number: u64) -> String {
    format!("/repos/{}/{}/issues/{}/comments", OWNER, REPO, number)
}

pub fn sign(body: &[u8]) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(WEBHOOK_SECRET.as_bytes()).unwrap();
    mac.update(body);
    format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
}

pub fn webhook_request(event: &str, body: String, signature: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/webhook")
        .header("content-type", "application/json")
        .header("x-github-event", event)
        .header("x-github-delivery", "d5e8a4f0-0000-4000-8000-000000000001");

    if let Some(signature) = signature {
        builder = builder.header("x-hub-signature-256", signature);
    }

    builder.body(Body::from(body)).unwrap()
}

pub fn repository_json() -> serde_json::Value {
    serde_json::json!({
        "id": 1296269,
        "name": REPO,
        "full_name": format!("{}/{}", OWNER, REPO),
        "owner": { "login": OWNER, "id": 1 },
        "private": false,
        "default_branch": "main",
        "html_url": format!("https://github.com/{}/{}", OWNER, REPO)
    })
}

pub fn pull_request_json(number: u64) -> serde_json::Value {
    serde_json::json!({
        "number": number,
        "title": "Add feature",
        "state": "open",
        "user": { "login": "alice", "id": 10 },
        "head": { "ref": "feature", "sha": "deadbeef" },
        "mergeable": true,
        "changed_files": 3,
        "additions": 40,
        "deletions": 2,
        "html_url": format!("https://github.com/{}/{}/pull/{}", OWNER, REPO, number)
    })
}

pub fn issue_comment_event(number: u64, body: &str, on_pull_request: bool) -> serde_json::Value {
    let mut issue = serde_json::json!({ "number": number });
    if on_pull_request {
        issue["pull_request"] = serde_json::json!({ "url": "https://api.github.com/pulls/1" });
    }

    serde_json::json!({
        "action": "created",
        "comment": { "body": body, "user": { "login": "alice", "id": 10 } },
        "issue": issue,
        "repository": repository_json(),
        "installation": { "id": INSTALLATION_ID }
    })
}
