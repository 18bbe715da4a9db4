//! Tests for the GitHub client and identity exchange.

use super::*;
use crate::client::test_support::{bearer, github_client, TEST_JWT};
use crate::auth::GitHubAppId;
use chrono::{Duration as ChronoDuration, Utc};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn assertion() -> JsonWebToken {
    let now = Utc::now();
    JsonWebToken::new(
        TEST_JWT.to_string(),
        GitHubAppId::new(1),
        now,
        now + ChronoDuration::minutes(10),
    )
}

mod config_tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();

        assert_eq!(config.github_api_url, "https://api.github.com");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("slashbot/"));
    }

    #[test]
    fn test_config_overrides() {
        let config = ClientConfig::default()
            .with_user_agent("custom-agent")
            .with_timeout(Duration::from_secs(3))
            .with_github_api_url("https://github.example.com/api/v3");

        assert_eq!(config.user_agent, "custom-agent");
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.github_api_url, "https://github.example.com/api/v3");
    }

    #[test]
    fn test_github_error_message_prefers_message_field() {
        let body = r#"{"message":"Bad credentials","documentation_url":"https://docs"}"#;
        assert_eq!(github_error_message(body), "Bad credentials");
        assert_eq!(github_error_message("plain text"), "plain text");
    }
}

mod exchange_tests {
    use super::*;

    /// The assertion is sent as a bearer token and the token string is returned.
    #[tokio::test]
    async fn test_exchange_returns_installation_token() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/app/installations/42/access_tokens"))
            .and(header("Authorization", bearer(TEST_JWT)))
            .and(header("Accept", "application/vnd.github+json"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "token": "ghs_minted",
                "expires_at": "2030-01-01T00:00:00Z"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = github_client(&mock_server.uri());
        let token = client
            .exchange(&assertion(), InstallationId::new(42))
            .await
            .unwrap();

        assert_eq!(token, "ghs_minted");
    }

    #[tokio::test]
    async fn test_exchange_maps_unknown_installation_to_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/app/installations/7/access_tokens"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "message": "Not Found"
            })))
            .mount(&mock_server)
            .await;

        let client = github_client(&mock_server.uri());
        let result = client.exchange(&assertion(), InstallationId::new(7)).await;

        assert!(matches!(result, Err(ApiError::NotFound)));
    }

    #[tokio::test]
    async fn test_exchange_server_error_is_transient() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/app/installations/7/access_tokens"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .mount(&mock_server)
            .await;

        let client = github_client(&mock_server.uri());
        let error = client
            .exchange(&assertion(), InstallationId::new(7))
            .await
            .unwrap_err();

        assert!(matches!(error, ApiError::HttpError { status: 503, .. }));
        assert!(error.is_transient());
    }

    /// A response slower than the configured timeout is reported as a timeout.
    #[tokio::test]
    async fn test_exchange_times_out() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/app/installations/7/access_tokens"))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(serde_json::json!({ "token": "late" }))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&mock_server)
            .await;

        let config = ClientConfig::default()
            .with_github_api_url(mock_server.uri())
            .with_timeout(Duration::from_millis(100));
        let client = GitHubClient::new(config).unwrap();

        let result = client.exchange(&assertion(), InstallationId::new(7)).await;
        assert!(matches!(result, Err(ApiError::Timeout)));
    }
}

mod installation_lookup_tests {
    use super::*;

    #[tokio::test]
    async fn test_installation_id_for_repo() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/octocat/hello-world/installation"))
            .and(header("Authorization", bearer(TEST_JWT)))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 1234,
                "account": { "login": "octocat" }
            })))
            .mount(&mock_server)
            .await;

        let client = github_client(&mock_server.uri());
        let id = client
            .installation_id_for_repo(&assertion(), &RepositoryRef::new("octocat", "hello-world"))
            .await
            .unwrap();

        assert_eq!(id, InstallationId::new(1234));
    }
}
