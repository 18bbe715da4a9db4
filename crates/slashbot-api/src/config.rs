//! Configuration types for the HTTP service

use serde::{Deserialize, Serialize};
use slashbot_core::CommandSettings;

use crate::errors::ConfigError;

/// Service configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ServiceConfig {
    /// HTTP server settings
    pub server: ServerConfig,

    /// GitHub App credentials and API settings
    pub github: GitHubConfig,

    /// Slash command settings
    pub commands: CommandSettings,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl ServiceConfig {
    /// Check that everything required to serve webhooks is present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` for an absent application id, private key
    /// path or webhook secret, and `ConfigError::Invalid` for unusable values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.github.app_id.is_none() {
            return Err(ConfigError::Missing {
                key: "github.app_id".to_string(),
            });
        }

        if self.github.private_key_path.as_deref().is_none_or(str::is_empty) {
            return Err(ConfigError::Missing {
                key: "github.private_key_path".to_string(),
            });
        }

        if self.github.webhook_secret.as_deref().is_none_or(str::is_empty) {
            return Err(ConfigError::Missing {
                key: "github.webhook_secret".to_string(),
            });
        }

        if self.github.request_timeout_seconds == 0 {
            return Err(ConfigError::Invalid {
                message: "github.request_timeout_seconds must be greater than zero".to_string(),
            });
        }

        if self.github.token_refresh_margin_seconds >= self.github.token_lifetime_seconds {
            return Err(ConfigError::Invalid {
                message: "github.token_refresh_margin_seconds must be shorter than github.token_lifetime_seconds"
                    .to_string(),
            });
        }

        if self.server.max_body_size == 0 {
            return Err(ConfigError::Invalid {
                message: "server.max_body_size must be greater than zero".to_string(),
            });
        }

        if self.commands.default_workflow.trim().is_empty() {
            return Err(ConfigError::Invalid {
                message: "commands.default_workflow must not be empty".to_string(),
            });
        }

        Ok(())
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout_seconds: u64,

    /// Maximum request size in bytes
    pub max_body_size: usize,

    /// Comma-separated CORS origins; `*` allows any origin
    pub allowed_origins: String,
}

impl ServerConfig {
    /// Explicit CORS origins, or `None` when any origin is allowed.
    pub fn cors_origins(&self) -> Option<Vec<String>> {
        if self.allowed_origins.trim() == "*" {
            return None;
        }

        Some(
            self.allowed_origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            shutdown_timeout_seconds: 30,
            max_body_size: 10 * 1024 * 1024, // 10MB
            allowed_origins: "*".to_string(),
        }
    }
}

/// GitHub App configuration
#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GitHubConfig {
    /// GitHub App id
    pub app_id: Option<u64>,

    /// Path to the App's PEM private key
    pub private_key_path: Option<String>,

    /// Shared webhook secret
    pub webhook_secret: Option<String>,

    /// REST API base URL
    pub api_url: String,

    /// Timeout for each GitHub API call
    pub request_timeout_seconds: u64,

    /// Installation token lifetime assumed after an exchange
    pub token_lifetime_seconds: u64,

    /// Tokens this close to expiry are refreshed
    pub token_refresh_margin_seconds: u64,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            app_id: None,
            private_key_path: None,
            webhook_secret: None,
            api_url: "https://api.github.com".to_string(),
            request_timeout_seconds: 30,
            token_lifetime_seconds: 3600,
            token_refresh_margin_seconds: 60,
        }
    }
}

impl std::fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubConfig")
            .field("app_id", &self.app_id)
            .field("private_key_path", &self.private_key_path)
            .field(
                "webhook_secret",
                &self.webhook_secret.as_ref().map(|_| "<REDACTED>"),
            )
            .field("api_url", &self.api_url)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .field("token_lifetime_seconds", &self.token_lifetime_seconds)
            .field(
                "token_refresh_margin_seconds",
                &self.token_refresh_margin_seconds,
            )
            .finish()
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Logging level, used when `RUST_LOG` is not set
    pub level: String,

    /// Enable JSON structured logging
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
