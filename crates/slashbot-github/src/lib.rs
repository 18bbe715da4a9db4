//! # slashbot GitHub integration
//!
//! GitHub App plumbing used by the slashbot service:
//! - GitHub App authentication with JWT assertions and cached installation tokens
//! - Webhook signature verification (`sha256=` and legacy `sha1=` schemes)
//! - A REST client exposing the repository operations commands need
//!
//! # Examples
//!
//! ## Identifiers
//!
//! ```rust
//! use slashbot_github::auth::{GitHubAppId, InstallationId};
//!
//! let app_id = GitHubAppId::new(123456);
//! let installation_id: InstallationId = "789012".parse().unwrap();
//!
//! assert_eq!(app_id.as_u64(), 123456);
//! assert_eq!(installation_id.to_string(), "789012");
//! ```
//!
//! ## Verifying a webhook
//!
//! ```rust
//! use slashbot_github::webhook::{verify_signature, SignatureScheme};
//!
//! let payload = br#"{"action":"created"}"#;
//! let valid = verify_signature(
//!     payload,
//!     Some("sha256=0000000000000000000000000000000000000000000000000000000000000000"),
//!     Some("secret"),
//!     SignatureScheme::Sha256,
//! );
//! assert!(!valid);
//! ```

pub mod auth;
pub mod client;
pub mod error;
pub mod webhook;

pub use error::{ApiError, AuthError, CacheError, ValidationError};

pub use auth::{
    AuthConfig, AuthenticationProvider, GitHubAppId, IdentityExchange, InMemoryTokenCache,
    InstallationId, InstallationToken, InstallationTokenManager, JsonWebToken, JwtGenerator,
    PrivateKey, RS256JwtGenerator,
};

pub use client::{ClientConfig, GitHubClient, InstallationClient, InstallationClients};
