//! GitHub App authentication types and interfaces.
//!
//! This module provides the authentication building blocks for a GitHub App:
//! - ID types (GitHubAppId, InstallationId)
//! - Token types (JsonWebToken, InstallationToken)
//! - Private key handling for RS256 signing
//! - Trait seams for the identity exchange and for authenticated API access
//!
//! Installation tokens are minted by [`InstallationTokenManager`], which signs an
//! app assertion with [`RS256JwtGenerator`], exchanges it through an
//! [`IdentityExchange`] and caches the result in an [`InMemoryTokenCache`].

use chrono::{DateTime, Duration, Utc};
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::RsaPrivateKey;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use zeroize::Zeroizing;

use crate::error::{ApiError, AuthError, ValidationError};

pub mod cache;
pub mod jwt;
pub mod tokens;

pub use cache::InMemoryTokenCache;
pub use jwt::{JwtGenerator, RS256JwtGenerator};
pub use tokens::{AuthConfig, InstallationTokenManager};

// ============================================================================
// Core ID Types
// ============================================================================

/// GitHub App identifier assigned during app registration.
///
/// Used as the `iss` claim of every app assertion.
///
/// # Examples
///
/// ```
/// use slashbot_github::auth::GitHubAppId;
///
/// let app_id = GitHubAppId::new(123456);
/// assert_eq!(app_id.as_u64(), 123456);
/// assert_eq!(app_id.to_string(), "123456");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GitHubAppId(u64);

impl GitHubAppId {
    /// Create a new GitHub App ID.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw u64 value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for GitHubAppId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for GitHubAppId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s
            .trim()
            .parse::<u64>()
            .map_err(|_| ValidationError::InvalidFormat {
                field: "github_app_id".to_string(),
                message: "must be a positive integer".to_string(),
            })?;
        Ok(Self::new(id))
    }
}

/// GitHub App installation identifier.
///
/// Every installation token is scoped to exactly one installation, and the
/// token cache is keyed by this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstallationId(u64);

impl InstallationId {
    /// Create a new installation ID.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw u64 value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for InstallationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for InstallationId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s
            .trim()
            .parse::<u64>()
            .map_err(|_| ValidationError::InvalidFormat {
                field: "installation_id".to_string(),
                message: "must be a positive integer".to_string(),
            })?;
        Ok(Self::new(id))
    }
}

// ============================================================================
// Token Types
// ============================================================================

/// Signed app assertion (RS256 JWT) used to authenticate as the GitHub App.
///
/// Assertions are minted on demand and never cached.
#[derive(Clone)]
pub struct JsonWebToken {
    token: String,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    app_id: GitHubAppId,
}

impl JsonWebToken {
    /// Create a new assertion from its encoded form and validity window.
    pub fn new(
        token: String,
        app_id: GitHubAppId,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            token,
            issued_at,
            expires_at,
            app_id,
        }
    }

    /// Get the encoded JWT.
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn app_id(&self) -> GitHubAppId {
        self.app_id
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Check if the assertion has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Check if the assertion expires within the given margin.
    pub fn expires_soon(&self, margin: Duration) -> bool {
        Utc::now() + margin >= self.expires_at
    }
}

// Security: Don't expose token in debug output
impl std::fmt::Debug for JsonWebToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonWebToken")
            .field("app_id", &self.app_id)
            .field("issued_at", &self.issued_at)
            .field("expires_at", &self.expires_at)
            .field("token", &"<REDACTED>")
            .finish()
    }
}

/// Installation access token as held by the token cache.
///
/// Entries are replaced wholesale on refresh; they are never mutated in place.
#[derive(Clone)]
pub struct InstallationToken {
    token: String,
    installation_id: InstallationId,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl InstallationToken {
    pub fn new(
        token: String,
        installation_id: InstallationId,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            token,
            installation_id,
            issued_at,
            expires_at,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn installation_id(&self) -> InstallationId {
        self.installation_id
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    pub fn expires_soon(&self, margin: Duration) -> bool {
        Utc::now() + margin >= self.expires_at
    }

    /// A token is usable at `now` when it stays valid for more than `margin`.
    pub fn is_usable_at(&self, now: DateTime<Utc>, margin: Duration) -> bool {
        self.expires_at > now + margin
    }
}

// Security: Redact token in debug output
impl std::fmt::Debug for InstallationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstallationToken")
            .field("installation_id", &self.installation_id)
            .field("issued_at", &self.issued_at)
            .field("expires_at", &self.expires_at)
            .field("token", &"<REDACTED>")
            .finish()
    }
}

// ============================================================================
// Key Material
// ============================================================================

/// Private key for JWT signing.
///
/// Holds PEM-encoded RSA key material (PKCS#1 or PKCS#8). The bytes are
/// zeroed on drop and never exposed in Debug output.
#[derive(Clone)]
pub struct PrivateKey {
    key_data: Zeroizing<Vec<u8>>,
    algorithm: KeyAlgorithm,
}

impl PrivateKey {
    /// Create a private key from a PEM-encoded string.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the PEM is empty, lacks BEGIN/END markers
    /// or does not contain an RSA private key.
    pub fn from_pem(pem: &str) -> Result<Self, ValidationError> {
        let pem = pem.trim();

        if pem.is_empty() {
            return Err(ValidationError::InvalidFormat {
                field: "private_key".to_string(),
                message: "PEM string cannot be empty".to_string(),
            });
        }

        if !pem.contains("-----BEGIN") || !pem.contains("-----END") {
            return Err(ValidationError::InvalidFormat {
                field: "private_key".to_string(),
                message: "Invalid PEM format: missing BEGIN/END markers".to_string(),
            });
        }

        let parsed = if pem.contains("BEGIN RSA PRIVATE KEY") {
            RsaPrivateKey::from_pkcs1_pem(pem).map_err(|e| e.to_string())
        } else {
            RsaPrivateKey::from_pkcs8_pem(pem).map_err(|e| e.to_string())
        };

        parsed.map_err(|e| ValidationError::InvalidFormat {
            field: "private_key".to_string(),
            message: format!("Failed to parse RSA private key: {}", e),
        })?;

        Ok(Self {
            key_data: Zeroizing::new(pem.as_bytes().to_vec()),
            algorithm: KeyAlgorithm::RS256,
        })
    }

    /// Load a PEM-encoded private key from disk.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Configuration` when the file cannot be read or does
    /// not contain a usable RSA key. The key contents never appear in the
    /// error message.
    pub fn from_pem_file(path: impl AsRef<Path>) -> Result<Self, AuthError> {
        let path = path.as_ref();
        let pem = Zeroizing::new(std::fs::read_to_string(path).map_err(|e| {
            AuthError::Configuration {
                message: format!("Unable to read private key '{}': {}", path.display(), e),
            }
        })?);

        Self::from_pem(&pem).map_err(|e| AuthError::Configuration {
            message: format!("Private key '{}' is invalid: {}", path.display(), e),
        })
    }

    /// Get the PEM bytes.
    pub fn key_data(&self) -> &[u8] {
        &self.key_data
    }

    /// Get the signing algorithm.
    pub fn algorithm(&self) -> &KeyAlgorithm {
        &self.algorithm
    }
}

// Security: Don't expose key data in debug output
impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKey")
            .field("algorithm", &self.algorithm)
            .field("key_data", &"<REDACTED>")
            .finish()
    }
}

/// Key algorithm for JWT signing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAlgorithm {
    RS256,
}

/// JWT claims structure for GitHub App authentication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Issuer (GitHub App ID)
    pub iss: GitHubAppId,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp, max 10 minutes from iat)
    pub exp: i64,
}

// ============================================================================
// Trait Definitions
// ============================================================================

/// Exchanges a signed app assertion for an installation access token.
///
/// The production implementation is [`crate::client::GitHubClient`].
#[async_trait::async_trait]
pub trait IdentityExchange: Send + Sync {
    /// Exchange `assertion` for an access token scoped to `installation_id`.
    async fn exchange(
        &self,
        assertion: &JsonWebToken,
        installation_id: InstallationId,
    ) -> Result<String, ApiError>;
}

/// Source of credentials for authenticated GitHub API calls.
#[async_trait::async_trait]
pub trait AuthenticationProvider: Send + Sync {
    /// Mint a fresh app assertion for app-level endpoints.
    async fn app_token(&self) -> Result<JsonWebToken, AuthError>;

    /// Get a valid installation access token.
    async fn installation_token(&self, installation_id: InstallationId)
        -> Result<String, AuthError>;
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
