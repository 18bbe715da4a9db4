//! JWT (JSON Web Token) generation for GitHub App authentication.
//!
//! App assertions authenticate the application itself and are exchanged for
//! installation tokens.
//!
//! # GitHub Requirements
//!
//! - JWTs must use RS256 algorithm (RSA Signature with SHA-256)
//! - Maximum expiration time is 10 minutes from issuance
//! - Claims must include `iss` (app ID), `iat` (issued at), and `exp` (expiration)

use crate::auth::{GitHubAppId, JsonWebToken, JwtClaims, PrivateKey};
use crate::error::AuthError;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

/// Longest assertion lifetime GitHub accepts.
pub const MAX_JWT_EXPIRATION_MINUTES: i64 = 10;

/// Interface for JWT token generation and signing.
///
/// This trait abstracts JWT generation so the token manager can be exercised
/// with deterministic generators in tests.
#[async_trait::async_trait]
pub trait JwtGenerator: Send + Sync {
    /// Generate a JWT token for GitHub App authentication.
    ///
    /// Creates a JWT with the following claims:
    /// - `iss`: GitHub App ID
    /// - `iat`: Current timestamp (issued at)
    /// - `exp`: Expiration timestamp (issued at + duration, max 10 minutes)
    ///
    /// # Errors
    ///
    /// Returns `AuthError::JwtGenerationFailed` if encoding fails.
    async fn generate_jwt(&self, app_id: GitHubAppId) -> Result<JsonWebToken, AuthError>;

    /// Get the JWT expiration duration configured for this generator.
    fn expiration_duration(&self) -> Duration;
}

/// RS256 JWT generator using RSA private keys.
///
/// The encoding key is prepared once at construction, so a broken key is
/// reported at startup rather than on the first webhook.
pub struct RS256JwtGenerator {
    encoding_key: EncodingKey,
    expiration_duration: Duration,
}

impl RS256JwtGenerator {
    /// Create a new RS256 JWT generator with the maximum allowed lifetime.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Configuration` if the key cannot be used for RS256.
    pub fn new(private_key: PrivateKey) -> Result<Self, AuthError> {
        Self::with_expiration(private_key, Duration::minutes(MAX_JWT_EXPIRATION_MINUTES))
    }

    /// Create a new RS256 JWT generator with custom expiration duration.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Configuration` if the duration is not positive or
    /// exceeds 10 minutes, or if the key cannot be used for RS256.
    pub fn with_expiration(
        private_key: PrivateKey,
        expiration_duration: Duration,
    ) -> Result<Self, AuthError> {
        if expiration_duration <= Duration::zero()
            || expiration_duration > Duration::minutes(MAX_JWT_EXPIRATION_MINUTES)
        {
            return Err(AuthError::Configuration {
                message: format!(
                    "JWT expiration must be between 1 second and {} minutes",
                    MAX_JWT_EXPIRATION_MINUTES
                ),
            });
        }

        let encoding_key = EncodingKey::from_rsa_pem(private_key.key_data()).map_err(|e| {
            AuthError::Configuration {
                message: format!("Failed to create encoding key: {}", e),
            }
        })?;

        Ok(Self {
            encoding_key,
            expiration_duration,
        })
    }

    /// Build JWT claims for the given app ID.
    fn build_claims(&self, app_id: GitHubAppId, now: DateTime<Utc>) -> JwtClaims {
        JwtClaims {
            iss: app_id,
            iat: now.timestamp(),
            exp: (now + self.expiration_duration).timestamp(),
        }
    }
}

#[async_trait::async_trait]
impl JwtGenerator for RS256JwtGenerator {
    async fn generate_jwt(&self, app_id: GitHubAppId) -> Result<JsonWebToken, AuthError> {
        let now = Utc::now();
        let claims = self.build_claims(app_id, now);

        let header = Header::new(Algorithm::RS256);
        let token_string = encode(&header, &claims, &self.encoding_key).map_err(|e| {
            AuthError::JwtGenerationFailed {
                message: format!("Failed to encode JWT: {}", e),
            }
        })?;

        Ok(JsonWebToken::new(
            token_string,
            app_id,
            now,
            now + self.expiration_duration,
        ))
    }

    fn expiration_duration(&self) -> Duration {
        self.expiration_duration
    }
}

#[cfg(test)]
#[path = "jwt_tests.rs"]
mod tests;
