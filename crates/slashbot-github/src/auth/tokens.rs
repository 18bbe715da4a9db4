//! GitHub App token management and AuthenticationProvider implementation.
//!
//! The manager serves installation tokens from the cache while they remain
//! valid beyond the refresh margin. When a token is missing or stale it mints
//! a fresh app assertion, exchanges it for a new installation token and caches
//! the result.
//!
//! Refreshes are single-flight per installation: concurrent callers for the
//! same installation wait on one exclusive section and reuse whatever the
//! first caller stored. The exchange itself runs in a spawned task that owns
//! the section guard, so a caller that gives up does not cancel the refresh.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::{
    AuthenticationProvider, GitHubAppId, IdentityExchange, InMemoryTokenCache, InstallationId,
    InstallationToken, JsonWebToken, JwtGenerator,
};
use crate::error::AuthError;

/// Configuration for authentication behavior.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Lifetime recorded for installation tokens (GitHub issues 1-hour tokens)
    pub token_lifetime: Duration,

    /// Installation token refresh margin (refresh if expires in this window)
    pub token_refresh_margin: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_lifetime: Duration::hours(1),
            token_refresh_margin: Duration::seconds(60),
        }
    }
}

/// Installation token manager for a single GitHub App.
///
/// Cheap to clone; all collaborators are shared.
#[derive(Clone)]
pub struct InstallationTokenManager {
    app_id: GitHubAppId,
    jwt_generator: Arc<dyn JwtGenerator>,
    exchange: Arc<dyn IdentityExchange>,
    cache: Arc<InMemoryTokenCache>,
    config: AuthConfig,
}

impl InstallationTokenManager {
    /// Create a new token manager.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Configuration` when the assertion lifetime is not
    /// strictly shorter than the token lifetime, or when the refresh margin
    /// does not fit inside the token lifetime.
    pub fn new(
        app_id: GitHubAppId,
        jwt_generator: Arc<dyn JwtGenerator>,
        exchange: Arc<dyn IdentityExchange>,
        cache: Arc<InMemoryTokenCache>,
        config: AuthConfig,
    ) -> Result<Self, AuthError> {
        if jwt_generator.expiration_duration() >= config.token_lifetime {
            return Err(AuthError::Configuration {
                message: "JWT expiration must be shorter than the installation token lifetime"
                    .to_string(),
            });
        }

        if config.token_refresh_margin < Duration::zero()
            || config.token_refresh_margin >= config.token_lifetime
        {
            return Err(AuthError::Configuration {
                message: "Token refresh margin must be non-negative and shorter than the token lifetime"
                    .to_string(),
            });
        }

        Ok(Self {
            app_id,
            jwt_generator,
            exchange,
            cache,
            config,
        })
    }

    /// Get configuration.
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub fn app_id(&self) -> GitHubAppId {
        self.app_id
    }

    /// The cache backing this manager.
    pub fn cache(&self) -> &Arc<InMemoryTokenCache> {
        &self.cache
    }

    /// Get a valid installation token, refreshing it when missing or stale.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::IdentityExchange` when the exchange fails; nothing
    /// is cached in that case and the next call tries again.
    pub async fn get_token(&self, installation_id: InstallationId) -> Result<String, AuthError> {
        if let Some(token) = self.usable_token(installation_id)? {
            debug!(installation_id = %installation_id, "Using cached installation token");
            return Ok(token);
        }

        self.refresh_single_flight(installation_id, None).await
    }

    /// Force a new exchange regardless of the cached token.
    ///
    /// Callers that queued behind a concurrent forced refresh reuse the token
    /// that refresh produced instead of exchanging again.
    pub async fn refresh_token(
        &self,
        installation_id: InstallationId,
    ) -> Result<String, AuthError> {
        let seen = self.cache.get(installation_id)?.map(|t| t.issued_at());
        let seen = Some(seen.unwrap_or(DateTime::<Utc>::MIN_UTC));

        self.refresh_single_flight(installation_id, seen).await
    }

    /// Mint a fresh app assertion. Assertions are never cached.
    pub async fn app_assertion(&self) -> Result<JsonWebToken, AuthError> {
        self.jwt_generator.generate_jwt(self.app_id).await
    }

    /// Drop the cached token for an installation.
    pub fn invalidate(&self, installation_id: InstallationId) -> Result<(), AuthError> {
        self.cache.invalidate(installation_id)?;
        Ok(())
    }

    fn usable_token(&self, installation_id: InstallationId) -> Result<Option<String>, AuthError> {
        let now = Utc::now();
        Ok(self
            .cache
            .get(installation_id)?
            .filter(|t| t.is_usable_at(now, self.config.token_refresh_margin))
            .map(|t| t.token().to_string()))
    }

    /// Run the refresh inside the installation's exclusive section.
    ///
    /// `issued_after` is set for forced refreshes: a cached token only counts
    /// as fresh when it was issued after that instant.
    async fn refresh_single_flight(
        &self,
        installation_id: InstallationId,
        issued_after: Option<DateTime<Utc>>,
    ) -> Result<String, AuthError> {
        let section = self.cache.refresh_section(installation_id)?;
        let guard = section.lock_owned().await;

        if let Some(cached) = self.cache.get(installation_id)? {
            let usable = cached.is_usable_at(Utc::now(), self.config.token_refresh_margin);
            let newer = issued_after.is_none_or(|seen| cached.issued_at() > seen);
            if usable && newer {
                debug!(
                    installation_id = %installation_id,
                    "Installation token refreshed by a concurrent request"
                );
                return Ok(cached.token().to_string());
            }
        }

        let manager = self.clone();
        let refresh = tokio::spawn(async move {
            let _guard = guard;
            manager.exchange_and_store(installation_id).await
        });

        refresh.await.map_err(|e| {
            error!(
                installation_id = %installation_id,
                error = %e,
                "Installation token refresh task failed"
            );
            AuthError::RefreshInterrupted { installation_id }
        })?
    }

    async fn exchange_and_store(&self, installation_id: InstallationId) -> Result<String, AuthError> {
        let assertion = self.jwt_generator.generate_jwt(self.app_id).await?;

        let token = self
            .exchange
            .exchange(&assertion, installation_id)
            .await
            .map_err(|source| {
                warn!(
                    installation_id = %installation_id,
                    error = %source,
                    "Identity exchange failed"
                );
                AuthError::IdentityExchange {
                    installation_id,
                    source,
                }
            })?;

        let issued_at = Utc::now();
        let expires_at = issued_at + self.config.token_lifetime;
        self.cache.store(InstallationToken::new(
            token.clone(),
            installation_id,
            issued_at,
            expires_at,
        ))?;

        info!(
            installation_id = %installation_id,
            expires_at = %expires_at,
            "Cached new installation token"
        );

        Ok(token)
    }
}

#[async_trait]
impl AuthenticationProvider for InstallationTokenManager {
    async fn app_token(&self) -> Result<JsonWebToken, AuthError> {
        self.app_assertion().await
    }

    async fn installation_token(
        &self,
        installation_id: InstallationId,
    ) -> Result<String, AuthError> {
        self.get_token(installation_id).await
    }
}

#[cfg(test)]
#[path = "tokens_tests.rs"]
mod tests;
