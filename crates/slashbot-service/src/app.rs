//! Construction of the production object graph.

use anyhow::Context;
use slashbot_api::{AppState, ServiceConfig};
use slashbot_core::{CommandDispatcher, EventRouter};
use slashbot_github::{
    AuthConfig, ClientConfig, GitHubAppId, GitHubClient, InMemoryTokenCache, InstallationClients,
    InstallationTokenManager, PrivateKey, RS256JwtGenerator,
};
use std::{sync::Arc, time::Duration};
use tracing::info;

/// Wire key, token manager, client, dispatcher and router into [`AppState`].
///
/// The configuration must already have passed `validate()`.
pub fn build_state(config: ServiceConfig) -> anyhow::Result<AppState> {
    let app_id = config
        .github
        .app_id
        .map(GitHubAppId::new)
        .context("github.app_id is required")?;
    let key_path = config
        .github
        .private_key_path
        .as_deref()
        .context("github.private_key_path is required")?;

    let private_key = PrivateKey::from_pem_file(key_path)
        .with_context(|| format!("failed to load GitHub App private key from {}", key_path))?;
    let jwt_generator = RS256JwtGenerator::new(private_key)?;

    let client_config = ClientConfig::default()
        .with_timeout(Duration::from_secs(config.github.request_timeout_seconds))
        .with_github_api_url(config.github.api_url.clone());
    let client = Arc::new(GitHubClient::new(client_config)?);

    let auth_config = AuthConfig {
        token_lifetime: chrono::Duration::seconds(to_seconds(config.github.token_lifetime_seconds)),
        token_refresh_margin: chrono::Duration::seconds(to_seconds(
            config.github.token_refresh_margin_seconds,
        )),
    };
    let token_manager = Arc::new(InstallationTokenManager::new(
        app_id,
        Arc::new(jwt_generator),
        client.clone(),
        Arc::new(InMemoryTokenCache::new()),
        auth_config,
    )?);

    let clients = Arc::new(InstallationClients::new(client, token_manager));
    let dispatcher = Arc::new(CommandDispatcher::with_builtin_commands(
        config.commands.clone(),
    ));
    let commands: Vec<String> = dispatcher
        .commands()
        .into_iter()
        .map(str::to_string)
        .collect();

    info!(
        app_id = %app_id,
        api_url = %config.github.api_url,
        commands = ?commands,
        "GitHub App wiring complete"
    );

    let router = Arc::new(EventRouter::new(clients, dispatcher));

    Ok(AppState::new(config, router, commands))
}

fn to_seconds(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;
