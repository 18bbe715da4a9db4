//! # Slashbot Service
//!
//! Binary entry point for the slashbot GitHub App.
//!
//! This executable:
//! - Loads configuration from files and environment
//! - Initializes structured logging
//! - Wires the token manager, GitHub client, command dispatcher and event router
//! - Starts the HTTP server from slashbot-api
//!
//! Exit codes: 1 bind failure, 2 server failure, 3 configuration error.

mod app;
mod settings;

use slashbot_api::{start_server, LoggingConfig, ServiceConfig, ServiceError};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    let loaded = settings::load();

    // Logging needs the configured level, so a broken config logs with defaults.
    let logging = loaded
        .as_ref()
        .map(|c| c.logging.clone())
        .unwrap_or_default();
    init_logging(&logging);

    info!(version = env!("CARGO_PKG_VERSION"), "Starting slashbot service");

    let service_config: ServiceConfig = match loaded {
        Ok(config) => config,
        Err(e) => {
            error!(
                error = %e,
                "Could not load service configuration; aborting. \
                 Fix the configuration and restart."
            );
            std::process::exit(3);
        }
    };

    if let Err(e) = service_config.validate() {
        error!(error = %e, "Service configuration is invalid; aborting");
        std::process::exit(3);
    }

    let state = match app::build_state(service_config) {
        Ok(state) => state,
        Err(e) => {
            error!(error = %format!("{:#}", e), "Failed to initialize GitHub App; aborting");
            std::process::exit(3);
        }
    };

    if let Err(e) = start_server(state).await {
        error!(error = %e, "Server terminated with an error");

        let exit_code = match e {
            ServiceError::BindFailed { .. } => 1,
            ServiceError::ServerFailed { .. } => 2,
            ServiceError::Configuration(_) => 3,
        };

        std::process::exit(exit_code);
    }
}

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{level},slashbot_service={level},slashbot_api={level},slashbot_core={level},slashbot_github={level},tower_http=debug",
            level = logging.level
        ))
    });

    let registry = tracing_subscriber::registry().with(filter);

    if logging.json_format {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
