//! Layered configuration loading.
//!
//! Sources are applied in order, later sources overriding earlier ones:
//!  1. `/etc/slashbot/service.yaml`: system-wide defaults
//!  2. `./config/service.yaml`: deployment-local override
//!  3. path given by `SLASHBOT_CONFIG_FILE`: operator-specified file
//!  4. environment variables prefixed `SLASHBOT__` with `__` as the nesting
//!     separator, e.g. `SLASHBOT__GITHUB__APP_ID=123` sets `github.app_id`
//!
//! Absent files are skipped; every field carries a serde default. A malformed
//! file or a value that cannot be coerced to its field type is an error.

use slashbot_api::ServiceConfig;
use tracing::info;

pub const SYSTEM_CONFIG_FILE: &str = "/etc/slashbot/service";
pub const LOCAL_CONFIG_FILE: &str = "config/service";
pub const CONFIG_FILE_ENV: &str = "SLASHBOT_CONFIG_FILE";
pub const ENV_PREFIX: &str = "SLASHBOT";

/// Build the service configuration from files and environment.
pub fn load() -> Result<ServiceConfig, config::ConfigError> {
    let mut builder = config::Config::builder()
        .add_source(
            config::File::with_name(SYSTEM_CONFIG_FILE)
                .required(false)
                .format(config::FileFormat::Yaml),
        )
        .add_source(
            config::File::with_name(LOCAL_CONFIG_FILE)
                .required(false)
                .format(config::FileFormat::Yaml),
        );

    if let Ok(explicit_path) = std::env::var(CONFIG_FILE_ENV) {
        if !explicit_path.is_empty() {
            info!(path = %explicit_path, "Loading configuration from explicit path");
            builder = builder.add_source(config::File::with_name(&explicit_path).required(true));
        }
    }

    builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
