//! Configuration management.

mod settings;

pub use settings::{
    AppConfig, AppSettings, BinanceSettings, BingxSettings, ForexSettings, InferenceSettings,
    LoggingConfig, MarketSettings, PollingSettings,
};

use config::{Config, ConfigError, Environment, File, FileFormat, Source};
use std::path::Path;
use thiserror::Error;

/// Configuration failures.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error(transparent)]
    Load(#[from] ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Environment variable {0} is not set or empty")]
    MissingSecret(String),
}

/// Load configuration from file and environment.
///
/// `SIGNAL__SECTION__KEY` variables override the file, e.g.
/// `SIGNAL__POLLING__POLL_INTERVAL_SECS=30`.
pub fn load_config(path: &Path) -> Result<AppConfig, SettingsError> {
    load_with(File::from(path).required(true))
}

/// Load configuration from TOML text and environment.
pub fn load_config_str(toml: &str) -> Result<AppConfig, SettingsError> {
    load_with(File::from_str(toml, FileFormat::Toml))
}

fn load_with<S>(file: S) -> Result<AppConfig, SettingsError>
where
    S: Source + Send + Sync + 'static,
{
    let config = Config::builder()
        .add_source(file)
        .add_source(
            Environment::with_prefix("SIGNAL")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(config.try_deserialize()?)
}

/// Read a credential from the environment variable named in config.
pub fn resolve_secret(env_name: &str) -> Result<String, SettingsError> {
    match std::env::var(env_name) {
        Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(SettingsError::MissingSecret(env_name.to_string())),
    }
}
