//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::WebConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Optional path to a TOML configuration file.
pub const CONFIG_PATH_ENV: &str = "PLANT_TRACKER_CONFIG";
/// Listening port override.
pub const PORT_ENV: &str = "PORT";
/// Upstream API base URL override.
pub const API_BASE_URL_ENV: &str = "API_BASE_URL";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {key}: {reason}")]
    Env { key: &'static str, reason: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<WebConfig, ConfigError> {
    let config = read_file(path)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load configuration from the process environment.
///
/// Starts from defaults (or the file named by `PLANT_TRACKER_CONFIG`), then
/// applies `PORT` and `API_BASE_URL`, then validates.
pub fn load_from_env() -> Result<WebConfig, ConfigError> {
    load_with(|key| std::env::var(key).ok())
}

/// Same as [`load_from_env`] with an injectable variable lookup.
pub fn load_with<F>(lookup: F) -> Result<WebConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match lookup(CONFIG_PATH_ENV) {
        Some(path) => read_file(Path::new(&path))?,
        None => WebConfig::default(),
    };

    if let Some(port) = lookup(PORT_ENV) {
        config.server.port = port.trim().parse().map_err(|e: std::num::ParseIntError| {
            ConfigError::Env {
                key: PORT_ENV,
                reason: e.to_string(),
            }
        })?;
    }

    if let Some(base_url) = lookup(API_BASE_URL_ENV) {
        config.upstream.base_url = base_url.trim().to_string();
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

fn read_file(path: &Path) -> Result<WebConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}
