//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment override for `chain.rpc_url`.
pub const RPC_URL_ENV_VAR: &str = "ATTEST_RPC_URL";
/// Environment override for `indexing.base_url`.
pub const INDEXING_URL_ENV_VAR: &str = "ATTEST_INDEXING_URL";
/// Environment override for `observability.log_level`.
pub const LOG_LEVEL_ENV_VAR: &str = "ATTEST_LOG_LEVEL";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load a configuration from a TOML file without validating it.
pub fn read_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    toml::from_str(&content).map_err(ConfigError::Parse)
}

/// Resolve the effective configuration: file (or defaults), then
/// environment overrides, then validation.
pub fn resolve_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut config = match path {
        Some(path) => read_config(path)?,
        None => AppConfig::default(),
    };
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Apply environment overrides using the given lookup.
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(RPC_URL_ENV_VAR) {
        config.chain.rpc_url = url;
    }
    if let Some(url) = lookup(INDEXING_URL_ENV_VAR) {
        config.indexing.base_url = url;
    }
    if let Some(level) = lookup(LOG_LEVEL_ENV_VAR) {
        config.observability.log_level = level;
    }
}
