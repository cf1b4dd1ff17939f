//! Configuration loading and merging logic.
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded in the following order (later sources override earlier ones):
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.greenlight/config.toml` (global user preferences)
//! 3. **Project config** - `./.greenlight/config.toml` (project-specific overrides)
//! 4. **Environment** - `GREENLIGHT_API_URL`
//! 5. **CLI arguments** - Command-line flags (highest priority, applied by the CLI)

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::defaults::API_URL_ENV;
use crate::config::types::{ApiSettings, GreenlightConfig, PollSettings};
use crate::config::validation::validate_config;
use crate::errors::ConfigError;

const CONFIG_DIR: &str = ".greenlight";
const CONFIG_FILE: &str = "config.toml";

/// Load configuration from the hierarchy of config files.
///
/// Loads and merges configuration from:
/// 1. Default values
/// 2. User config (`~/.greenlight/config.toml`)
/// 3. Project config (`./.greenlight/config.toml`)
/// 4. `GREENLIGHT_API_URL` environment variable
///
/// # Errors
///
/// Returns an error if a config file exists but cannot be read or parsed, or
/// if validation fails. Missing config files are not errors.
pub fn load_hierarchy() -> Result<GreenlightConfig, ConfigError> {
    let config = load_merged_hierarchy()?;
    validate_config(&config)?;
    Ok(config)
}

/// Like [`load_hierarchy`] but without validation, so callers can layer
/// command-line overrides on top before validating once.
///
/// # Errors
///
/// Only read and parse errors of existing config files.
pub fn load_merged_hierarchy() -> Result<GreenlightConfig, ConfigError> {
    let mut paths = Vec::new();
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(CONFIG_DIR).join(CONFIG_FILE));
    }
    paths.push(std::env::current_dir()?.join(CONFIG_DIR).join(CONFIG_FILE));

    merge_from_paths(&paths, std::env::var(API_URL_ENV).ok())
}

/// Merge config files in order, then apply the environment URL override and validate.
pub fn load_from_paths(
    paths: &[PathBuf],
    env_url: Option<String>,
) -> Result<GreenlightConfig, ConfigError> {
    let config = merge_from_paths(paths, env_url)?;
    validate_config(&config)?;
    Ok(config)
}

/// Merge config files in order and apply the environment URL override.
pub fn merge_from_paths(
    paths: &[PathBuf],
    env_url: Option<String>,
) -> Result<GreenlightConfig, ConfigError> {
    let mut config = GreenlightConfig::default();

    for path in paths {
        match load_config_file(path) {
            Ok(file_config) => {
                debug!(
                    event = "core.config.file_loaded",
                    path = %path.display()
                );
                config = merge_configs(config, file_config);
            }
            Err(ConfigError::ConfigNotFound { .. }) => {}
            Err(e) => return Err(e),
        }
    }

    if let Some(url) = env_url.filter(|u| !u.trim().is_empty()) {
        debug!(event = "core.config.env_override_applied", var = API_URL_ENV);
        config.api.base_url = Some(url);
    }

    Ok(config)
}

/// Load a configuration file from the given path.
pub fn load_config_file(path: &Path) -> Result<GreenlightConfig, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }
        Err(e) => return Err(e.into()),
    };

    toml::from_str(&content).map_err(|e| ConfigError::ConfigParseError {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Merge two configurations, with override_config taking precedence.
///
/// Override values replace base values only if present.
pub fn merge_configs(base: GreenlightConfig, override_config: GreenlightConfig) -> GreenlightConfig {
    GreenlightConfig {
        api: ApiSettings {
            base_url: override_config.api.base_url.or(base.api.base_url),
            timeout_ms: override_config.api.timeout_ms.or(base.api.timeout_ms),
        },
        poll: PollSettings {
            interval_ms: override_config.poll.interval_ms.or(base.poll.interval_ms),
            max_backoff_ms: override_config
                .poll
                .max_backoff_ms
                .or(base.poll.max_backoff_ms),
        },
    }
}
