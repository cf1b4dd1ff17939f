//! Configuration validation logic.
//!
//! Checks a merged [`GreenlightConfig`] before anything is built from it.

use crate::config::types::GreenlightConfig;
use crate::errors::ConfigError;

/// URL schemes the HTTP client can talk to.
pub const VALID_SCHEMES: [&str; 2] = ["http", "https"];

/// Validate a GreenlightConfig, returning an error if any values are invalid.
///
/// # Validation Rules
///
/// - `api.base_url` must parse as an absolute http or https URL with a host
/// - `api.timeout_ms` and `poll.interval_ms` must be greater than zero
/// - `poll.max_backoff_ms` must be greater than zero. A cap below the
///   interval is not an error, [`GreenlightConfig::poll_config`] raises it
///
/// # Errors
///
/// Returns `ConfigError::InvalidUrl` for a bad base URL and
/// `ConfigError::InvalidConfiguration` for out-of-range timings.
pub fn validate_config(config: &GreenlightConfig) -> Result<(), ConfigError> {
    validate_base_url(config.api.base_url())?;

    if config.api.timeout_ms() == 0 {
        return Err(ConfigError::InvalidConfiguration {
            message: "api.timeout_ms must be greater than 0".to_string(),
        });
    }

    let interval_ms = config.poll.interval_ms();
    if interval_ms == 0 {
        return Err(ConfigError::InvalidConfiguration {
            message: "poll.interval_ms must be greater than 0".to_string(),
        });
    }

    if config.poll.max_backoff_ms() == 0 {
        return Err(ConfigError::InvalidConfiguration {
            message: "poll.max_backoff_ms must be greater than 0".to_string(),
        });
    }

    Ok(())
}

/// Validate that `url` is something the API client can be pointed at.
pub fn validate_base_url(url: &str) -> Result<reqwest::Url, ConfigError> {
    let parsed = reqwest::Url::parse(url).map_err(|e| ConfigError::InvalidUrl {
        url: url.to_string(),
        message: e.to_string(),
    })?;

    if !VALID_SCHEMES.contains(&parsed.scheme()) {
        return Err(ConfigError::InvalidUrl {
            url: url.to_string(),
            message: format!("scheme must be one of: {}", VALID_SCHEMES.join(", ")),
        });
    }

    if parsed.host_str().is_none() {
        return Err(ConfigError::InvalidUrl {
            url: url.to_string(),
            message: "missing host".to_string(),
        });
    }

    Ok(parsed)
}
