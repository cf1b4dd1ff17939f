//! # Configuration System
//!
//! Hierarchical TOML configuration system for Greenlight.
//!
//! ## Configuration Hierarchy
//!
//! Configuration is loaded in the following order (later sources override earlier ones):
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.greenlight/config.toml` (global user preferences)
//! 3. **Project config** - `./.greenlight/config.toml` (project-specific overrides)
//! 4. **Environment** - `GREENLIGHT_API_URL`
//! 5. **CLI arguments** - Command-line flags (highest priority)
//!
//! ## Usage Example
//!
//! ```toml
//! # ~/.greenlight/config.toml
//! [api]
//! base_url = "http://ci.local:5000"
//!
//! [poll]
//! interval_ms = 1000
//! ```
//!
//! ## Loading Configuration
//!
//! ```rust,no_run
//! use greenlight_core::config::GreenlightConfig;
//!
//! fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = GreenlightConfig::load_hierarchy()?;
//!     let poll = config.poll_config();
//!     println!("polling {} every {:?}", config.api.base_url(), poll.interval);
//!     Ok(())
//! }
//! ```

pub mod defaults;
pub mod loading;
pub mod types;
pub mod validation;

use std::time::Duration;

use crate::poller::PollConfig;

// Public API exports
pub use types::{ApiSettings, GreenlightConfig, PollSettings};
pub use validation::{VALID_SCHEMES, validate_base_url, validate_config};

impl GreenlightConfig {
    /// Load configuration from the hierarchy of config files.
    ///
    /// See [`loading::load_hierarchy`] for details.
    pub fn load_hierarchy() -> Result<Self, crate::errors::ConfigError> {
        loading::load_hierarchy()
    }

    /// Validate the configuration.
    ///
    /// See [`validation::validate_config`] for details.
    pub fn validate(&self) -> Result<(), crate::errors::ConfigError> {
        validation::validate_config(self)
    }

    /// Merged files and environment without validation.
    ///
    /// See [`loading::load_merged_hierarchy`] for details.
    pub fn load_merged_hierarchy() -> Result<Self, crate::errors::ConfigError> {
        loading::load_merged_hierarchy()
    }

    /// Poll loop timings resolved from `[poll]`.
    ///
    /// The backoff cap never sits below the interval: a long interval raises it.
    pub fn poll_config(&self) -> PollConfig {
        let interval = Duration::from_millis(self.poll.interval_ms());
        PollConfig {
            interval,
            max_backoff: Duration::from_millis(self.poll.max_backoff_ms()).max(interval),
        }
    }

    /// Request timeout resolved from `[api]`.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.api.timeout_ms())
    }
}
