//! Default values for configuration types.
//!
//! Config structs keep every field optional so that merging can tell an
//! explicit value from a missing one. The accessors here resolve a missing
//! value to its built-in default.

use crate::config::types::{ApiSettings, PollSettings};

/// Address a locally started backend listens on.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

pub const DEFAULT_INTERVAL_MS: u64 = 250;

pub const DEFAULT_MAX_BACKOFF_MS: u64 = 10_000;

/// Environment variable that overrides `[api] base_url` from config files.
pub const API_URL_ENV: &str = "GREENLIGHT_API_URL";

impl ApiSettings {
    /// Returns the backend base URL, defaulting to `http://127.0.0.1:5000`.
    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// Returns the request timeout in milliseconds, defaulting to 5000.
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS)
    }
}

impl PollSettings {
    /// Returns the poll interval in milliseconds, defaulting to 250.
    pub fn interval_ms(&self) -> u64 {
        self.interval_ms.unwrap_or(DEFAULT_INTERVAL_MS)
    }

    /// Returns the backoff cap in milliseconds, defaulting to 10000.
    pub fn max_backoff_ms(&self) -> u64 {
        self.max_backoff_ms.unwrap_or(DEFAULT_MAX_BACKOFF_MS)
    }
}
