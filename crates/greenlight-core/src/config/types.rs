//! Configuration type definitions for Greenlight.
//!
//! These types are serialized/deserialized from TOML config files. Every
//! value is optional in the file; accessors in [`super::defaults`] fill in
//! the built-in defaults so that merging can tell "unset" from "set".
//!
//! # Example Configuration
//!
//! ```toml
//! [api]
//! base_url = "http://127.0.0.1:5000"
//! timeout_ms = 5000
//!
//! [poll]
//! interval_ms = 250
//! max_backoff_ms = 10000
//! ```

use serde::{Deserialize, Serialize};

/// Main configuration loaded from TOML config files.
///
/// This is the primary configuration structure that gets loaded from:
/// 1. User config: `~/.greenlight/config.toml`
/// 2. Project config: `./.greenlight/config.toml`
///
/// Project config values override user config values.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct GreenlightConfig {
    /// Backend API settings
    #[serde(default)]
    pub api: ApiSettings,

    /// Poll loop settings
    #[serde(default)]
    pub poll: PollSettings,
}

/// Where and how to reach the backend.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ApiSettings {
    /// Base URL of the backend, e.g. `http://127.0.0.1:5000`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Per-request timeout in milliseconds.
    /// Default: 5000ms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

/// Poll loop timing.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PollSettings {
    /// Delay between the end of one fetch and the start of the next.
    /// Default: 250ms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_ms: Option<u64>,

    /// Upper bound for the retry delay after consecutive transient failures.
    /// Default: 10000ms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_backoff_ms: Option<u64>,
}
