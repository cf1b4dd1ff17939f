//! greenlight-core: Core library for build status polling
//!
//! This library fetches "projects" (build/test jobs) from a Greenlight
//! backend, derives their display status, and keeps a snapshot of them
//! current through a cancellable poll loop. It is used by the CLI.
//!
//! # Main Entry Points
//!
//! - [`projects`] - Project records, status predicates and change detection
//! - [`api`] - Read-only client for the `/api/projects` endpoints
//! - [`poller`] - Poll loop that replaces the snapshot only on change
//! - [`config`] - Configuration management

pub mod api;
pub mod config;
pub mod errors;
pub mod events;
pub mod logging;
pub mod poller;
pub mod projects;

// Re-export commonly used types at crate root for convenience
pub use api::{ApiError, HttpProjectSource, ProjectSource};
pub use config::GreenlightConfig;
pub use poller::{PollConfig, PollStats, Poller, PollerError};
pub use projects::{Project, ProjectError, ProjectId, ProjectSet, ProjectStatus};

// Re-export logging initialization
pub use logging::init_logging;
