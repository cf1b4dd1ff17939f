//! Polling loop that keeps a view's snapshot in sync with the backend.
//!
//! A [`Poller`] owns one tokio task per view. Each cycle fetches, runs the
//! change detector and only replaces the published snapshot when something
//! the UI renders actually changed.

pub mod backoff;
pub mod errors;
pub mod handler;
pub mod operations;
pub mod types;

pub use backoff::Backoff;
pub use errors::PollerError;
pub use handler::Poller;
pub use operations::{CycleOutcome, apply_fetch_result, run_poll_loop};
pub use types::{PollConfig, PollStats};
