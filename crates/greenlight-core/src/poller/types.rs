use std::time::Duration;

use serde::Serialize;

use super::errors::PollerError;
use crate::config::defaults::{DEFAULT_INTERVAL_MS, DEFAULT_MAX_BACKOFF_MS};

/// Timing of one poll loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Wait between the end of one fetch and the start of the next.
    pub interval: Duration,
    /// Cap for the retry delay after consecutive transient failures.
    pub max_backoff: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(DEFAULT_INTERVAL_MS),
            max_backoff: Duration::from_millis(DEFAULT_MAX_BACKOFF_MS),
        }
    }
}

impl PollConfig {
    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval,
            max_backoff: interval.max(Self::default().max_backoff),
        }
    }

    pub fn validate(&self) -> Result<(), PollerError> {
        if self.interval.is_zero() {
            return Err(PollerError::InvalidConfig {
                message: "interval must be greater than zero".to_string(),
            });
        }
        if self.max_backoff < self.interval {
            return Err(PollerError::InvalidConfig {
                message: format!(
                    "max backoff ({:?}) must be at least the interval ({:?})",
                    self.max_backoff, self.interval
                ),
            });
        }
        Ok(())
    }
}

/// Counters reported when a poller stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PollStats {
    /// Fetches started, including ones that failed.
    pub fetches: u64,
    /// Times the snapshot was replaced because something changed.
    pub replacements: u64,
    /// Transient failures that were retried with backoff.
    pub failures: u64,
    /// Cycles skipped because the response was malformed or rejected.
    pub skipped: u64,
}
