//! Derived status predicates for a [`Project`].
//!
//! All predicates are pure. Time-dependent values take `now_ms` explicitly
//! (milliseconds since the Unix epoch) so callers control the clock.

use serde::{Deserialize, Serialize};

use super::types::Project;

/// Display status of a project, derived from its record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Running,  // Rerun in progress after the watched file changed
    Success,  // Last run exited 0
    Failed,   // Last run exited non-zero
    NeverRun, // No completed run yet
}

impl ProjectStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ProjectStatus::Running => "running",
            ProjectStatus::Success => "success",
            ProjectStatus::Failed => "failed",
            ProjectStatus::NeverRun => "never run",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            ProjectStatus::Running => "⏳",
            ProjectStatus::Success => "✅",
            ProjectStatus::Failed => "❌",
            ProjectStatus::NeverRun => "⚪",
        }
    }
}

/// Current wall clock in epoch milliseconds, the unit the backend uses.
pub fn now_ms() -> f64 {
    chrono::Utc::now().timestamp_millis() as f64
}

impl Project {
    /// Last run exited with status 0.
    pub fn is_success(&self) -> bool {
        self.returncode == Some(0)
    }

    /// Last run exited non-zero and the run is dated.
    pub fn is_failure(&self) -> bool {
        matches!(self.returncode, Some(code) if code != 0) && self.mtime.is_some()
    }

    /// No completed, dated run is known.
    pub fn is_never_run(&self) -> bool {
        self.mtime.is_none() || self.returncode.is_none()
    }

    /// The watched file changed and the job has not caught up yet.
    ///
    /// An mtime of 0 is what the backend reports for a missing watched file,
    /// so it does not count.
    pub fn is_in_progress(&self) -> bool {
        !self.up_to_date && self.mtime.is_some_and(|m| m != 0.0)
    }

    /// Milliseconds since the current run started, never negative.
    pub fn elapsed_ms(&self, now_ms: f64) -> Option<f64> {
        self.start_time.map(|start| (now_ms - start).max(0.0))
    }

    /// Estimated completion of the current run in percent, within `[0, 100]`.
    ///
    /// `None` until both a start time and a positive average runtime are known.
    pub fn progress_percent(&self, now_ms: f64) -> Option<f64> {
        let avg = self.avg_runtime.filter(|avg| *avg > 0.0)?;
        let elapsed = self.elapsed_ms(now_ms)?;
        Some((elapsed / avg * 100.0).clamp(0.0, 100.0))
    }

    /// Single status for display. A rerun in progress wins over the result
    /// of the previous run.
    pub fn status(&self) -> ProjectStatus {
        if self.is_in_progress() {
            ProjectStatus::Running
        } else if self.is_success() && !self.is_never_run() {
            ProjectStatus::Success
        } else if self.is_failure() {
            ProjectStatus::Failed
        } else {
            ProjectStatus::NeverRun
        }
    }
}
