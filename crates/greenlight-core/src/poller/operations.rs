use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::backoff::Backoff;
use super::types::{PollConfig, PollStats};
use crate::api::ApiError;
use crate::projects::{Tracked, should_replace};

/// What one fetch-compare cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Replaced,
    Unchanged,
    Failed,
    Skipped,
}

/// Fold one fetch result into the snapshot.
///
/// The snapshot is only replaced when the change detector sees a difference;
/// errors never touch it.
pub fn apply_fetch_result<T: Tracked>(
    snapshot: &watch::Sender<Option<Arc<T>>>,
    result: Result<T, ApiError>,
) -> (CycleOutcome, Option<ApiError>) {
    match result {
        Ok(next) => {
            let changed = should_replace(snapshot.borrow().as_deref(), &next);
            if changed {
                snapshot.send_replace(Some(Arc::new(next)));
                (CycleOutcome::Replaced, None)
            } else {
                (CycleOutcome::Unchanged, None)
            }
        }
        Err(e) if e.is_transient() => (CycleOutcome::Failed, Some(e)),
        Err(e) => (CycleOutcome::Skipped, Some(e)),
    }
}

/// Run fetch-compare-replace cycles until `cancel` fires.
///
/// The next wait is armed only after the previous fetch finished, so polls
/// never overlap. Cancellation is checked before every wait and interrupts
/// both the wait and an in-flight fetch. With no snapshot yet the first
/// fetch happens immediately.
pub async fn run_poll_loop<T, F, Fut>(
    label: String,
    config: PollConfig,
    mut fetch: F,
    snapshot: watch::Sender<Option<Arc<T>>>,
    cancel: CancellationToken,
) -> PollStats
where
    T: Tracked + Send + Sync + 'static,
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
{
    let mut stats = PollStats::default();
    let mut backoff = Backoff::new(config.interval, config.max_backoff);
    let mut delay = if snapshot.borrow().is_none() {
        std::time::Duration::ZERO
    } else {
        config.interval
    };

    info!(
        event = "core.poller.started",
        label = %label,
        interval_ms = config.interval.as_millis() as u64
    );

    loop {
        if cancel.is_cancelled() {
            break;
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(delay) => {}
        }

        stats.fetches += 1;
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            result = fetch() => result,
        };

        let (outcome, error) = apply_fetch_result(&snapshot, result);
        delay = match outcome {
            CycleOutcome::Replaced => {
                backoff.reset();
                stats.replacements += 1;
                debug!(
                    event = "core.poller.snapshot_replaced",
                    label = %label,
                    replacements = stats.replacements
                );
                config.interval
            }
            CycleOutcome::Unchanged => {
                backoff.reset();
                config.interval
            }
            CycleOutcome::Failed => {
                stats.failures += 1;
                let retry_in = backoff.next_delay();
                warn!(
                    event = "core.poller.fetch_failed",
                    label = %label,
                    attempt = backoff.attempts(),
                    retry_in_ms = retry_in.as_millis() as u64,
                    error = error.as_ref().map(|e| e.to_string()).unwrap_or_default(),
                    "Fetch failed, keeping last snapshot"
                );
                retry_in
            }
            CycleOutcome::Skipped => {
                backoff.reset();
                stats.skipped += 1;
                warn!(
                    event = "core.poller.cycle_skipped",
                    label = %label,
                    error = error.as_ref().map(|e| e.to_string()).unwrap_or_default(),
                    "Response rejected, skipping this cycle"
                );
                config.interval
            }
        };
    }

    info!(
        event = "core.poller.stopped",
        label = %label,
        fetches = stats.fetches,
        replacements = stats.replacements,
        failures = stats.failures,
        skipped = stats.skipped
    );

    stats
}
