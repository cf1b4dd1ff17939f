use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::errors::PollerError;
use super::operations::run_poll_loop;
use super::types::{PollConfig, PollStats};
use crate::api::{ApiError, ProjectSource};
use crate::projects::{Project, ProjectId, ProjectSet, Tracked};

/// A running poll loop owned by one view.
///
/// The loop runs on its own tokio task and publishes snapshots through a
/// `watch` channel. Call [`Poller::stop`] when the view goes away; dropping
/// the poller cancels the loop as well, it just does not wait for it.
#[derive(Debug)]
pub struct Poller<T> {
    label: String,
    cancel: CancellationToken,
    snapshot: watch::Receiver<Option<Arc<T>>>,
    task: Option<JoinHandle<PollStats>>,
}

impl<T> Poller<T>
where
    T: Tracked + Send + Sync + 'static,
{
    /// Start polling with an arbitrary fetch function.
    ///
    /// With `initial` set, the first fetch waits one interval and is compared
    /// against it; without, the first fetch happens right away.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<F, Fut>(
        label: impl Into<String>,
        config: PollConfig,
        initial: Option<T>,
        fetch: F,
    ) -> Result<Self, PollerError>
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        config.validate()?;

        let label = label.into();
        let cancel = CancellationToken::new();
        let (tx, rx) = watch::channel(initial.map(Arc::new));

        let task = tokio::spawn(run_poll_loop(
            label.clone(),
            config,
            fetch,
            tx,
            cancel.clone(),
        ));

        Ok(Self {
            label,
            cancel,
            snapshot: rx,
            task: Some(task),
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// The current snapshot, if anything was fetched yet.
    pub fn snapshot(&self) -> Option<Arc<T>> {
        self.snapshot.borrow().clone()
    }

    /// A receiver that is notified on every snapshot replacement.
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<T>>> {
        self.snapshot.clone()
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Cancel the loop and wait for it to finish.
    pub async fn stop(mut self) -> Result<PollStats, PollerError> {
        debug!(event = "core.poller.stop_requested", label = %self.label);
        self.cancel.cancel();

        let Some(task) = self.task.take() else {
            return Ok(PollStats::default());
        };

        match task.await {
            Ok(stats) => Ok(stats),
            Err(e) if e.is_panic() => Err(PollerError::TaskPanicked {
                label: self.label.clone(),
                message: e.to_string(),
            }),
            Err(_) => Err(PollerError::TaskAborted {
                label: self.label.clone(),
            }),
        }
    }
}

impl Poller<ProjectSet> {
    /// Poll `GET /api/projects` for the list view.
    pub fn start_list<S: ProjectSource>(
        source: Arc<S>,
        config: PollConfig,
        initial: Option<ProjectSet>,
    ) -> Result<Self, PollerError> {
        info!(event = "core.poller.list_start_requested");
        Self::start("projects", config, initial, move || {
            let source = Arc::clone(&source);
            async move { source.fetch_projects().await }
        })
    }
}

impl Poller<Project> {
    /// Poll `GET /api/projects/:projectId` for the detail view.
    pub fn start_detail<S: ProjectSource>(
        source: Arc<S>,
        id: ProjectId,
        config: PollConfig,
        initial: Option<Project>,
    ) -> Result<Self, PollerError> {
        info!(event = "core.poller.detail_start_requested", project_id = %id);
        let label = format!("project {}", id);
        Self::start(label, config, initial, move || {
            let source = Arc::clone(&source);
            let id = id.clone();
            async move { source.fetch_project(&id).await }
        })
    }
}

impl<T> Drop for Poller<T> {
    fn drop(&mut self) {
        // Tie the loop's lifetime to the view even without an explicit stop()
        self.cancel.cancel();
    }
}
