use std::future::Future;
use std::sync::Arc;

use super::errors::ApiError;
use crate::projects::{Project, ProjectId, ProjectSet};

/// Read side of the Greenlight backend.
///
/// The poll loop only depends on this trait, so the HTTP client can be
/// swapped for any other transport (or a scripted source in tests).
pub trait ProjectSource: Send + Sync + 'static {
    /// `GET /api/projects`
    fn fetch_projects(&self) -> impl Future<Output = Result<ProjectSet, ApiError>> + Send;

    /// `GET /api/projects/:projectId`
    fn fetch_project(
        &self,
        id: &ProjectId,
    ) -> impl Future<Output = Result<Project, ApiError>> + Send;
}

impl<S: ProjectSource> ProjectSource for Arc<S> {
    fn fetch_projects(&self) -> impl Future<Output = Result<ProjectSet, ApiError>> + Send {
        self.as_ref().fetch_projects()
    }

    fn fetch_project(
        &self,
        id: &ProjectId,
    ) -> impl Future<Output = Result<Project, ApiError>> + Send {
        self.as_ref().fetch_project(id)
    }
}
