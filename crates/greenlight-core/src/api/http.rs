//! HTTP client for the read-only Greenlight JSON API.

use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderValue};
use reqwest::{StatusCode, Url};
use tracing::debug;

use super::errors::ApiError;
use super::source::ProjectSource;
use crate::config::{GreenlightConfig, validate_base_url};
use crate::projects::{Project, ProjectId, ProjectSet, parse_project, parse_project_set};

/// [`ProjectSource`] backed by `reqwest`.
///
/// The base URL may carry a path prefix (`https://ci.local/greenlight`);
/// endpoint paths are appended to it.
#[derive(Debug, Clone)]
pub struct HttpProjectSource {
    client: reqwest::Client,
    projects_url: Url,
}

impl HttpProjectSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let mut projects_url =
            validate_base_url(base_url).map_err(|e| ApiError::InvalidBaseUrl {
                url: base_url.to_string(),
                message: e.to_string(),
            })?;

        projects_url
            .path_segments_mut()
            .map_err(|()| ApiError::InvalidBaseUrl {
                url: base_url.to_string(),
                message: "URL cannot carry a path".to_string(),
            })?
            .pop_if_empty()
            .extend(["api", "projects"]);

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::ClientBuildFailed {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            projects_url,
        })
    }

    pub fn from_config(config: &GreenlightConfig) -> Result<Self, ApiError> {
        Self::new(config.api.base_url(), config.request_timeout())
    }

    /// URL of the list endpoint.
    pub fn projects_url(&self) -> &Url {
        &self.projects_url
    }

    /// URL of the detail endpoint for `id`, with the id percent-encoded.
    pub fn project_url(&self, id: &ProjectId) -> Url {
        let mut url = self.projects_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(id.as_str());
        }
        url
    }

    async fn get_body(&self, url: &Url) -> Result<Vec<u8>, ApiError> {
        debug!(event = "core.api.fetch_started", url = %url);

        let response = self
            .client
            .get(url.clone())
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .send()
            .await
            .map_err(|e| request_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| request_error(url, e))?;

        debug!(
            event = "core.api.fetch_completed",
            url = %url,
            bytes = body.len()
        );

        Ok(body.to_vec())
    }
}

fn request_error(url: &Url, error: reqwest::Error) -> ApiError {
    if error.is_timeout() {
        ApiError::Timeout {
            url: url.to_string(),
        }
    } else {
        ApiError::Transport {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}

impl ProjectSource for HttpProjectSource {
    async fn fetch_projects(&self) -> Result<ProjectSet, ApiError> {
        let url = &self.projects_url;
        let body = self.get_body(url).await?;
        parse_project_set(&body).map_err(|source| ApiError::MalformedResponse {
            url: url.to_string(),
            source,
        })
    }

    async fn fetch_project(&self, id: &ProjectId) -> Result<Project, ApiError> {
        let url = self.project_url(id);
        let body = match self.get_body(&url).await {
            Ok(body) => body,
            Err(ApiError::HttpStatus { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                return Err(ApiError::ProjectNotFound { id: id.to_string() });
            }
            Err(e) => return Err(e),
        };
        parse_project(&body, Some(id)).map_err(|source| ApiError::MalformedResponse {
            url: url.to_string(),
            source,
        })
    }
}
