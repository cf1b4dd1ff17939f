use crate::errors::GreenlightError;
use crate::projects::ProjectError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid API base URL '{url}': {message}")]
    InvalidBaseUrl { url: String, message: String },

    #[error("Failed to build HTTP client: {message}")]
    ClientBuildFailed { message: String },

    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("Request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("Backend answered {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Project '{id}' not found")]
    ProjectNotFound { id: String },

    #[error("Malformed response from {url}: {source}")]
    MalformedResponse {
        url: String,
        #[source]
        source: ProjectError,
    },
}

impl ApiError {
    /// Whether retrying the same request later can reasonably succeed.
    ///
    /// Transport failures, timeouts, 5xx and 429 are transient. Malformed
    /// payloads and other statuses are not: the next regular poll may see a
    /// fixed backend, but hammering it sooner will not help.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Timeout { .. } | ApiError::Transport { .. } => true,
            ApiError::HttpStatus { status, .. } => *status >= 500 || *status == 429,

            ApiError::InvalidBaseUrl { .. }
            | ApiError::ClientBuildFailed { .. }
            | ApiError::ProjectNotFound { .. }
            | ApiError::MalformedResponse { .. } => false,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, ApiError::MalformedResponse { .. })
    }
}

impl GreenlightError for ApiError {
    fn error_code(&self) -> &'static str {
        match self {
            ApiError::InvalidBaseUrl { .. } => "API_INVALID_BASE_URL",
            ApiError::ClientBuildFailed { .. } => "API_CLIENT_BUILD_FAILED",
            ApiError::Timeout { .. } => "API_TIMEOUT",
            ApiError::Transport { .. } => "API_TRANSPORT_FAILED",
            ApiError::HttpStatus { .. } => "API_HTTP_STATUS",
            ApiError::ProjectNotFound { .. } => "API_PROJECT_NOT_FOUND",
            ApiError::MalformedResponse { .. } => "API_MALFORMED_RESPONSE",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            ApiError::InvalidBaseUrl { .. } | ApiError::ProjectNotFound { .. }
        )
    }
}
