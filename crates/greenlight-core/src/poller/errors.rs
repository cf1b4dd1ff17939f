use crate::errors::GreenlightError;

#[derive(Debug, thiserror::Error)]
pub enum PollerError {
    #[error("Invalid poll configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Poll task for '{label}' panicked: {message}")]
    TaskPanicked { label: String, message: String },

    #[error("Poll task for '{label}' was aborted")]
    TaskAborted { label: String },
}

impl GreenlightError for PollerError {
    fn error_code(&self) -> &'static str {
        match self {
            PollerError::InvalidConfig { .. } => "POLLER_INVALID_CONFIG",
            PollerError::TaskPanicked { .. } => "POLLER_TASK_PANICKED",
            PollerError::TaskAborted { .. } => "POLLER_TASK_ABORTED",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, PollerError::InvalidConfig { .. })
    }
}
