use crate::errors::GreenlightError;

/// Problems with a project id or with a project payload from the backend.
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("Invalid project id '{id}'")]
    InvalidId { id: String },

    #[error("Response is not valid JSON: {message}")]
    MalformedJson { message: String },

    #[error("Expected {expected}, got {found}")]
    UnexpectedShape {
        expected: &'static str,
        found: &'static str,
    },

    #[error("Project record {position} has no id")]
    MissingId { position: usize },

    #[error("Project keyed '{key}' carries a different id '{id}'")]
    IdMismatch { key: String, id: String },

    #[error("Project id '{id}' appears more than once")]
    DuplicateId { id: String },

    #[error("Project '{id}' has invalid field '{field}': {message}")]
    InvalidField {
        id: String,
        field: &'static str,
        message: String,
    },
}

impl GreenlightError for ProjectError {
    fn error_code(&self) -> &'static str {
        match self {
            ProjectError::InvalidId { .. } => "PROJECT_INVALID_ID",
            ProjectError::MalformedJson { .. } => "PROJECT_MALFORMED_JSON",
            ProjectError::UnexpectedShape { .. } => "PROJECT_UNEXPECTED_SHAPE",
            ProjectError::MissingId { .. } => "PROJECT_MISSING_ID",
            ProjectError::IdMismatch { .. } => "PROJECT_ID_MISMATCH",
            ProjectError::DuplicateId { .. } => "PROJECT_DUPLICATE_ID",
            ProjectError::InvalidField { .. } => "PROJECT_INVALID_FIELD",
        }
    }

    fn is_user_error(&self) -> bool {
        // Only ids come from the user; everything else is a backend payload problem.
        match self {
            ProjectError::InvalidId { .. } => true,

            ProjectError::MalformedJson { .. }
            | ProjectError::UnexpectedShape { .. }
            | ProjectError::MissingId { .. }
            | ProjectError::IdMismatch { .. }
            | ProjectError::DuplicateId { .. }
            | ProjectError::InvalidField { .. } => false,
        }
    }
}
