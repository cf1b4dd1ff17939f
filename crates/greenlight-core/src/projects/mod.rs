pub mod changes;
pub mod errors;
pub mod parse;
pub mod status;
pub mod types;

// Re-export commonly used types at module level
pub use changes::{Tracked, should_replace};
pub use errors::ProjectError;
pub use parse::{parse_project, parse_project_set};
pub use status::{ProjectStatus, now_ms};
pub use types::{Project, ProjectId, ProjectSet};
