//! Read-only client for the Greenlight backend.
//!
//! - `GET /api/projects` returns every project, keyed by id
//! - `GET /api/projects/:projectId` returns one project with captured output

pub mod errors;
pub mod http;
pub mod source;

pub use errors::ApiError;
pub use http::HttpProjectSource;
pub use source::ProjectSource;
