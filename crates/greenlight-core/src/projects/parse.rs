//! Strict parsing of backend payloads into [`Project`] and [`ProjectSet`].
//!
//! Unknown fields are ignored, but every known field must have the right
//! type. A payload that does not fit is rejected as a whole so the poll loop
//! can skip the cycle instead of rendering half a response.

use serde::Deserialize;
use serde_json::Value;

use super::errors::ProjectError;
use super::types::{Project, ProjectId, ProjectSet};

/// Wire shape of one project record. `id` may be missing inside a keyed map.
#[derive(Debug, Deserialize)]
struct ProjectRecord {
    #[serde(default, alias = "project_id")]
    id: Option<ProjectId>,
    #[serde(default)]
    name: Option<String>,
    up_to_date: bool,
    #[serde(default)]
    returncode: Option<i32>,
    #[serde(default)]
    mtime: Option<f64>,
    #[serde(default)]
    args: Option<Vec<String>>,
    #[serde(default)]
    start_time: Option<f64>,
    #[serde(default)]
    avg_runtime: Option<f64>,
    #[serde(default)]
    out: Option<String>,
    #[serde(default)]
    err: Option<String>,
}

impl ProjectRecord {
    fn into_project(self, id: ProjectId) -> Result<Project, ProjectError> {
        for (field, value) in [
            ("mtime", self.mtime),
            ("start_time", self.start_time),
            ("avg_runtime", self.avg_runtime),
        ] {
            if let Some(v) = value
                && v < 0.0
            {
                return Err(ProjectError::InvalidField {
                    id: id.to_string(),
                    field,
                    message: format!("must not be negative, got {}", v),
                });
            }
        }

        Ok(Project {
            project_id: id,
            name: self.name,
            up_to_date: self.up_to_date,
            returncode: self.returncode,
            mtime: self.mtime,
            args: self.args,
            start_time: self.start_time,
            avg_runtime: self.avg_runtime,
            out: self.out,
            err: self.err,
        })
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn parse_json(body: &[u8]) -> Result<Value, ProjectError> {
    serde_json::from_slice(body).map_err(|e| ProjectError::MalformedJson {
        message: e.to_string(),
    })
}

fn parse_record(value: Value) -> Result<ProjectRecord, ProjectError> {
    serde_json::from_value(value).map_err(|e| ProjectError::MalformedJson {
        message: e.to_string(),
    })
}

/// Parse the body of `GET /api/projects`.
///
/// Accepts either an object keyed by project id or an array of records.
/// Inside an object, a record without an `id` takes its key; a record whose
/// `id` differs from its key is rejected.
pub fn parse_project_set(body: &[u8]) -> Result<ProjectSet, ProjectError> {
    let mut set = ProjectSet::new();

    match parse_json(body)? {
        Value::Object(map) => {
            for (key, value) in map {
                let key_id = ProjectId::new(&key)?;
                let record = parse_record(value)?;
                let id = match record.id.clone() {
                    Some(id) if id != key_id => {
                        return Err(ProjectError::IdMismatch {
                            key,
                            id: id.to_string(),
                        });
                    }
                    Some(id) => id,
                    None => key_id,
                };
                set.insert(record.into_project(id)?)?;
            }
        }
        Value::Array(items) => {
            for (position, value) in items.into_iter().enumerate() {
                let record = parse_record(value)?;
                let id = record
                    .id
                    .clone()
                    .ok_or(ProjectError::MissingId { position })?;
                set.insert(record.into_project(id)?)?;
            }
        }
        other => {
            return Err(ProjectError::UnexpectedShape {
                expected: "an object or array of projects",
                found: json_kind(&other),
            });
        }
    }

    Ok(set)
}

/// Parse the body of `GET /api/projects/:projectId`.
///
/// When `requested` is given, the record's id must match it; a record
/// without an id takes the requested one.
pub fn parse_project(body: &[u8], requested: Option<&ProjectId>) -> Result<Project, ProjectError> {
    let value = parse_json(body)?;
    if !value.is_object() {
        return Err(ProjectError::UnexpectedShape {
            expected: "a project object",
            found: json_kind(&value),
        });
    }

    let record = parse_record(value)?;
    let id = match (record.id.clone(), requested) {
        (Some(id), Some(requested)) if &id != requested => {
            return Err(ProjectError::IdMismatch {
                key: requested.to_string(),
                id: id.to_string(),
            });
        }
        (Some(id), _) => id,
        (None, Some(requested)) => requested.clone(),
        (None, None) => return Err(ProjectError::MissingId { position: 0 }),
    };

    record.into_project(id)
}
