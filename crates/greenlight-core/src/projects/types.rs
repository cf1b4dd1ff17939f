use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::errors::ProjectError;

/// Identity of a project as assigned by the backend.
///
/// The backend sends ids as JSON integers (and uses their string form as map
/// keys); string ids are accepted too. Numeric ids are stored in canonical
/// form so that `"01"` and `1` name the same project, and sort numerically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
    /// Create a validated project id.
    ///
    /// # Errors
    ///
    /// Returns `ProjectError::InvalidId` if the id is empty or contains
    /// whitespace or control characters.
    pub fn new(id: impl AsRef<str>) -> Result<Self, ProjectError> {
        let raw = id.as_ref();
        if raw.is_empty() || raw.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(ProjectError::InvalidId {
                id: raw.to_string(),
            });
        }

        if raw.bytes().all(|b| b.is_ascii_digit())
            && let Ok(n) = raw.parse::<u64>()
        {
            return Ok(Self(n.to_string()));
        }

        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn numeric(&self) -> Option<u64> {
        if self.0.bytes().all(|b| b.is_ascii_digit()) {
            self.0.parse().ok()
        } else {
            None
        }
    }
}

impl From<u64> for ProjectId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Ord for ProjectId {
    fn cmp(&self, other: &Self) -> Ordering {
        // Numeric ids first in numeric order, then everything else lexically
        match (self.numeric(), other.numeric()) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for ProjectId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<'de> Deserialize<'de> for ProjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(u64),
            Text(String),
        }

        match RawId::deserialize(deserializer)? {
            RawId::Number(n) => Ok(ProjectId::from(n)),
            RawId::Text(s) => ProjectId::new(s).map_err(serde::de::Error::custom),
        }
    }
}

/// A tracked build/test job and its last known status.
///
/// Timestamps (`mtime`, `start_time`) are milliseconds since the Unix epoch
/// and `avg_runtime` is a duration in milliseconds, matching what the backend
/// sends. `returncode` and `mtime` both absent means the job never ran.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Project {
    #[serde(rename = "id")]
    pub project_id: ProjectId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub up_to_date: bool,
    pub returncode: Option<i32>,
    pub mtime: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_runtime: Option<f64>,
    /// Captured stdout of the last run. Only the detail endpoint sends it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out: Option<String>,
    /// Captured stderr of the last run. Only the detail endpoint sends it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub err: Option<String>,
}

impl Project {
    /// A project that has never been run, with every optional field unset.
    pub fn new(project_id: ProjectId) -> Self {
        Self {
            project_id,
            name: None,
            up_to_date: false,
            returncode: None,
            mtime: None,
            args: None,
            start_time: None,
            avg_runtime: None,
            out: None,
            err: None,
        }
    }

    /// Name to show in views, falling back to the id.
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => format!("project {}", self.project_id),
        }
    }
}

/// The project collection returned by the list endpoint, keyed by id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectSet {
    projects: BTreeMap<ProjectId, Project>,
}

impl ProjectSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a project, failing if its id is already present.
    pub fn insert(&mut self, project: Project) -> Result<(), ProjectError> {
        if self.projects.contains_key(&project.project_id) {
            return Err(ProjectError::DuplicateId {
                id: project.project_id.to_string(),
            });
        }
        self.projects.insert(project.project_id.clone(), project);
        Ok(())
    }

    pub fn get(&self, id: &ProjectId) -> Option<&Project> {
        self.projects.get(id)
    }

    pub fn contains(&self, id: &ProjectId) -> bool {
        self.projects.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Projects in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Project> {
        self.projects.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &ProjectId> {
        self.projects.keys()
    }
}

impl FromIterator<Project> for ProjectSet {
    /// Later projects replace earlier ones with the same id.
    fn from_iter<I: IntoIterator<Item = Project>>(iter: I) -> Self {
        Self {
            projects: iter
                .into_iter()
                .map(|p| (p.project_id.clone(), p))
                .collect(),
        }
    }
}

impl Serialize for ProjectSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.projects.values())
    }
}
