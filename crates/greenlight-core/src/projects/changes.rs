//! Change detection between the rendered snapshot and a fresh fetch.
//!
//! Only tracked fields count: `up_to_date`, `returncode`, `mtime`, `args`,
//! `start_time` and `avg_runtime`. Names and captured output ride along with
//! a replacement but never trigger one on their own.

use super::types::{Project, ProjectSet};

/// A snapshot type the poll loop can compare against its previous value.
pub trait Tracked {
    /// Whether `next` differs from `self` in any field a view renders.
    fn has_changed(&self, next: &Self) -> bool;
}

impl Tracked for Project {
    fn has_changed(&self, next: &Self) -> bool {
        self.up_to_date != next.up_to_date
            || self.returncode != next.returncode
            || self.mtime != next.mtime
            || self.args != next.args
            || self.start_time != next.start_time
            || self.avg_runtime != next.avg_runtime
    }
}

impl Tracked for ProjectSet {
    /// A new id, a vanished id, or a tracked field change on any shared id.
    fn has_changed(&self, next: &Self) -> bool {
        if self.len() != next.len() {
            return true;
        }

        next.iter().any(|project| match self.get(&project.project_id) {
            Some(previous) => previous.has_changed(project),
            None => true,
        })
    }
}

/// Whether `next` should replace `previous`. Having nothing yet always counts.
pub fn should_replace<T: Tracked>(previous: Option<&T>, next: &T) -> bool {
    previous.is_none_or(|previous| previous.has_changed(next))
}
