//! Trial Group Record - named cluster of related trials within a project

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::content_hash;

/// A trial group clusters related trials under a project, e.g. baseline runs
/// versus experimental runs.
///
/// The uid is a content hash of the project and group names, so redeclaring
/// the same group yields the same record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrialGroup {
    uid: String,
    name: String,
    description: String,
    project: String,
    created_at: DateTime<Utc>,
    trials: Vec<String>,
}

impl TrialGroup {
    /// Create a new group record under the given project.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        project: impl Into<String>,
    ) -> Self {
        let name = name.into();
        let project = project.into();
        Self {
            uid: content_hash(&[&project, &name]),
            name,
            description: description.into(),
            project,
            created_at: Utc::now(),
            trials: Vec::new(),
        }
    }

    /// Get the group uid.
    #[must_use]
    pub fn uid(&self) -> &str {
        &self.uid
    }

    /// Get the group name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the group description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Name of the project this group belongs to.
    #[must_use]
    pub fn project(&self) -> &str {
        &self.project
    }

    /// Get the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Uids of the trials recorded under this group.
    #[must_use]
    pub fn trials(&self) -> &[String] {
        &self.trials
    }

    /// Link a trial uid under this group.
    pub(crate) fn add_trial(&mut self, uid: impl Into<String>) {
        let uid = uid.into();
        if !self.trials.contains(&uid) {
            self.trials.push(uid);
        }
    }
}
