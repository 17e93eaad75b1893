//! Project Record - top-level namespace for a set of experiments

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A project is the root entity of the tracking schema.
///
/// Its name is unique within a backend and doubles as its identifier.
/// Once declared in a logging session a project is immutable apart from the
/// group and trial uids linked under it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Project {
    name: String,
    description: String,
    created_at: DateTime<Utc>,
    groups: Vec<String>,
    trials: Vec<String>,
}

impl Project {
    /// Create a new project record with the current timestamp.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            created_at: Utc::now(),
            groups: Vec::new(),
            trials: Vec::new(),
        }
    }

    /// Get the project name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the project description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Get the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Uids of the groups declared under this project.
    #[must_use]
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    /// Uids of the trials recorded under this project.
    #[must_use]
    pub fn trials(&self) -> &[String] {
        &self.trials
    }

    /// Link a group uid under this project.
    pub(crate) fn add_group(&mut self, uid: impl Into<String>) {
        let uid = uid.into();
        if !self.groups.contains(&uid) {
            self.groups.push(uid);
        }
    }

    /// Link a trial uid under this project.
    pub(crate) fn add_trial(&mut self, uid: impl Into<String>) {
        let uid = uid.into();
        if !self.trials.contains(&uid) {
            self.trials.push(uid);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_new() {
        let project = Project::new("convnet", "vision baseline");
        assert_eq!(project.name(), "convnet");
        assert_eq!(project.description(), "vision baseline");
        assert!(project.groups().is_empty());
        assert!(project.trials().is_empty());
    }

    #[test]
    fn test_project_links_deduplicate() {
        let mut project = Project::new("convnet", "");
        project.add_trial("t1");
        project.add_trial("t1");
        project.add_group("g1");
        assert_eq!(project.trials(), ["t1"]);
        assert_eq!(project.groups(), ["g1"]);
    }

    #[test]
    fn test_project_serialization() {
        let project = Project::new("convnet", "vision baseline");
        let json = serde_json::to_string(&project).unwrap();
        let back: Project = serde_json::from_str(&json).unwrap();
        assert_eq!(project, back);
    }
}
