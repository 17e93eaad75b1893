//! Track Store - the indexed database shared by every backend
//!
//! Holds projects by name and groups/trials by uid, with O(1) lookups and
//! parent/child links kept consistent on insert. The whole store round-trips
//! through serde, which is how the file backend persists it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::query::Query;
use crate::structure::{MetricRecord, Project, Trial, TrialGroup};
use crate::{Error, Result};

/// In-memory indexed store for experiment tracking data.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct TrackStore {
    projects: HashMap<String, Project>,
    groups: HashMap<String, TrialGroup>,
    trials: HashMap<String, Trial>,
}

impl TrackStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the store holds no records at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty() && self.groups.is_empty() && self.trials.is_empty()
    }

    /// Number of projects in the store.
    #[must_use]
    pub fn project_count(&self) -> usize {
        self.projects.len()
    }

    /// Number of groups in the store.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Number of trials in the store.
    #[must_use]
    pub fn trial_count(&self) -> usize {
        self.trials.len()
    }

    /// Insert a project, or return the existing record with the same name.
    ///
    /// Declaring a project twice is idempotent: the stored record wins and a
    /// warning is emitted.
    pub fn insert_project(&mut self, project: Project) -> Project {
        if let Some(existing) = self.projects.get(project.name()) {
            warn!(name = project.name(), "project already exists; keeping stored record");
            return existing.clone();
        }

        debug!(name = project.name(), "create new project");
        self.projects
            .insert(project.name().to_string(), project.clone());
        project
    }

    /// Get a project by name.
    #[must_use]
    pub fn get_project(&self, name: &str) -> Option<&Project> {
        self.projects.get(name)
    }

    /// Insert a group under its project, or return the existing record with
    /// the same uid.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingParent`] if the parent project was never
    /// declared.
    pub fn insert_group(&mut self, group: TrialGroup) -> Result<TrialGroup> {
        if let Some(existing) = self.groups.get(group.uid()) {
            warn!(name = group.name(), "group already exists; keeping stored record");
            return Ok(existing.clone());
        }

        let project = self.projects.get_mut(group.project()).ok_or_else(|| {
            Error::MissingParent(format!(
                "cannot create group `{}` without project `{}`",
                group.name(),
                group.project()
            ))
        })?;
        project.add_group(group.uid());

        debug!(name = group.name(), "create new group");
        self.groups.insert(group.uid().to_string(), group.clone());
        Ok(group)
    }

    /// Get a group by uid.
    #[must_use]
    pub fn get_group(&self, uid: &str) -> Option<&TrialGroup> {
        self.groups.get(uid)
    }

    /// Insert a trial, linking it under its project and group.
    ///
    /// If the uid already exists the revision is bumped until it is free, so
    /// re-running an identical configuration yields a new record instead of
    /// overwriting the old one. The possibly-rehashed, sealed trial is
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingParent`] if the parent project or group was
    /// never declared.
    pub fn insert_trial(&mut self, mut trial: Trial) -> Result<Trial> {
        while self.trials.contains_key(trial.uid()) {
            trial.bump_revision();
            warn!(
                revision = trial.revision(),
                "trial uid already recorded; increasing revision"
            );
        }

        let project = self.projects.get_mut(trial.project()).ok_or_else(|| {
            Error::MissingParent(format!(
                "cannot create a trial without project `{}`",
                trial.project()
            ))
        })?;
        project.add_trial(trial.uid());

        if let Some(group_uid) = trial.group().map(String::from) {
            let group = self.groups.get_mut(&group_uid).ok_or_else(|| {
                Error::MissingParent(format!(
                    "trial references unknown group `{group_uid}`"
                ))
            })?;
            group.add_trial(trial.uid());
        }

        trial.seal();
        self.trials.insert(trial.uid().to_string(), trial.clone());
        Ok(trial)
    }

    /// Replace an already-inserted trial with a newer snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] if the uid was never inserted.
    pub fn update_trial(&mut self, trial: Trial) -> Result<()> {
        if !self.trials.contains_key(trial.uid()) {
            return Err(Error::Storage(format!(
                "cannot update unknown trial `{}`",
                trial.uid()
            )));
        }

        self.trials.insert(trial.uid().to_string(), trial);
        Ok(())
    }

    /// Get a trial by uid.
    #[must_use]
    pub fn get_trial(&self, uid: &str) -> Option<&Trial> {
        self.trials.get(uid)
    }

    /// Metric records for one trial and key, ordered by step.
    ///
    /// This is the primary query for time-series metric data.
    #[must_use]
    pub fn metrics_for_trial(&self, uid: &str, key: &str) -> Vec<MetricRecord> {
        self.trials
            .get(uid)
            .map(|trial| trial.metrics_for(key))
            .unwrap_or_default()
    }

    /// Projects matching a query.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if a record fails to serialize for matching.
    pub fn fetch_projects(&self, query: &Query) -> Result<Vec<Project>> {
        Self::fetch(self.projects.values(), query)
    }

    /// Groups matching a query.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if a record fails to serialize for matching.
    pub fn fetch_groups(&self, query: &Query) -> Result<Vec<TrialGroup>> {
        Self::fetch(self.groups.values(), query)
    }

    /// Trials matching a query.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if a record fails to serialize for matching.
    pub fn fetch_trials(&self, query: &Query) -> Result<Vec<Trial>> {
        Self::fetch(self.trials.values(), query)
    }

    fn fetch<'a, T>(records: impl Iterator<Item = &'a T>, query: &Query) -> Result<Vec<T>>
    where
        T: Clone + Serialize + 'a,
    {
        let mut matching = Vec::new();
        for record in records {
            let value = serde_json::to_value(record)?;
            if query.matches(&value) {
                matching.push(record.clone());
            }
        }
        Ok(matching)
    }
}
