//! JSON file backend
//!
//! Loads the whole database on open and rewrites it on commit. The write
//! goes through a sibling temp file followed by a rename, so a crash mid-
//! commit leaves the previous database intact rather than a truncated file.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::query::Query;
use crate::store::TrackStore;
use crate::structure::{Project, Trial, TrialGroup};
use crate::uri::ParsedUri;
use crate::{Error, Result};

use super::Backend;

/// File-based storage for experiment metadata, one JSON document per
/// database.
pub struct FileBackend {
    path: PathBuf,
    store: TrackStore,
}

impl FileBackend {
    /// Open a file backend, loading the database if the file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(uri: &ParsedUri) -> Result<Self> {
        let path = PathBuf::from(uri.path());
        let store = Self::load(&path)?;

        debug!(path = %path.display(), "opened file backend");
        Ok(Self { path, store })
    }

    /// Path of the underlying database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(path: &Path) -> Result<TrackStore> {
        if !path.exists() {
            return Ok(TrackStore::new());
        }

        let contents = fs::read_to_string(path)?;
        if contents.trim().is_empty() {
            return Ok(TrackStore::new());
        }

        serde_json::from_str(&contents)
            .map_err(|e| Error::Storage(format!("corrupt database {}: {e}", path.display())))
    }
}

impl Backend for FileBackend {
    fn new_project(&mut self, project: Project) -> Result<Project> {
        Ok(self.store.insert_project(project))
    }

    fn new_group(&mut self, group: TrialGroup) -> Result<TrialGroup> {
        self.store.insert_group(group)
    }

    fn new_trial(&mut self, trial: Trial) -> Result<Trial> {
        self.store.insert_trial(trial)
    }

    fn update_trial(&mut self, trial: Trial) -> Result<()> {
        self.store.update_trial(trial)
    }

    fn get_trial(&self, uid: &str) -> Result<Option<Trial>> {
        Ok(self.store.get_trial(uid).cloned())
    }

    fn fetch_projects(&self, query: &Query) -> Result<Vec<Project>> {
        self.store.fetch_projects(query)
    }

    fn fetch_groups(&self, query: &Query) -> Result<Vec<TrialGroup>> {
        self.store.fetch_groups(query)
    }

    fn fetch_trials(&self, query: &Query) -> Result<Vec<Trial>> {
        self.store.fetch_trials(query)
    }

    fn commit(&mut self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.store)?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        if let Err(e) = fs::write(&tmp, json) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }

        debug!(path = %self.path.display(), "committed database");
        Ok(())
    }
}
