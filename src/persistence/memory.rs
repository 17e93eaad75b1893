//! Named in-memory backend
//!
//! Stores live in a process-global registry keyed by the URI path, so two
//! clients opening `memory://shared` see the same data. Useful for tests and
//! for in-process producers/consumers; data is lost on process exit.

use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use dashmap::DashMap;
use tracing::debug;

use crate::query::Query;
use crate::store::TrackStore;
use crate::structure::{Project, Trial, TrialGroup};
use crate::uri::ParsedUri;
use crate::{Error, Result};

use super::Backend;

type SharedStore = Arc<Mutex<TrackStore>>;

fn registry() -> &'static DashMap<String, SharedStore> {
    static REGISTRY: OnceLock<DashMap<String, SharedStore>> = OnceLock::new();
    REGISTRY.get_or_init(DashMap::new)
}

/// In-memory storage for experiment metadata, shared per name within the
/// process.
pub struct MemoryBackend {
    name: String,
    store: SharedStore,
}

impl MemoryBackend {
    /// Open (or join) the named in-memory store.
    #[must_use]
    pub fn open(uri: &ParsedUri) -> Self {
        let name = uri.path().to_string();
        let store = registry()
            .entry(name.clone())
            .or_insert_with(SharedStore::default)
            .clone();

        debug!(name = %name, "opened in-memory backend");
        Self { name, store }
    }

    /// Name of the shared store this backend is attached to.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    fn lock(&self) -> Result<MutexGuard<'_, TrackStore>> {
        self.store
            .lock()
            .map_err(|e| Error::Storage(format!("in-memory store poisoned: {e}")))
    }
}

impl Backend for MemoryBackend {
    fn new_project(&mut self, project: Project) -> Result<Project> {
        Ok(self.lock()?.insert_project(project))
    }

    fn new_group(&mut self, group: TrialGroup) -> Result<TrialGroup> {
        self.lock()?.insert_group(group)
    }

    fn new_trial(&mut self, trial: Trial) -> Result<Trial> {
        self.lock()?.insert_trial(trial)
    }

    fn update_trial(&mut self, trial: Trial) -> Result<()> {
        self.lock()?.update_trial(trial)
    }

    fn get_trial(&self, uid: &str) -> Result<Option<Trial>> {
        Ok(self.lock()?.get_trial(uid).cloned())
    }

    fn fetch_projects(&self, query: &Query) -> Result<Vec<Project>> {
        self.lock()?.fetch_projects(query)
    }

    fn fetch_groups(&self, query: &Query) -> Result<Vec<TrialGroup>> {
        self.lock()?.fetch_groups(query)
    }

    fn fetch_trials(&self, query: &Query) -> Result<Vec<Trial>> {
        self.lock()?.fetch_trials(query)
    }

    fn commit(&mut self) -> Result<()> {
        // shared store is the storage target; nothing to flush
        Ok(())
    }
}
