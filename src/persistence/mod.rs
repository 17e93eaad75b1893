//! Pluggable storage backends
//!
//! A backend is the storage target every record ends up in. It is selected
//! by the connection string handed to the client:
//!
//! - `file:runs.json` / `file://results/runs.json` — JSON file on disk,
//!   loaded on open and written atomically on [`Backend::commit`]
//! - `memory://name` — named in-memory store shared by every client in the
//!   process that opens the same name
//!
//! Backends buffer into a [`TrackStore`](crate::TrackStore); `commit` is the
//! only durability point.

mod file;
mod memory;

pub use file::FileBackend;
pub use memory::MemoryBackend;

use crate::query::Query;
use crate::structure::{Project, Trial, TrialGroup};
use crate::uri::ParsedUri;
use crate::{Error, Result};

/// Storage backend contract.
///
/// Implementations are synchronous; the client drives them from a single
/// logging thread per trial.
pub trait Backend: Send {
    /// Declare a project, returning the stored record (existing records win
    /// over redeclarations).
    fn new_project(&mut self, project: Project) -> Result<Project>;

    /// Declare a group under its project, returning the stored record.
    fn new_group(&mut self, group: TrialGroup) -> Result<TrialGroup>;

    /// Insert a trial, returning the sealed record. The revision is bumped
    /// when the uid is already taken.
    fn new_trial(&mut self, trial: Trial) -> Result<Trial>;

    /// Replace an inserted trial with a newer snapshot.
    fn update_trial(&mut self, trial: Trial) -> Result<()>;

    /// Get a trial by uid.
    fn get_trial(&self, uid: &str) -> Result<Option<Trial>>;

    /// Projects matching a query.
    fn fetch_projects(&self, query: &Query) -> Result<Vec<Project>>;

    /// Groups matching a query.
    fn fetch_groups(&self, query: &Query) -> Result<Vec<TrialGroup>>;

    /// Trials matching a query.
    fn fetch_trials(&self, query: &Query) -> Result<Vec<Trial>>;

    /// Flush buffered state to the storage target.
    fn commit(&mut self) -> Result<()>;
}

/// Build the backend selected by a connection string.
///
/// # Errors
///
/// Returns [`Error::InvalidUri`] on a malformed string and
/// [`Error::UnsupportedScheme`] when no backend claims the scheme.
///
/// # Example
///
/// ```rust
/// use trackdb::persistence::build_backend;
///
/// let _backend = build_backend("memory://doc-example")?;
/// # Ok::<(), trackdb::Error>(())
/// ```
pub fn build_backend(uri: &str) -> Result<Box<dyn Backend>> {
    let parsed = ParsedUri::parse(uri)?;

    match parsed.scheme() {
        "file" => Ok(Box::new(FileBackend::open(&parsed)?)),
        "memory" => Ok(Box::new(MemoryBackend::open(&parsed))),
        other => Err(Error::UnsupportedScheme(other.to_string())),
    }
}
