//! Track Client - the entry point an experiment script uses
//!
//! The client buffers the active project, group, and trial in memory and
//! forwards them to the configured backend; [`TrackClient::save`] is the
//! durability point.
//!
//! ```rust
//! use trackdb::TrackClient;
//!
//! # fn main() -> trackdb::Result<()> {
//! let mut client = TrackClient::new("memory://doc-example")?;
//! client.set_project("convnet", "vision baseline")?;
//! client.set_group("baseline", "control runs")?;
//!
//! client.new_trial()?;
//! client.log_arguments([("lr", 0.01), ("momentum", 0.9)], false)?;
//! client.log_metrics(Some(0), [("loss", 2.3)])?;
//! client.save()?;
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::time::Instant;

use serde::Serialize;
use serde_json::Value;

use crate::aggregator::AggregatorKind;
use crate::persistence::{build_backend, Backend};
use crate::structure::{MetricRecord, Project, Trial, TrialGroup, TrialStatus};
use crate::{Error, Result};

/// Façade that records experiment metadata into a backend selected by a
/// connection string.
///
/// Operations that need an active project or trial fail with
/// [`Error::InvalidState`] when invoked out of order.
pub struct TrackClient {
    backend: Box<dyn Backend>,
    project: Option<Project>,
    group: Option<TrialGroup>,
    trial: Option<Trial>,
    trial_inserted: bool,
}

impl TrackClient {
    /// Connect to the backend named by `uri`, e.g. `file:runs.json` or
    /// `memory://shared`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URI is malformed, names an unsupported
    /// scheme, or the backend fails to open.
    pub fn new(uri: &str) -> Result<Self> {
        Ok(Self {
            backend: build_backend(uri)?,
            project: None,
            group: None,
            trial: None,
            trial_inserted: false,
        })
    }

    /// Declare and select the active project.
    ///
    /// Redeclaring an existing project selects the stored record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] once a trial has started.
    pub fn set_project(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<()> {
        if self.trial.is_some() {
            return Err(Error::InvalidState(
                "set_project cannot be called after a trial has started",
            ));
        }

        let project = self.backend.new_project(Project::new(name, description))?;
        self.project = Some(project);
        self.group = None;
        Ok(())
    }

    /// Declare and select the active group within the current project.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] if no project was declared.
    pub fn set_group(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<()> {
        let project = self
            .project
            .as_ref()
            .ok_or(Error::InvalidState("set_group requires set_project first"))?;

        let group = self
            .backend
            .new_group(TrialGroup::new(name, description, project.name()))?;
        self.group = Some(group);
        Ok(())
    }

    /// Begin a new trial under the current project and group, returning its
    /// uid. Any previous trial is flushed to the backend first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] if no project was declared.
    pub fn new_trial(&mut self) -> Result<String> {
        let project_name = self
            .project
            .as_ref()
            .ok_or(Error::InvalidState("new_trial requires set_project first"))?
            .name()
            .to_string();

        self.flush_trial()?;

        let group_uid = self.group.as_ref().map(|g| g.uid().to_string());
        let mut trial = Trial::new(project_name, group_uid);
        trial.start();

        let uid = trial.uid().to_string();
        self.trial = Some(trial);
        self.trial_inserted = false;
        Ok(uid)
    }

    /// Record an argument snapshot against the current trial and echo the
    /// recorded mapping back. With `show`, also print it as a table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] before [`TrackClient::new_trial`].
    pub fn log_arguments<K, V>(
        &mut self,
        args: impl IntoIterator<Item = (K, V)>,
        show: bool,
    ) -> Result<BTreeMap<String, Value>>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let args: BTreeMap<String, Value> = args
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        let trial = self.current_trial_mut()?;
        trial.log_parameters(args);
        let recorded = trial.parameters().clone();

        if show {
            println!("{:-<80}", "");
            for (key, value) in &recorded {
                println!("{key:>30}: {value}");
            }
            println!("{:-<80}", "");
        }

        Ok(recorded)
    }

    /// Append one metric record per `(key, value)` pair at the given step.
    ///
    /// Records are append-only: logging the same key at the same step twice
    /// yields two records.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] before [`TrackClient::new_trial`].
    pub fn log_metrics<K>(
        &mut self,
        step: Option<u64>,
        metrics: impl IntoIterator<Item = (K, f64)>,
    ) -> Result<()>
    where
        K: Into<String>,
    {
        let trial = self.current_trial_mut()?;
        for (key, value) in metrics {
            trial.log_metric(MetricRecord::new(key, step, value));
        }
        Ok(())
    }

    /// Record a stepless value through the aggregator chosen for its key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] before [`TrackClient::new_trial`].
    pub fn log_value(
        &mut self,
        key: impl Into<String>,
        value: f64,
        kind: AggregatorKind,
    ) -> Result<()> {
        self.current_trial_mut()?.log_value(key, value, kind);
        Ok(())
    }

    /// Time a scoped block of work against the current trial.
    ///
    /// The elapsed seconds are recorded under `name` on every exit path,
    /// whether the closure succeeds or fails.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] before [`TrackClient::new_trial`],
    /// otherwise whatever the closure returns.
    pub fn time<T>(
        &mut self,
        name: &str,
        work: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        self.current_trial_mut()?;

        let start = Instant::now();
        let outcome = work(self);
        let elapsed = start.elapsed().as_secs_f64();

        if let Some(trial) = self.trial.as_mut() {
            trial.record_chrono(name, elapsed);
        }
        outcome
    }

    /// Complete the current trial with a final status.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] before [`TrackClient::new_trial`].
    pub fn finish(&mut self, status: TrialStatus) -> Result<()> {
        self.current_trial_mut()?.complete(status);
        Ok(())
    }

    /// Produce a summary of the current trial's recorded data.
    ///
    /// The report serializes to JSON and pretty-prints through `Display`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] before [`TrackClient::new_trial`].
    pub fn report(&self) -> Result<TrialReport> {
        let trial = self
            .trial
            .as_ref()
            .ok_or(Error::InvalidState("report requires an active trial"))?;
        Ok(TrialReport {
            trial: trial.clone(),
        })
    }

    /// Persist all buffered state to the backend.
    ///
    /// Durability only: the in-memory trial keeps accumulating afterwards
    /// and can be saved again.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the records or the commit
    /// fails.
    pub fn save(&mut self) -> Result<()> {
        self.flush_trial()?;
        self.backend.commit()
    }

    /// The uid of the current trial, if one is active.
    #[must_use]
    pub fn trial_uid(&self) -> Option<&str> {
        self.trial.as_ref().map(Trial::uid)
    }

    fn current_trial_mut(&mut self) -> Result<&mut Trial> {
        self.trial
            .as_mut()
            .ok_or(Error::InvalidState("no active trial; call new_trial first"))
    }

    fn flush_trial(&mut self) -> Result<()> {
        let Some(trial) = self.trial.clone() else {
            return Ok(());
        };

        if self.trial_inserted {
            self.backend.update_trial(trial)?;
        } else {
            let sealed = self.backend.new_trial(trial)?;
            self.trial = Some(sealed);
            self.trial_inserted = true;
        }
        Ok(())
    }
}

/// Summary of one trial's recorded data.
#[derive(Debug, Clone, Serialize)]
pub struct TrialReport {
    #[serde(flatten)]
    trial: Trial,
}

impl TrialReport {
    /// The reported trial snapshot.
    #[must_use]
    pub const fn trial(&self) -> &Trial {
        &self.trial
    }
}

impl fmt::Display for TrialReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string_pretty(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}
