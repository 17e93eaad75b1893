//! Trial Record - one execution of an experiment

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::aggregator::{Aggregator, AggregatorKind};

use super::{content_hash, MetricRecord};

/// Lifecycle status of a trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrialStatus {
    /// Trial is created but not yet started.
    Pending,
    /// Trial is currently executing.
    Running,
    /// Trial completed successfully.
    Success,
    /// Trial failed with an error.
    Failed,
    /// Trial was cancelled by user or system.
    Cancelled,
}

/// A trial is one run of an experiment under a project and, optionally, a
/// group. It owns the argument snapshot, the append-only metric time series,
/// stepless aggregated values, and named timers.
///
/// ## Uid
///
/// The uid is a content hash over project, group, parameters, and revision.
/// It is recomputed as parameters are logged until the trial is inserted
/// into a backend, after which the uid is sealed and stays stable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Trial {
    uid: String,
    project: String,
    group: Option<String>,
    revision: u32,
    status: TrialStatus,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
    parameters: BTreeMap<String, Value>,
    metrics: Vec<MetricRecord>,
    values: BTreeMap<String, Aggregator>,
    chronos: BTreeMap<String, Aggregator>,
    #[serde(skip)]
    sealed: bool,
}

impl Trial {
    /// Create a new pending trial under a project and optional group uid.
    #[must_use]
    pub fn new(project: impl Into<String>, group: Option<String>) -> Self {
        let mut trial = Self {
            uid: String::new(),
            project: project.into(),
            group,
            revision: 0,
            status: TrialStatus::Pending,
            started_at: None,
            ended_at: None,
            parameters: BTreeMap::new(),
            metrics: Vec::new(),
            values: BTreeMap::new(),
            chronos: BTreeMap::new(),
            sealed: false,
        };
        trial.rehash();
        trial
    }

    /// Get the trial uid.
    #[must_use]
    pub fn uid(&self) -> &str {
        &self.uid
    }

    /// Name of the project this trial belongs to.
    #[must_use]
    pub fn project(&self) -> &str {
        &self.project
    }

    /// Uid of the group this trial belongs to, if any.
    #[must_use]
    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    /// Revision number, bumped when a trial with the same uid already exists
    /// in the backend.
    #[must_use]
    pub const fn revision(&self) -> u32 {
        self.revision
    }

    /// Get the current lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TrialStatus {
        self.status
    }

    /// Get the start timestamp, if the trial has started.
    #[must_use]
    pub const fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Get the end timestamp, if the trial has completed.
    #[must_use]
    pub const fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    /// Snapshot of the arguments logged against this trial.
    #[must_use]
    pub const fn parameters(&self) -> &BTreeMap<String, Value> {
        &self.parameters
    }

    /// All metric records in logging order.
    #[must_use]
    pub fn metrics(&self) -> &[MetricRecord] {
        &self.metrics
    }

    /// Stepless aggregated values by key.
    #[must_use]
    pub const fn values(&self) -> &BTreeMap<String, Aggregator> {
        &self.values
    }

    /// Named timers by key.
    #[must_use]
    pub const fn chronos(&self) -> &BTreeMap<String, Aggregator> {
        &self.chronos
    }

    /// Metric records for one key, ordered by step.
    ///
    /// Records logged without a step sort before stepped records and keep
    /// their logging order.
    #[must_use]
    pub fn metrics_for(&self, key: &str) -> Vec<MetricRecord> {
        let mut records: Vec<MetricRecord> = self
            .metrics
            .iter()
            .filter(|m| m.key() == key)
            .cloned()
            .collect();

        records.sort_by_key(MetricRecord::step);
        records
    }

    /// Start the trial, transitioning to Running and stamping `started_at`.
    pub fn start(&mut self) {
        self.status = TrialStatus::Running;
        self.started_at = Some(Utc::now());
    }

    /// Complete the trial with a final status, stamping `ended_at`.
    pub fn complete(&mut self, status: TrialStatus) {
        self.status = status;
        self.ended_at = Some(Utc::now());
    }

    /// Merge an argument snapshot into the trial parameters.
    ///
    /// Rehashes the uid unless the trial is already sealed in a backend.
    pub fn log_parameters(&mut self, args: BTreeMap<String, Value>) {
        self.parameters.extend(args);
        if !self.sealed {
            self.rehash();
        }
    }

    /// Append one metric record.
    pub fn log_metric(&mut self, record: MetricRecord) {
        self.metrics.push(record);
    }

    /// Record a stepless value through the aggregator for `key`.
    ///
    /// The aggregator is instantiated from `kind` on first use; later calls
    /// keep the existing aggregator whatever `kind` says.
    pub fn log_value(&mut self, key: impl Into<String>, value: f64, kind: AggregatorKind) {
        self.values
            .entry(key.into())
            .or_insert_with(|| kind.build())
            .append(value);
    }

    /// Record one elapsed-seconds observation for a named timer.
    pub fn record_chrono(&mut self, name: impl Into<String>, seconds: f64) {
        self.chronos
            .entry(name.into())
            .or_insert_with(|| AggregatorKind::Stats.build())
            .append(seconds);
    }

    /// Freeze the uid; called when the trial is inserted into a backend.
    pub(crate) fn seal(&mut self) {
        self.sealed = true;
    }

    /// Bump the revision and rehash, used when the uid already exists in the
    /// backend.
    pub(crate) fn bump_revision(&mut self) {
        self.revision += 1;
        self.rehash();
    }

    fn rehash(&mut self) {
        let mut parts: Vec<String> = vec![
            self.project.clone(),
            self.group.clone().unwrap_or_default(),
            self.revision.to_string(),
        ];
        for (key, value) in &self.parameters {
            parts.push(key.clone());
            parts.push(value.to_string());
        }

        let refs: Vec<&str> = parts.iter().map(String::as_str).collect();
        self.uid = content_hash(&refs);
    }
}
