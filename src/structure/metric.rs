//! Metric Record - one appended metric observation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single metric data point logged against a trial.
///
/// Records are append-only: logging the same key at the same step twice
/// yields two distinct records, never an overwrite. The optional `step`
/// (e.g. an epoch number) is the time-series sort key; `timestamp` gives
/// wall-clock correlation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricRecord {
    key: String,
    step: Option<u64>,
    value: f64,
    timestamp: DateTime<Utc>,
}

impl MetricRecord {
    /// Create a new metric record with the current timestamp.
    #[must_use]
    pub fn new(key: impl Into<String>, step: Option<u64>, value: f64) -> Self {
        Self {
            key: key.into(),
            step,
            value,
            timestamp: Utc::now(),
        }
    }

    /// Get the metric key, e.g. `"loss"` or `"accuracy"`.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Get the step index, if the metric was logged with one.
    #[must_use]
    pub const fn step(&self) -> Option<u64> {
        self.step
    }

    /// Get the metric value.
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }

    /// Get the timestamp at which the metric was recorded.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_record_new() {
        let metric = MetricRecord::new("loss", Some(3), 0.25);
        assert_eq!(metric.key(), "loss");
        assert_eq!(metric.step(), Some(3));
        assert!((metric.value() - 0.25).abs() < f64::EPSILON);
        assert!(metric.timestamp().timestamp() > 0);
    }

    #[test]
    fn test_metric_record_stepless() {
        let metric = MetricRecord::new("gpu_temp", None, 61.0);
        assert_eq!(metric.step(), None);
    }
}
