//! Aggregation strategies for stepless values
//!
//! Values logged without a step index accumulate into an [`Aggregator`]
//! instead of the trial's metric time series. Four retention strategies are
//! available:
//!
//! - [`Aggregator::Value`]: keeps only the latest observation
//! - [`Aggregator::Ring`]: keeps the last `capacity` observations
//! - [`Aggregator::Stats`]: running count/mean/sd/min/max, no history
//! - [`Aggregator::TimeSeries`]: keeps the entire history

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Retention strategy selector, used to build an [`Aggregator`] lazily the
/// first time a key is logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AggregatorKind {
    /// Latest value only.
    Value,
    /// Last `n` values in a ring buffer.
    Ring(usize),
    /// Running statistics without history.
    Stats,
    /// Full history.
    TimeSeries,
}

impl AggregatorKind {
    /// Instantiate the aggregator for this strategy.
    #[must_use]
    pub fn build(self) -> Aggregator {
        match self {
            Self::Value => Aggregator::Value { value: None },
            Self::Ring(capacity) => Aggregator::Ring {
                capacity,
                values: VecDeque::with_capacity(capacity),
            },
            Self::Stats => Aggregator::Stats {
                count: 0,
                sum: 0.0,
                sum_sq: 0.0,
                min: None,
                max: None,
            },
            Self::TimeSeries => Aggregator::TimeSeries { values: Vec::new() },
        }
    }
}

/// Accumulates a series of observations under one retention strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Aggregator {
    /// Does not aggregate, only keeps the latest value.
    Value {
        /// Latest observation, if any.
        value: Option<f64>,
    },
    /// Saves the `capacity` last observations, overwriting the oldest once
    /// capacity is reached.
    Ring {
        /// Maximum number of retained observations.
        capacity: usize,
        /// Retained observations, oldest first.
        values: VecDeque<f64>,
    },
    /// Computes count, mean, sd, min, max without keeping the history.
    /// Useful when memory matters and the values should not vary much.
    Stats {
        /// Number of observations.
        count: u64,
        /// Sum of observations.
        sum: f64,
        /// Sum of squared observations.
        sum_sq: f64,
        /// Smallest observation, once one was recorded.
        min: Option<f64>,
        /// Largest observation, once one was recorded.
        max: Option<f64>,
    },
    /// Keeps the entire history of the value.
    TimeSeries {
        /// All observations in logging order.
        values: Vec<f64>,
    },
}

impl Aggregator {
    /// Record one observation.
    pub fn append(&mut self, observation: f64) {
        match self {
            Self::Value { value } => *value = Some(observation),
            Self::Ring { capacity, values } => {
                if values.len() == *capacity {
                    values.pop_front();
                }
                values.push_back(observation);
            }
            Self::Stats {
                count,
                sum,
                sum_sq,
                min,
                max,
            } => {
                *count += 1;
                *sum += observation;
                *sum_sq += observation * observation;
                *min = Some(min.map_or(observation, |m| m.min(observation)));
                *max = Some(max.map_or(observation, |m| m.max(observation)));
            }
            Self::TimeSeries { values } => values.push(observation),
        }
    }

    /// The last observed value, or the running mean for [`Aggregator::Stats`].
    #[must_use]
    pub fn last(&self) -> Option<f64> {
        match self {
            Self::Value { value } => *value,
            Self::Ring { values, .. } => values.back().copied(),
            Self::Stats { .. } => self.mean(),
            Self::TimeSeries { values } => values.last().copied(),
        }
    }

    /// Number of recorded observations still retained.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Value { value } => usize::from(value.is_some()),
            Self::Ring { values, .. } => values.len(),
            Self::Stats { count, .. } => usize::try_from(*count).unwrap_or(usize::MAX),
            Self::TimeSeries { values } => values.len(),
        }
    }

    /// Check whether no observation was recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Running mean, only available for [`Aggregator::Stats`].
    #[must_use]
    pub fn mean(&self) -> Option<f64> {
        match self {
            #[allow(clippy::cast_precision_loss)]
            Self::Stats { count, sum, .. } if *count > 0 => Some(sum / *count as f64),
            _ => None,
        }
    }

    /// Sample standard deviation, only available for [`Aggregator::Stats`]
    /// with at least two observations.
    #[must_use]
    pub fn stddev(&self) -> Option<f64> {
        match self {
            #[allow(clippy::cast_precision_loss)]
            Self::Stats {
                count, sum, sum_sq, ..
            } if *count > 1 => {
                let n = *count as f64;
                let variance = (sum_sq - sum * sum / n) / (n - 1.0);
                Some(variance.max(0.0).sqrt())
            }
            _ => None,
        }
    }
}
