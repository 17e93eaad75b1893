//! Experiment metadata records
//!
//! ## Schema Overview
//!
//! ```text
//! Project (1) ──< TrialGroup (N)
//!     │               │
//!     └───────────────┴──< Trial (N)
//!                              ├──< MetricRecord (N) [time-series]
//!                              ├──< Aggregator (N)   [stepless values]
//!                              └──< chronos (N)      [named timers]
//! ```
//!
//! A trial belongs to exactly one project and at most one group. Trial uids
//! are content hashes over project, group, parameters, and revision, so two
//! trials with different parameters never collide.

mod group;
mod metric;
mod project;
mod trial;

pub use group::TrialGroup;
pub use metric::MetricRecord;
pub use project::Project;
pub use trial::{Trial, TrialStatus};

use std::hash::Hasher;

use rustc_hash::FxHasher;

/// Content hash over an ordered list of string parts, rendered as 16 hex
/// characters. Used for group and trial uids.
pub(crate) fn content_hash(parts: &[&str]) -> String {
    let mut hasher = FxHasher::default();
    for part in parts {
        hasher.write(part.as_bytes());
        // separator so ["ab", "c"] and ["a", "bc"] hash differently
        hasher.write_u8(0x1f);
    }
    format!("{:016x}", hasher.finish())
}
