//! # trackdb: experiment metadata tracking with pluggable storage backends
//!
//! trackdb records structured experiment metadata — projects, trial groups,
//! trials, argument sets, and step-indexed metric records — into a storage
//! backend selected by a URI-like connection string.
//!
//! ## Example
//!
//! ```rust
//! use trackdb::{TrackClient, TrialStatus};
//!
//! # fn main() -> trackdb::Result<()> {
//! let mut client = TrackClient::new("memory://readme-example")?;
//!
//! client.set_project("convnet", "vision baseline")?;
//! client.set_group("baseline", "control runs")?;
//! client.new_trial()?;
//!
//! client.log_arguments([("lr", 0.01), ("batch_size", 32.0)], false)?;
//! for epoch in 0..3 {
//!     client.log_metrics(Some(epoch), [("loss", 1.0 / (epoch as f64 + 1.0))])?;
//! }
//!
//! client.finish(TrialStatus::Success)?;
//! println!("{}", client.report()?);
//! client.save()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Backends
//!
//! - `file:runs.json` — JSON file, written atomically on `save()`
//! - `memory://name` — process-shared in-memory store
//!
//! See [`persistence`] for the backend contract.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod aggregator;
pub mod client;
pub mod error;
pub mod persistence;
pub mod query;
pub mod store;
pub mod structure;
pub mod uri;

pub use aggregator::{Aggregator, AggregatorKind};
pub use client::{TrackClient, TrialReport};
pub use error::{Error, Result};
pub use persistence::{build_backend, Backend, FileBackend, MemoryBackend};
pub use query::Query;
pub use store::TrackStore;
pub use structure::{MetricRecord, Project, Trial, TrialGroup, TrialStatus};
pub use uri::ParsedUri;
