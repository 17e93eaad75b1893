//! Error types for trackdb

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Trackdb error types
#[derive(Error, Debug)]
pub enum Error {
    /// Backend URI could not be parsed
    #[error("invalid backend URI: {0}")]
    InvalidUri(String),

    /// URI scheme has no registered backend
    #[error("unsupported backend scheme: {0}\nKnown schemes: file, memory")]
    UnsupportedScheme(String),

    /// Client operation invoked out of order
    #[error("invalid client state: {0}")]
    InvalidState(&'static str),

    /// Group or trial declared without its parent record
    #[error("missing parent record: {0}")]
    MissingParent(String),

    /// Backend storage failure
    #[error("storage error: {0}")]
    Storage(String),

    /// JSON (de)serialization failure
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
