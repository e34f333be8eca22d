//! Error types for the journal core.
//!
//! Collaborator and CLI code use `anyhow`; these enums cover the failures a
//! caller may want to match on.

use std::path::PathBuf;

use thiserror::Error;

/// Failures reading or writing the entries file.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access entries file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file exists but is not a JSON array of entries. Never repaired automatically.
    #[error("entries file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize entries: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Failures interpreting a stored entry.
#[derive(Debug, Error)]
pub enum EntryError {
    #[error("invalid entry timestamp: {timestamp}")]
    InvalidTimestamp { timestamp: String },
}

/// A collaborator returned something that would break the entry invariants.
#[derive(Debug, Error)]
pub enum AnnotateError {
    #[error("emotion classifier returned an empty label")]
    EmptyEmotion,

    #[error("summarizer returned an empty summary")]
    EmptySummary,
}
