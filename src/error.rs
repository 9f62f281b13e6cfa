//! Error types
//!
//! Parsing, loading and sync failures are typed so callers can decide which
//! ones to discard. Only the command layer converts them into `anyhow` errors.

use std::path::PathBuf;
use thiserror::Error;

/// A token document that is not well-formed
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("token document must be a JSON object")]
    NotAnObject,

    #[error("token {name:?} has no usable value")]
    InvalidEntry { name: String },
}

/// Failure to obtain a corpus from disk
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Failure of one sync attempt
#[derive(Debug, Error)]
pub enum SyncError {
    /// Network trouble, timeouts, unexpected remote payloads
    #[error("transient sync failure: {0}")]
    Transient(String),

    #[error("remote request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("remote document rejected: {0}")]
    Parse(#[from] ParseError),

    #[error("local file access failed: {0}")]
    Io(#[from] std::io::Error),
}

impl SyncError {
    pub fn transient(message: impl Into<String>) -> Self {
        SyncError::Transient(message.into())
    }

    /// Whether a later attempt may succeed without local intervention
    pub fn is_transient(&self) -> bool {
        matches!(self, SyncError::Transient(_) | SyncError::Http(_))
    }
}
