//! Error types for document operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for document operations.
pub type DocResult<T> = Result<T, DocError>;

/// Errors returned by the store, the document file and the exporter.
#[derive(Debug, Error)]
pub enum DocError {
    /// Caller input violates a precondition.
    #[error("Validation error: {0}")]
    Validation(String),

    /// No document with this id.
    #[error("Document not found: {0}")]
    NotFound(u64),

    /// Reading or writing durable storage failed.
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),
}

impl DocError {
    /// Shorthand for a validation failure.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Whether re-prompting the user can fix this error.
    pub fn is_user_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::NotFound(_))
    }
}

/// Storage failures.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The file exists but could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file could not be written.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a valid document list.
    #[error("malformed document file {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The file lists the same id twice.
    #[error("document file {path} contains id {id} more than once")]
    DuplicateId { path: PathBuf, id: u64 },

    /// A record breaks a document rule.
    #[error("document file {path} has an invalid record (id {id}): {reason}")]
    Invalid { path: PathBuf, id: u64, reason: &'static str },

    /// Documents could not be serialized.
    #[error("failed to encode documents: {0}")]
    Encode(#[source] serde_json::Error),
}
