use std::path::PathBuf;
use thiserror::Error;

/// Failure modes of the document store and the registries built on it.
///
/// Corrupt documents are deliberately not represented here: a document that
/// fails to parse on read is replaced by its default value and logged, never
/// surfaced to the caller.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Request payload failed validation; nothing was written.
    #[error("{0}")]
    Validation(String),

    /// The target entity does not exist. Non-fatal; handlers report it as
    /// `success: false` rather than an HTTP failure.
    #[error("{0}")]
    NotFound(String),

    /// The underlying filesystem write failed.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The exclusive write lock was not acquired within the bounded wait.
    #[error("timed out waiting for write lock on {path}")]
    LockTimeout { path: PathBuf },

    /// Serialization of an outgoing document failed.
    #[error("failed to encode document: {0}")]
    Encode(#[from] serde_json::Error),

    /// The store thread is gone; only seen during shutdown.
    #[error("store is shutting down")]
    Closed,
}

pub type Result<T> = std::result::Result<T, StoreError>;
