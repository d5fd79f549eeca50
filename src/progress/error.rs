//! Error types for progress persistence

use thiserror::Error;

/// Errors that can occur reading or writing persisted learner state
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing file or directory could not be accessed
    #[error("storage I/O failed for key {key:?}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// Stored data could not be serialized or parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StorageError {
    pub(crate) fn io(key: &str, source: std::io::Error) -> Self {
        StorageError::Io { key: key.to_string(), source }
    }
}
