//! Error types for autosave and snapshot persistence

/// Errors that can occur while saving or loading snapshots
#[derive(Debug, thiserror::Error)]
pub enum AutosaveError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(serde_json::Error),

    /// Deserialization error
    #[error("Deserialization error: {0}")]
    Deserialization(serde_json::Error),

    /// A write kept failing after all retries
    #[error("Autosave failed after {attempts} attempt(s): {source}")]
    RetriesExhausted {
        /// Number of attempts made
        attempts: u32,
        /// The last failure
        #[source]
        source: std::io::Error,
    },

    /// The requested snapshot does not exist
    #[error("Snapshot not found: {0}")]
    NotFound(String),

    /// A snapshot name contains path separators or is empty
    #[error("Invalid snapshot name: {0}")]
    InvalidName(String),
}

/// Result type for autosave operations
pub type AutosaveResult<T> = std::result::Result<T, AutosaveError>;
