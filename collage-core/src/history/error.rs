//! Error types for session history

/// Error returned by a [`StateAdapter`](super::StateAdapter) that cannot apply a state.
pub type AdapterError = Box<dyn std::error::Error + Send + Sync>;

/// Errors returned by [`SessionController`](super::SessionController).
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The history limit must be positive.
    #[error("history limit must be greater than zero, got {0}")]
    InvalidHistoryLimit(usize),

    /// Undo was requested with an empty undo stack.
    #[error("no undo history is available")]
    UndoUnavailable,

    /// Redo was requested with an empty redo stack.
    #[error("no redo history is available")]
    RedoUnavailable,

    /// The adapter rejected a state.
    #[error("failed to apply session state: {0}")]
    ApplyFailed(#[source] AdapterError),
}

/// Result type for session operations
pub type SessionResult<T> = std::result::Result<T, SessionError>;
