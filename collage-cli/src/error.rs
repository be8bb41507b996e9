//! CLI error types and exit codes.

use std::path::PathBuf;

use collage_core::error::CollageError;

/// Exit codes for CLI operations
pub mod exit_codes {
    /// Validation, configuration or I/O failure
    pub const GENERAL_ERROR: i32 = 1;
}

/// CLI error type
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Layout file could not be parsed or edited
    #[error("Layout error: {0}")]
    Layout(String),

    /// Autosave directory error
    #[error("Autosave error: {0}")]
    Autosave(String),

    /// Refused to overwrite an existing file
    #[error("File already exists: {} (use --force to overwrite)", .0.display())]
    FileExists(PathBuf),

    /// IO error
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl From<CollageError> for CliError {
    fn from(err: CollageError) -> Self {
        match err {
            CollageError::Layout(e) => Self::Layout(e.to_string()),
            CollageError::Autosave(e) => Self::Autosave(e.to_string()),
            CollageError::Config(e) => Self::Config(e.to_string()),
            other => Self::Config(other.to_string()),
        }
    }
}

impl CliError {
    /// Returns the exit code for this error.
    ///
    /// Every failure currently maps to 1.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_)
            | Self::Layout(_)
            | Self::Autosave(_)
            | Self::FileExists(_)
            | Self::Io { .. } => exit_codes::GENERAL_ERROR,
        }
    }
}
