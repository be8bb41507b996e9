//! Crate-wide error types
//!
//! Each module owns its error enum; [`CollageError`] wraps them for callers
//! that drive several modules at once, such as the command-line tool.

use std::path::PathBuf;

use thiserror::Error;

use crate::autosave::AutosaveError;
use crate::grid::GridError;
use crate::history::SessionError;
use crate::layout::LayoutError;
use crate::template::TemplateParseError;
use crate::tracing::TracingError;

/// Errors from loading or saving settings
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform has no config directory
    #[error("Could not determine the configuration directory")]
    NoConfigDir,

    /// The platform has no data directory and none was configured
    #[error("Could not determine the autosave directory")]
    NoDataDir,

    /// Reading or writing a settings file failed
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File or directory involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid TOML
    #[error("Failed to parse {path}: {message}")]
    Parse {
        /// Settings file
        path: PathBuf,
        /// Parser message
        message: String,
    },

    /// The settings could not be serialized
    #[error("Failed to serialize settings: {0}")]
    Serialize(String),

    /// A setting is out of range
    #[error("Invalid setting: {0}")]
    Validation(String),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Any error produced by this crate
#[derive(Debug, Error)]
pub enum CollageError {
    /// Positional layout error
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// Live grid error
    #[error(transparent)]
    Grid(#[from] GridError),

    /// Undo/redo error
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Snapshot persistence error
    #[error(transparent)]
    Autosave(#[from] AutosaveError),

    /// Settings error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Logging setup error
    #[error(transparent)]
    Tracing(#[from] TracingError),

    /// Bad template name
    #[error(transparent)]
    Template(#[from] TemplateParseError),
}

/// Result type using [`CollageError`]
pub type CollageResult<T> = Result<T, CollageError>;
