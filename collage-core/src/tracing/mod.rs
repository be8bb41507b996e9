//! Structured logging setup
//!
//! The library only emits `tracing` events; binaries call [`init_tracing`]
//! once to install a `tracing-subscriber` pipeline. [`span_names`] and
//! [`field_names`] keep span and field naming consistent across modules.

use std::path::PathBuf;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Set once the global subscriber is installed
static TRACING_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Configuration the subscriber was installed with
static TRACING_CONFIG: OnceLock<TracingConfig> = OnceLock::new();

/// Crates whose events the default filter lets through
const LOG_TARGETS: [&str; 2] = ["collage_core", "collage_cli"];

/// Errors that can occur during tracing initialization
#[derive(Debug, Error)]
pub enum TracingError {
    /// The subscriber could not be installed
    #[error("Failed to initialize tracing: {0}")]
    InitializationFailed(String),

    /// The custom filter did not parse
    #[error("Invalid log filter '{filter}': {reason}")]
    InvalidFilter {
        /// Filter as given
        filter: String,
        /// Parser message
        reason: String,
    },

    /// Tracing already initialized
    #[error("Tracing has already been initialized")]
    AlreadyInitialized,

    /// Failed to create log file
    #[error("Failed to create log file {path}: {source}")]
    FileCreationFailed {
        /// Log file path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

/// Result type for tracing operations
pub type TracingResult<T> = Result<T, TracingError>;

/// Log verbosity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TracingLevel {
    /// Errors only
    Error,
    /// Errors and warnings
    Warn,
    /// Informational messages (default)
    #[default]
    Info,
    /// Debug messages
    Debug,
    /// Everything
    Trace,
}

impl TracingLevel {
    /// Converts to the `tracing` level
    #[must_use]
    pub const fn to_tracing_level(self) -> Level {
        match self {
            Self::Error => Level::ERROR,
            Self::Warn => Level::WARN,
            Self::Info => Level::INFO,
            Self::Debug => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }

    /// Moves `verbose` steps louder and `quiet` steps quieter, saturating.
    #[must_use]
    pub const fn adjusted(self, verbose: u8, quiet: u8) -> Self {
        let rank = match self {
            Self::Error => 0i16,
            Self::Warn => 1,
            Self::Info => 2,
            Self::Debug => 3,
            Self::Trace => 4,
        };
        match rank + verbose as i16 - quiet as i16 {
            i16::MIN..=0 => Self::Error,
            1 => Self::Warn,
            2 => Self::Info,
            3 => Self::Debug,
            _ => Self::Trace,
        }
    }
}

impl std::str::FromStr for TracingLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            other => Err(format!("unknown log level '{other}'")),
        }
    }
}

impl std::fmt::Display for TracingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        };
        f.write_str(name)
    }
}

/// Where log lines go
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TracingOutput {
    /// Standard output
    Stdout,
    /// Standard error (default, keeps stdout clean for command output)
    #[default]
    Stderr,
    /// A log file, truncated on start
    File(PathBuf),
}

/// Configuration for [`init_tracing`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    /// Log level for the collage crates
    pub level: TracingLevel,
    /// Output destination
    pub output: TracingOutput,
    /// Include thread ids (useful when autosave runs in the background)
    pub thread_ids: bool,
    /// Custom `EnvFilter` directive, overrides `level`
    pub filter: Option<String>,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: TracingLevel::Info,
            output: TracingOutput::Stderr,
            thread_ids: cfg!(debug_assertions),
            filter: None,
        }
    }
}

impl TracingConfig {
    /// Creates a configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the log level
    #[must_use]
    pub fn with_level(mut self, level: TracingLevel) -> Self {
        self.level = level;
        self
    }

    /// Sets the output destination
    #[must_use]
    pub fn with_output(mut self, output: TracingOutput) -> Self {
        self.output = output;
        self
    }

    /// Enables or disables thread ids
    #[must_use]
    pub fn with_thread_ids(mut self, enabled: bool) -> Self {
        self.thread_ids = enabled;
        self
    }

    /// Sets a custom filter directive
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Builds the `EnvFilter` directive string.
    ///
    /// Without a custom filter every collage crate logs at `level` and
    /// everything else at `warn`.
    #[must_use]
    pub fn directive(&self) -> String {
        if let Some(filter) = &self.filter {
            return filter.clone();
        }
        let mut directive = String::from("warn");
        for target in LOG_TARGETS {
            directive.push_str(&format!(",{target}={}", self.level));
        }
        directive
    }
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Returns an error if:
/// - Tracing has already been initialized
/// - The custom filter does not parse
/// - The log file cannot be created
/// - Another subscriber is already installed
pub fn init_tracing(config: &TracingConfig) -> TracingResult<()> {
    if TRACING_INITIALIZED.swap(true, Ordering::SeqCst) {
        return Err(TracingError::AlreadyInitialized);
    }
    let result = install(config);
    if result.is_err() {
        TRACING_INITIALIZED.store(false, Ordering::SeqCst);
    }
    result
}

fn install(config: &TracingConfig) -> TracingResult<()> {
    let directive = config.directive();
    let filter = EnvFilter::try_new(&directive).map_err(|e| TracingError::InvalidFilter {
        filter: directive.clone(),
        reason: e.to_string(),
    })?;

    let (writer, ansi) = match &config.output {
        TracingOutput::Stdout => (BoxMakeWriter::new(std::io::stdout), true),
        TracingOutput::Stderr => (BoxMakeWriter::new(std::io::stderr), true),
        TracingOutput::File(path) => {
            let file = std::fs::File::create(path).map_err(|source| TracingError::FileCreationFailed {
                path: path.clone(),
                source,
            })?;
            (BoxMakeWriter::new(std::sync::Mutex::new(file)), false)
        }
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(config.thread_ids)
                .with_ansi(ansi)
                .with_writer(writer),
        )
        .try_init()
        .map_err(|e| TracingError::InitializationFailed(e.to_string()))?;

    let _ = TRACING_CONFIG.set(config.clone());
    tracing::debug!(filter = %directive, "Tracing initialized");
    Ok(())
}

/// Checks if tracing has been initialized
#[must_use]
pub fn is_tracing_initialized() -> bool {
    TRACING_INITIALIZED.load(Ordering::SeqCst)
}

/// The configuration tracing was initialized with
#[must_use]
pub fn get_tracing_config() -> Option<&'static TracingConfig> {
    TRACING_CONFIG.get()
}

/// Standard span names
pub mod span_names {
    /// Positional merge
    pub const LAYOUT_MERGE: &str = "layout.merge";
    /// Positional split
    pub const LAYOUT_SPLIT: &str = "layout.split";
    /// Layout document load
    pub const LAYOUT_LOAD: &str = "layout.load";
    /// Grid dimension change
    pub const GRID_UPDATE: &str = "grid.update";
    /// Undo or redo restore
    pub const SESSION_RESTORE: &str = "session.restore";
    /// Snapshot write
    pub const AUTOSAVE_WRITE: &str = "autosave.write";
    /// Snapshot restore
    pub const AUTOSAVE_RESTORE: &str = "autosave.restore";
    /// Configuration load
    pub const CONFIG_LOAD: &str = "config.load";
    /// Configuration save
    pub const CONFIG_SAVE: &str = "config.save";
}

/// Standard field names
pub mod field_names {
    /// Grid row
    pub const ROW: &str = "row";
    /// Grid column
    pub const COLUMN: &str = "column";
    /// Layout or grid cell id
    pub const CELL_ID: &str = "cell_id";
    /// Retry attempt
    pub const ATTEMPT: &str = "attempt";
    /// Snapshot name
    pub const SNAPSHOT: &str = "snapshot";
    /// Error message
    pub const ERROR: &str = "error";
}
