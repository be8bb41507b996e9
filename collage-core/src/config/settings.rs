//! Application settings stored in `config.toml`

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::autosave::{DEFAULT_MAX_FILES, RetryConfig};
use crate::controls::{DEFAULT_COLUMNS, DEFAULT_ROWS};
use crate::error::{ConfigError, ConfigResult};
use crate::grid::DEFAULT_SPACING;
use crate::history::DEFAULT_HISTORY_LIMIT;
use crate::recovery::RecoverySettings;
use crate::tracing::{TracingConfig, TracingLevel};

/// Directory name used under the platform config and data directories
pub const APP_DIR_NAME: &str = "collage-maker";

/// Largest grid dimension accepted from settings
pub const MAX_GRID_DIMENSION: usize = 20;

const fn default_cell_size() -> u32 {
    260
}

const fn default_interval_secs() -> u64 {
    300
}

const fn default_true() -> bool {
    true
}

/// Top-level settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// New grid defaults (`[grid]`)
    pub grid: GridSettings,
    /// Undo history (`[history]`)
    pub history: HistorySettings,
    /// Autosave (`[autosave]`)
    pub autosave: AutosaveSettings,
    /// Error recovery (`[recovery]`)
    pub recovery: RecoverySettings,
    /// Logging (`[logging]`)
    pub logging: LoggingSettings,
}

impl AppSettings {
    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` naming the first bad value.
    pub fn validate(&self) -> ConfigResult<()> {
        let invalid = |msg: String| Err(ConfigError::Validation(msg));
        let grid = &self.grid;
        if !(1..=MAX_GRID_DIMENSION).contains(&grid.rows) || !(1..=MAX_GRID_DIMENSION).contains(&grid.columns) {
            return invalid(format!(
                "grid size {}x{} must be between 1 and {MAX_GRID_DIMENSION}",
                grid.rows, grid.columns
            ));
        }
        if grid.cell_size == 0 {
            return invalid("grid.cell_size must be positive".to_string());
        }
        if self.history.limit == 0 {
            return invalid("history.limit must be positive".to_string());
        }
        if self.autosave.interval_secs == 0 {
            return invalid("autosave.interval_secs must be positive".to_string());
        }
        if self.autosave.max_files == 0 {
            return invalid("autosave.max_files must be positive".to_string());
        }
        if self.recovery.error_threshold == 0 {
            return invalid("recovery.error_threshold must be positive".to_string());
        }
        Ok(())
    }
}

/// Defaults for new grids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    /// Rows of a new grid
    pub rows: usize,
    /// Columns of a new grid
    pub columns: usize,
    /// Spacing between cells in pixels
    pub spacing: u32,
    /// Nominal cell edge in pixels
    #[serde(default = "default_cell_size")]
    pub cell_size: u32,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            columns: DEFAULT_COLUMNS,
            spacing: DEFAULT_SPACING,
            cell_size: default_cell_size(),
        }
    }
}

/// Undo history settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    /// Maximum undo steps
    pub limit: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

/// Autosave settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutosaveSettings {
    /// Whether periodic autosave runs
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Seconds between autosaves
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Autosaves kept
    #[serde(default = "default_max_files")]
    pub max_files: usize,
    /// Snapshot directory; `~` is expanded. Defaults to the data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
    /// Write retry policy
    #[serde(default)]
    pub retry: RetryConfig,
}

const fn default_max_files() -> usize {
    DEFAULT_MAX_FILES
}

impl Default for AutosaveSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: default_interval_secs(),
            max_files: DEFAULT_MAX_FILES,
            directory: None,
            retry: RetryConfig::default(),
        }
    }
}

impl AutosaveSettings {
    /// Time between autosaves
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Snapshot directory with `~` expanded.
    ///
    /// Falls back to `<data dir>/collage-maker/autosave`; `None` only when
    /// no directory is configured and the platform has no data directory.
    #[must_use]
    pub fn resolved_directory(&self) -> Option<PathBuf> {
        match &self.directory {
            Some(dir) => Some(PathBuf::from(shellexpand::tilde(dir).into_owned())),
            None => dirs::data_dir().map(|data| data.join(APP_DIR_NAME).join("autosave")),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Level for the collage crates
    pub level: TracingLevel,
    /// Custom `EnvFilter` directive
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

impl LoggingSettings {
    /// Tracing configuration for these settings
    #[must_use]
    pub fn tracing_config(&self) -> TracingConfig {
        let config = TracingConfig::new().with_level(self.level);
        match &self.filter {
            Some(filter) => config.with_filter(filter.clone()),
            None => config,
        }
    }
}
