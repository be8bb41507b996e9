//! Configuration management
//!
//! [`AppSettings`] is stored as TOML in `config.toml`; [`ConfigManager`]
//! finds, loads and saves it.

mod manager;
mod settings;

pub use manager::{ConfigManager, SETTINGS_FILE};
pub use settings::{
    APP_DIR_NAME, AppSettings, AutosaveSettings, GridSettings, HistorySettings, LoggingSettings,
    MAX_GRID_DIMENSION,
};
