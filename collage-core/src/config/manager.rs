//! Loading and saving `config.toml`

use std::path::{Path, PathBuf};

use super::settings::{APP_DIR_NAME, AppSettings};
use crate::autosave::{AutosaveManager, DirectoryStore};
use crate::error::{ConfigError, ConfigResult};
use crate::tracing::span_names;

/// Settings file name inside the config directory
pub const SETTINGS_FILE: &str = "config.toml";

/// Locates, reads and writes the settings file.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: PathBuf,
}

impl ConfigManager {
    /// Uses `<platform config dir>/collage-maker`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoConfigDir` if the platform has no config directory.
    pub fn new() -> ConfigResult<Self> {
        let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(Self::with_config_dir(base.join(APP_DIR_NAME)))
    }

    /// Uses `config_dir` directly.
    #[must_use]
    pub const fn with_config_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    /// The config directory.
    #[must_use]
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Path of `config.toml`.
    #[must_use]
    pub fn settings_path(&self) -> PathBuf {
        self.config_dir.join(SETTINGS_FILE)
    }

    /// Loads and validates the settings; a missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the file cannot be read,
    /// `ConfigError::Parse` if it is not valid TOML for [`AppSettings`] and
    /// `ConfigError::Validation` if a value is out of range.
    pub fn load_settings(&self) -> ConfigResult<AppSettings> {
        let _span = tracing::debug_span!(span_names::CONFIG_LOAD).entered();
        let path = self.settings_path();
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No settings file, using defaults");
                return Ok(AppSettings::default());
            }
            Err(source) => return Err(ConfigError::Io { path, source }),
        };
        let settings: AppSettings = toml::from_str(&text).map_err(|e| ConfigError::Parse {
            path: path.clone(),
            message: e.to_string(),
        })?;
        settings.validate()?;
        tracing::debug!(path = %path.display(), "Loaded settings");
        Ok(settings)
    }

    /// Validates and writes the settings, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation`, `ConfigError::Serialize` or
    /// `ConfigError::Io`.
    pub fn save_settings(&self, settings: &AppSettings) -> ConfigResult<()> {
        let _span = tracing::debug_span!(span_names::CONFIG_SAVE).entered();
        settings.validate()?;
        let text = toml::to_string_pretty(settings).map_err(|e| ConfigError::Serialize(e.to_string()))?;
        std::fs::create_dir_all(&self.config_dir).map_err(|source| ConfigError::Io {
            path: self.config_dir.clone(),
            source,
        })?;
        let path = self.settings_path();
        let tmp = self.config_dir.join(format!(".{SETTINGS_FILE}.tmp"));
        std::fs::write(&tmp, text)
            .and_then(|()| std::fs::rename(&tmp, &path))
            .map_err(|source| ConfigError::Io { path: path.clone(), source })?;
        tracing::info!(path = %path.display(), "Saved settings");
        Ok(())
    }

    /// Builds the autosave manager described by `settings`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoDataDir` if no autosave directory is
    /// configured and the platform has no data directory.
    pub fn autosave_manager(settings: &AppSettings) -> ConfigResult<AutosaveManager<DirectoryStore>> {
        let dir = settings
            .autosave
            .resolved_directory()
            .ok_or(ConfigError::NoDataDir)?;
        Ok(AutosaveManager::new(DirectoryStore::new(dir))
            .with_max_files(settings.autosave.max_files)
            .with_retry(settings.autosave.retry.clone()))
    }
}
