//! Shared utility functions used across command modules.

use std::path::Path;

use collage_core::config::{AppSettings, ConfigManager};
use collage_core::layout::GridLayoutManager;

use crate::error::CliError;

/// Creates a `ConfigManager` using the optional custom config directory
/// from CLI args.
pub fn create_config_manager(config_path: Option<&Path>) -> Result<ConfigManager, CliError> {
    match config_path {
        Some(path) => Ok(ConfigManager::with_config_dir(path.to_path_buf())),
        None => ConfigManager::new()
            .map_err(|e| CliError::Config(format!("Failed to initialize config: {e}"))),
    }
}

/// Loads settings, falling back to defaults when the config directory is
/// unavailable.
pub fn load_settings(config_path: Option<&Path>) -> Result<AppSettings, CliError> {
    let manager = create_config_manager(config_path)?;
    manager
        .load_settings()
        .map_err(|e| CliError::Config(format!("Failed to load settings: {e}")))
}

/// Parse a `ROW,COL` position
pub fn parse_position(s: &str) -> Result<(usize, usize), String> {
    let (row, col) = s
        .split_once(',')
        .ok_or_else(|| format!("invalid position `{s}`: expected ROW,COL"))?;
    let row = row
        .trim()
        .parse()
        .map_err(|_| format!("invalid row in `{s}`"))?;
    let col = col
        .trim()
        .parse()
        .map_err(|_| format!("invalid column in `{s}`"))?;
    Ok((row, col))
}

/// Reads and parses a layout file
pub fn read_layout(path: &Path) -> Result<GridLayoutManager, CliError> {
    let json = std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    GridLayoutManager::from_json(&json)
        .map_err(|e| CliError::Layout(format!("{}: {e}", path.display())))
}

/// Serializes a layout and writes it to `path`
pub fn write_layout(path: &Path, layout: &GridLayoutManager) -> Result<(), CliError> {
    let json = layout
        .to_json()
        .map_err(|e| CliError::Layout(e.to_string()))?;
    std::fs::write(path, json).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads a layout, applies one edit and writes it back in place.
///
/// The file is left untouched if the edit fails.
pub fn edit_layout<T>(
    path: &Path,
    edit: impl FnOnce(&mut GridLayoutManager) -> collage_core::layout::LayoutResult<T>,
) -> Result<T, CliError> {
    let mut layout = read_layout(path)?;
    let value = edit(&mut layout).map_err(|e| CliError::Layout(e.to_string()))?;
    write_layout(path, &layout)?;
    Ok(value)
}
