//! Autosave directory commands.

use std::path::Path;

use collage_core::autosave::{AutosaveManager, DirectoryStore};
use collage_core::config::ConfigManager;

use crate::cli::AutosaveCommands;
use crate::error::CliError;
use crate::util::load_settings;

/// Autosave command handler
pub fn cmd_autosave(config_path: Option<&Path>, subcmd: AutosaveCommands) -> Result<(), CliError> {
    let settings = load_settings(config_path)?;
    let manager = ConfigManager::autosave_manager(&settings)
        .map_err(|e| CliError::Config(e.to_string()))?;

    match subcmd {
        AutosaveCommands::List => list(&manager),
        AutosaveCommands::Latest => latest(&manager),
        AutosaveCommands::Prune => {
            let removed = manager.prune();
            println!("Removed {} autosave(s)", removed.len());
            for name in removed {
                println!("  {name}");
            }
            Ok(())
        }
    }
}

fn list(manager: &AutosaveManager<DirectoryStore>) -> Result<(), CliError> {
    let autosaves = manager
        .autosaves()
        .map_err(|e| CliError::Autosave(e.to_string()))?;
    let recoveries = manager
        .recoveries()
        .map_err(|e| CliError::Autosave(e.to_string()))?;

    println!("Directory: {}", manager.store().dir().display());
    if autosaves.is_empty() && recoveries.is_empty() {
        println!("No snapshots found.");
        return Ok(());
    }
    for name in &autosaves {
        println!("autosave  {name}");
    }
    for name in &recoveries {
        println!("recovery  {name}");
    }
    Ok(())
}

fn latest(manager: &AutosaveManager<DirectoryStore>) -> Result<(), CliError> {
    let snapshot: Option<serde_json::Value> = manager
        .load_latest()
        .map_err(|e| CliError::Autosave(e.to_string()))?;
    match snapshot {
        Some(snapshot) => {
            let json = serde_json::to_string_pretty(&snapshot)
                .map_err(|e| CliError::Autosave(e.to_string()))?;
            println!("{json}");
            Ok(())
        }
        None => Err(CliError::Autosave("no autosave found".to_string())),
    }
}
