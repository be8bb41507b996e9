//! `collage-cli` - command-line interface for Collage Maker
//!
//! Creates and edits layout JSON files (merge, split, resize, aspect) and
//! inspects the autosave directory.

mod cli;
mod commands;
mod error;
mod util;

use clap::Parser;
use cli::Cli;
use collage_core::tracing::{TracingConfig, TracingLevel, init_tracing};

fn main() {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    let level = TracingLevel::Warn.adjusted(cli.verbose, u8::from(cli.quiet));
    if let Err(e) = init_tracing(&TracingConfig::new().with_level(level)) {
        eprintln!("Warning: logging unavailable: {e}");
    }

    let result = commands::dispatch(config_path, cli.quiet, cli.command);

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
}
