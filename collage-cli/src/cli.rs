//! CLI argument parsing types using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use collage_core::layout::{Align, FitMode};

use crate::util::parse_position;

/// Collage Maker command-line interface for layout files and autosaves
#[derive(Parser)]
#[command(name = "collage-cli")]
#[command(author, version, about = "Collage Maker command-line interface")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the configuration directory
    #[arg(short, long, global = true, env = "COLLAGE_CONFIG_DIR")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Create a layout file with unmerged cells
    #[command(about = "Create a new layout file")]
    New {
        /// Number of rows
        #[arg(short, long)]
        rows: usize,

        /// Number of columns
        #[arg(short = 'C', long)]
        columns: usize,

        /// Gutter between cells in pixels
        #[arg(long, default_value = "0")]
        gutter: u32,

        /// Outer padding in pixels
        #[arg(long, default_value = "0")]
        padding: u32,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show a layout file
    #[command(about = "Show the cells of a layout file")]
    Show {
        /// Layout file
        file: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text", value_enum)]
        format: OutputFormat,
    },

    /// Merge a rectangle of positions into one cell
    #[command(about = "Merge cells covering a filled rectangle")]
    Merge {
        /// Layout file, rewritten in place
        file: PathBuf,

        /// Positions to merge as ROW,COL
        #[arg(long = "cells", value_name = "ROW,COL", num_args = 2.., required = true, value_parser = parse_position)]
        cells: Vec<(usize, usize)>,
    },

    /// Split a cell into a sub-grid
    #[command(about = "Split a cell into rows x columns parts")]
    Split {
        /// Layout file, rewritten in place
        file: PathBuf,

        /// Cell id
        #[arg(long)]
        id: u32,

        /// Parts along the rows
        #[arg(long, default_value = "1")]
        rows: usize,

        /// Parts along the columns
        #[arg(long, default_value = "1")]
        cols: usize,
    },

    /// Change the span of a cell
    #[command(about = "Resize a cell, releasing or claiming free positions")]
    Resize {
        /// Layout file, rewritten in place
        file: PathBuf,

        /// Cell id
        #[arg(long)]
        id: u32,

        /// New row span
        #[arg(long)]
        row_span: usize,

        /// New column span
        #[arg(long)]
        col_span: usize,
    },

    /// Change the aspect settings of a cell
    #[command(about = "Set the aspect mode, ratio, fit and alignment of a cell")]
    Aspect {
        /// Layout file, rewritten in place
        file: PathBuf,

        /// Cell id
        #[arg(long)]
        id: u32,

        /// Aspect mode
        #[arg(long, value_enum)]
        mode: AspectModeArg,

        /// Ratio as W:H, required for fixed mode
        #[arg(long)]
        ratio: Option<String>,

        /// Scaling mode (fit, fill)
        #[arg(long, default_value = "fit", value_parser = parse_fit)]
        fit: FitMode,

        /// Alignment keyword (center, top, top-left, ...)
        #[arg(long, default_value = "center", value_parser = parse_align)]
        align: Align,
    },

    /// Inspect the autosave directory
    #[command(subcommand)]
    Autosave(AutosaveCommands),

    /// List built-in grid templates
    #[command(about = "List built-in grid templates")]
    Templates,

    /// Generate shell completions
    #[command(about = "Generate shell completion scripts")]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Autosave subcommands
#[derive(Subcommand)]
pub enum AutosaveCommands {
    /// List autosave and recovery snapshots
    List,

    /// Print the newest autosave
    Latest,

    /// Delete autosaves beyond the configured limit
    Prune,
}

/// Output format for `show`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Text,
    /// Layout JSON
    Json,
}

/// Aspect mode argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AspectModeArg {
    /// No constraint
    Free,
    /// Fixed width:height ratio
    Fixed,
}

fn parse_fit(s: &str) -> Result<FitMode, String> {
    s.parse::<FitMode>().map_err(|e| e.to_string())
}

fn parse_align(s: &str) -> Result<Align, String> {
    s.parse::<Align>().map_err(|e| e.to_string())
}
