//! Command handler modules for the CLI.

mod aspect;
mod autosave;
mod completions;
mod merge;
mod new;
mod resize;
mod show;
mod split;
mod templates;

use std::path::Path;

use crate::cli::Commands;
use crate::error::CliError;

/// Dispatch a CLI command to the appropriate handler.
pub fn dispatch(config_path: Option<&Path>, quiet: bool, command: Commands) -> Result<(), CliError> {
    match command {
        Commands::New {
            rows,
            columns,
            gutter,
            padding,
            output,
            force,
        } => new::cmd_new(
            new::NewParams {
                rows,
                columns,
                gutter,
                padding,
                output: &output,
                force,
            },
            quiet,
        ),
        Commands::Show { file, format } => show::cmd_show(&file, format),
        Commands::Merge { file, cells } => merge::cmd_merge(&file, &cells, quiet),
        Commands::Split {
            file,
            id,
            rows,
            cols,
        } => split::cmd_split(&file, id, rows, cols, quiet),
        Commands::Resize {
            file,
            id,
            row_span,
            col_span,
        } => resize::cmd_resize(&file, id, row_span, col_span, quiet),
        Commands::Aspect {
            file,
            id,
            mode,
            ratio,
            fit,
            align,
        } => aspect::cmd_aspect(
            &file,
            aspect::AspectParams {
                id,
                mode,
                ratio: ratio.as_deref(),
                fit,
                align,
            },
            quiet,
        ),
        Commands::Autosave(subcmd) => autosave::cmd_autosave(config_path, subcmd),
        Commands::Templates => {
            templates::cmd_templates();
            Ok(())
        }
        Commands::Completions { shell } => completions::cmd_completions(shell),
    }
}
