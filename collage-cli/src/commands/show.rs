//! Show a layout file.

use std::path::Path;

use collage_core::layout::{AspectMode, GridLayoutManager};

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::util::read_layout;

/// Show layout command handler
pub fn cmd_show(file: &Path, format: OutputFormat) -> Result<(), CliError> {
    let layout = read_layout(file)?;
    match format {
        OutputFormat::Text => print_text(&layout),
        OutputFormat::Json => {
            let json = layout
                .to_json()
                .map_err(|e| CliError::Layout(e.to_string()))?;
            println!("{json}");
        }
    }
    Ok(())
}

fn print_text(layout: &GridLayoutManager) {
    println!(
        "Grid: {}x{} (gutter {}, padding {})",
        layout.rows(),
        layout.columns(),
        layout.gutter(),
        layout.padding()
    );
    println!(
        "{:<5} {:<9} {:<6} {:<7} {:<5} {:<13}",
        "ID", "POSITION", "SPAN", "ASPECT", "FIT", "ALIGN"
    );
    for cell in layout.sorted_cells() {
        let aspect = match (cell.aspect_mode, cell.ratio) {
            (AspectMode::Fixed, Some(ratio)) => ratio.to_string(),
            (mode, _) => mode.to_string(),
        };
        println!(
            "{:<5} {:<9} {:<6} {:<7} {:<5} {:<13}",
            cell.id.to_string(),
            format!("{},{}", cell.row, cell.column),
            format!("{}x{}", cell.row_span, cell.col_span),
            aspect,
            cell.fit_mode.to_string(),
            cell.align.to_string()
        );
    }
}
