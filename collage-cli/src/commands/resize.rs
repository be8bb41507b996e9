//! Resize a cell of a layout file.

use std::path::Path;

use collage_core::layout::CellId;

use crate::error::CliError;
use crate::util::edit_layout;

/// Resize command handler
pub fn cmd_resize(
    file: &Path,
    id: u32,
    row_span: usize,
    col_span: usize,
    quiet: bool,
) -> Result<(), CliError> {
    edit_layout(file, |layout| layout.resize(CellId(id), row_span, col_span))?;
    if !quiet {
        println!("Resized cell {id} to {row_span}x{col_span}");
    }
    Ok(())
}
