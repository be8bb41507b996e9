//! Split a cell of a layout file.

use std::path::Path;

use collage_core::layout::CellId;

use crate::error::CliError;
use crate::util::edit_layout;

/// Split command handler
pub fn cmd_split(file: &Path, id: u32, rows: usize, cols: usize, quiet: bool) -> Result<(), CliError> {
    let ids = edit_layout(file, |layout| layout.split(CellId(id), rows, cols))?;
    if !quiet {
        let list: Vec<String> = ids.iter().map(ToString::to_string).collect();
        println!("Split cell {id} into {} cells: {}", ids.len(), list.join(", "));
    }
    Ok(())
}
