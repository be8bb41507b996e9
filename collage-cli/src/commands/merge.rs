//! Merge cells of a layout file.

use std::path::Path;

use crate::error::CliError;
use crate::util::edit_layout;

/// Merge command handler
pub fn cmd_merge(file: &Path, cells: &[(usize, usize)], quiet: bool) -> Result<(), CliError> {
    let id = edit_layout(file, |layout| layout.merge(cells))?;
    if !quiet {
        println!("Merged {} positions into cell {id}", cells.len());
    }
    Ok(())
}
