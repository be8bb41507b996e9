//! Create a new layout file.

use std::path::Path;

use collage_core::layout::GridLayoutManager;

use crate::error::CliError;
use crate::util::write_layout;

/// Parameters for the new command
pub struct NewParams<'a> {
    pub rows: usize,
    pub columns: usize,
    pub gutter: u32,
    pub padding: u32,
    pub output: &'a Path,
    pub force: bool,
}

/// New layout command handler
pub fn cmd_new(params: NewParams<'_>, quiet: bool) -> Result<(), CliError> {
    if params.output.exists() && !params.force {
        return Err(CliError::FileExists(params.output.to_path_buf()));
    }
    let layout = GridLayoutManager::with_spacing(
        params.rows,
        params.columns,
        params.gutter,
        params.padding,
    )
    .map_err(|e| CliError::Layout(e.to_string()))?;
    write_layout(params.output, &layout)?;

    if !quiet {
        println!(
            "Created {}x{} layout with {} cells: {}",
            params.rows,
            params.columns,
            layout.cells().len(),
            params.output.display()
        );
    }
    Ok(())
}
