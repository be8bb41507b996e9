//! Change the aspect settings of a cell.

use std::path::Path;

use collage_core::layout::{Align, AspectSettings, CellId, FitMode, LayoutError, Ratio};

use crate::cli::AspectModeArg;
use crate::error::CliError;
use crate::util::edit_layout;

/// Parameters for the aspect command
pub struct AspectParams<'a> {
    pub id: u32,
    pub mode: AspectModeArg,
    pub ratio: Option<&'a str>,
    pub fit: FitMode,
    pub align: Align,
}

/// Aspect command handler
pub fn cmd_aspect(file: &Path, params: AspectParams<'_>, quiet: bool) -> Result<(), CliError> {
    let base = match (params.mode, params.ratio) {
        (AspectModeArg::Free, _) => AspectSettings::free(),
        (AspectModeArg::Fixed, Some(ratio)) => {
            let ratio: Ratio = ratio
                .parse()
                .map_err(|e: LayoutError| CliError::Layout(e.to_string()))?;
            AspectSettings::fixed(ratio)
        }
        (AspectModeArg::Fixed, None) => {
            return Err(CliError::Layout(LayoutError::MissingRatio.to_string()));
        }
    };
    let settings = base.with_fit_mode(params.fit).with_align(params.align);
    edit_layout(file, |layout| layout.set_aspect(CellId(params.id), settings))?;
    if !quiet {
        println!("Updated aspect settings of cell {}", params.id);
    }
    Ok(())
}
