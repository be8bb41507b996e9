//! Serializable snapshots of the collage grid
//!
//! These records are the on-disk autosave format. Missing keys fall back to
//! defaults so older or hand-edited files still load; only structurally
//! broken JSON is rejected.

use serde::{Deserialize, Serialize};

use super::error::{AutosaveError, AutosaveResult};
use crate::codec::ImageCodec;
use crate::controls::{CaptionDefaults, ControlsState};
use crate::grid::{
    AspectRatioMode, CollageCell, CollageGrid, GridResult, Rgba, TransformationMode,
};
use crate::history::StateTree;
use crate::tracing::span_names;

const fn one() -> usize {
    1
}

const fn yes() -> bool {
    true
}

/// A merged block: anchor plus spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MergedCellState {
    /// Anchor row
    #[serde(default)]
    pub row: usize,
    /// Anchor column
    #[serde(default)]
    pub column: usize,
    /// Rows covered
    #[serde(default = "one")]
    pub row_span: usize,
    /// Columns covered
    #[serde(default = "one")]
    pub col_span: usize,
}

/// Snapshot of one grid cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellAutosaveState {
    /// Anchor row
    #[serde(default)]
    pub row: usize,
    /// Anchor column
    #[serde(default)]
    pub column: usize,
    /// Rows covered
    #[serde(default = "one")]
    pub row_span: usize,
    /// Columns covered
    #[serde(default = "one")]
    pub col_span: usize,
    /// Whether the cell showed an image
    #[serde(default)]
    pub has_image: bool,
    /// Encoded image payload
    #[serde(default)]
    pub image: Option<String>,
    /// Free caption
    #[serde(default)]
    pub caption: String,
    /// Top caption
    #[serde(default)]
    pub top_caption: String,
    /// Bottom caption
    #[serde(default)]
    pub bottom_caption: String,
    /// Top caption visibility
    #[serde(default = "yes")]
    pub show_top_caption: bool,
    /// Bottom caption visibility
    #[serde(default = "yes")]
    pub show_bottom_caption: bool,
    /// Caption font family
    #[serde(default)]
    pub caption_font_family: String,
    /// Smallest caption size
    #[serde(default)]
    pub caption_min_size: u32,
    /// Largest caption size
    #[serde(default)]
    pub caption_max_size: u32,
    /// Upper-case captions
    #[serde(default)]
    pub caption_uppercase: bool,
    /// Caption outline width
    #[serde(default)]
    pub caption_stroke_width: u32,
    /// Caption outline color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption_stroke_color: Option<Rgba>,
    /// Caption fill color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption_fill_color: Option<Rgba>,
    /// Caption safe margin relative to the cell size
    #[serde(default)]
    pub caption_safe_margin_ratio: f64,
    /// Nominal caption size
    #[serde(default)]
    pub caption_font_size: u32,
    /// Bold captions
    #[serde(default)]
    pub caption_bold: bool,
    /// Italic captions
    #[serde(default)]
    pub caption_italic: bool,
    /// Underlined captions
    #[serde(default)]
    pub caption_underline: bool,
    /// Interpolation code
    #[serde(default)]
    pub transformation_mode: Option<i64>,
    /// Aspect handling code
    #[serde(default)]
    pub aspect_ratio_mode: Option<i64>,
    /// Selection flag
    #[serde(default)]
    pub selected: bool,
}

impl CellAutosaveState {
    /// Captures a cell anchored at `(row, column)`.
    ///
    /// A cached payload on the cell is used as is; the codec only runs when
    /// there is none.
    pub fn from_cell<C: ImageCodec>(
        cell: &CollageCell<C::Image>,
        row: usize,
        column: usize,
        codec: &C,
    ) -> Self {
        let image = match cell.autosave_payload() {
            Some(cached) => Some(cached.to_string()),
            None => cell
                .image()
                .filter(|_| cell.has_image())
                .and_then(|image| codec.encode(image)),
        };
        let style = &cell.style;
        Self {
            row,
            column,
            row_span: cell.row_span(),
            col_span: cell.col_span(),
            has_image: cell.has_image(),
            image,
            caption: cell.caption.caption.clone(),
            top_caption: cell.caption.top_caption.clone(),
            bottom_caption: cell.caption.bottom_caption.clone(),
            show_top_caption: cell.caption.show_top_caption,
            show_bottom_caption: cell.caption.show_bottom_caption,
            caption_font_family: style.font_family.clone(),
            caption_min_size: style.min_size,
            caption_max_size: style.max_size,
            caption_uppercase: style.uppercase,
            caption_stroke_width: style.stroke_width,
            caption_stroke_color: style.stroke_color,
            caption_fill_color: style.fill_color,
            caption_safe_margin_ratio: style.safe_margin_ratio,
            caption_font_size: style.font_size,
            caption_bold: style.bold,
            caption_italic: style.italic,
            caption_underline: style.underline,
            transformation_mode: cell.transformation_mode.map(TransformationMode::code),
            aspect_ratio_mode: cell.aspect_ratio_mode.map(AspectRatioMode::code),
            selected: cell.selected,
        }
    }

    /// Writes the snapshot back onto a cell.
    ///
    /// An image that fails to decode leaves the cell without an image. On
    /// success the payload becomes the cell's cached payload. Spans are not
    /// touched here; the grid owns them.
    pub fn apply_to_cell<C: ImageCodec>(&self, cell: &mut CollageCell<C::Image>, codec: &C) {
        match self.image.as_deref().and_then(|payload| codec.decode(payload)) {
            Some(image) => cell.adopt_image(Some(image), self.image.clone()),
            None => {
                if self.image.is_some() {
                    tracing::warn!(row = self.row, column = self.column, "Dropping undecodable cell image");
                }
                cell.clear_image();
            }
        }
        cell.caption.caption.clone_from(&self.caption);
        cell.caption.top_caption.clone_from(&self.top_caption);
        cell.caption.bottom_caption.clone_from(&self.bottom_caption);
        cell.caption.show_top_caption = self.show_top_caption;
        cell.caption.show_bottom_caption = self.show_bottom_caption;

        let style = &mut cell.style;
        style.font_family.clone_from(&self.caption_font_family);
        style.min_size = self.caption_min_size;
        style.max_size = self.caption_max_size;
        style.uppercase = self.caption_uppercase;
        style.stroke_width = self.caption_stroke_width;
        style.stroke_color = self.caption_stroke_color;
        style.fill_color = self.caption_fill_color;
        style.safe_margin_ratio = self.caption_safe_margin_ratio;
        style.font_size = self.caption_font_size;
        style.bold = self.caption_bold;
        style.italic = self.caption_italic;
        style.underline = self.caption_underline;

        cell.transformation_mode = self.transformation_mode.and_then(TransformationMode::from_code);
        cell.aspect_ratio_mode = self.aspect_ratio_mode.and_then(AspectRatioMode::from_code);
        cell.selected = self.selected;
    }
}

/// Snapshot of a whole grid.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CollageAutosaveState {
    /// Row count
    pub rows: usize,
    /// Column count
    pub columns: usize,
    /// Spacing between cells
    pub spacing: u32,
    /// Merged blocks
    pub merged_cells: Vec<MergedCellState>,
    /// One record per cell anchor
    pub cells: Vec<CellAutosaveState>,
}

impl CollageAutosaveState {
    /// Captures a grid, encoding images that have no cached payload.
    pub fn from_grid<C: ImageCodec>(grid: &CollageGrid<C::Image>, codec: &C) -> Self {
        Self {
            rows: grid.rows(),
            columns: grid.columns(),
            spacing: grid.spacing(),
            merged_cells: grid
                .merged_cells()
                .iter()
                .map(|(&(row, column), &(row_span, col_span))| MergedCellState {
                    row,
                    column,
                    row_span,
                    col_span,
                })
                .collect(),
            cells: grid
                .cells()
                .map(|((row, column), cell)| CellAutosaveState::from_cell(cell, row, column, codec))
                .collect(),
        }
    }

    /// Builds a grid from the snapshot.
    ///
    /// Merges that do not fit and cell records that do not sit on a cell's
    /// top-left position are logged and skipped, so one bad record never
    /// aborts the restore.
    ///
    /// # Errors
    ///
    /// Returns `GridError::InvalidDimension` if the snapshot has no rows or
    /// no columns.
    pub fn restore_grid<C: ImageCodec>(&self, codec: &C) -> GridResult<CollageGrid<C::Image>> {
        let _span = tracing::debug_span!(span_names::AUTOSAVE_RESTORE, rows = self.rows, columns = self.columns).entered();
        let mut grid = CollageGrid::new(self.rows, self.columns)?.with_spacing(self.spacing);
        for merge in &self.merged_cells {
            if let Err(e) = grid.merge_cells(merge.row, merge.column, merge.row_span, merge.col_span, false) {
                tracing::warn!(row = merge.row, column = merge.column, error = %e, "Skipping merge from snapshot");
            }
        }
        for state in &self.cells {
            let position = (state.row, state.column);
            match grid.anchor_of(state.row, state.column) {
                Some(anchor) if anchor == position => {
                    if let Some(cell) = grid.cell_at_mut(state.row, state.column) {
                        state.apply_to_cell(cell, codec);
                    }
                }
                Some(anchor) => {
                    tracing::warn!(row = state.row, column = state.column, anchor = ?anchor, "Skipping cell record inside a merged block");
                }
                None => {
                    tracing::warn!(row = state.row, column = state.column, "Skipping cell outside restored grid");
                }
            }
        }
        Ok(grid)
    }

    /// Replaces `grid` with the restored snapshot.
    ///
    /// # Errors
    ///
    /// Same as [`restore_grid`](Self::restore_grid); `grid` is untouched on error.
    pub fn apply_to_grid<C: ImageCodec>(&self, grid: &mut CollageGrid<C::Image>, codec: &C) -> GridResult<()> {
        *grid = self.restore_grid(codec)?;
        Ok(())
    }
}

/// Complete session snapshot: grid, controls and caption defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSnapshot {
    /// Grid state
    pub collage: CollageAutosaveState,
    /// Control panel values
    pub controls: ControlsState,
    /// Caption defaults applied to new captions
    pub captions: CaptionDefaults,
}

impl SessionSnapshot {
    /// Converts to a JSON tree.
    ///
    /// # Errors
    ///
    /// Returns `AutosaveError::Serialization` if a value cannot be represented.
    pub fn to_state_tree(&self) -> AutosaveResult<StateTree> {
        serde_json::to_value(self).map_err(AutosaveError::Serialization)
    }

    /// Parses a JSON tree.
    ///
    /// # Errors
    ///
    /// Returns `AutosaveError::Deserialization` if the tree has the wrong shape.
    pub fn from_state_tree(tree: StateTree) -> AutosaveResult<Self> {
        serde_json::from_value(tree).map_err(AutosaveError::Deserialization)
    }

    /// Serializes to pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns `AutosaveError::Serialization` if serialization fails.
    pub fn to_json(&self) -> AutosaveResult<String> {
        serde_json::to_string_pretty(self).map_err(AutosaveError::Serialization)
    }

    /// Parses JSON text.
    ///
    /// # Errors
    ///
    /// Returns `AutosaveError::Deserialization` if the text is not a snapshot.
    pub fn from_json(json: &str) -> AutosaveResult<Self> {
        serde_json::from_str(json).map_err(AutosaveError::Deserialization)
    }
}
