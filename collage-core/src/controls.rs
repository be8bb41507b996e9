//! Control panel state saved alongside the grid

use serde::{Deserialize, Serialize};

use crate::codec::CellImage;
use crate::grid::CollageCell;

/// Default grid rows
pub const DEFAULT_ROWS: usize = 2;

/// Default grid columns
pub const DEFAULT_COLUMNS: usize = 2;

/// Grid size controls and the selected template name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsState {
    /// Rows spin box
    pub rows: usize,
    /// Columns spin box
    pub columns: usize,
    /// Selected template, if any
    pub template: Option<String>,
}

impl Default for ControlsState {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            columns: DEFAULT_COLUMNS,
            template: None,
        }
    }
}

/// Caption settings applied to every cell at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "CaptionDefaultsRecord")]
pub struct CaptionDefaults {
    /// Show top captions
    pub show_top: bool,
    /// Show bottom captions
    pub show_bottom: bool,
    /// Font family
    pub font_family: String,
    /// Font size
    pub font_size: u32,
    /// Outline width
    pub stroke_width: u32,
    /// Upper-case captions
    pub uppercase: bool,
}

impl Default for CaptionDefaults {
    fn default() -> Self {
        Self {
            show_top: true,
            show_bottom: true,
            font_family: "Impact".to_string(),
            font_size: 32,
            stroke_width: 3,
            uppercase: true,
        }
    }
}

impl CaptionDefaults {
    /// Applies the defaults to a cell and returns true if anything changed.
    ///
    /// Visibility flags only change for captions that have text. The font
    /// size pins both ends of the auto-fit range.
    pub fn apply_to<I: CellImage>(&self, cell: &mut CollageCell<I>) -> bool {
        let before = (cell.caption.clone(), cell.style.clone());
        if !cell.caption.top_caption.is_empty() {
            cell.caption.show_top_caption = self.show_top;
        }
        if !cell.caption.bottom_caption.is_empty() {
            cell.caption.show_bottom_caption = self.show_bottom;
        }
        let style = &mut cell.style;
        style.font_family.clone_from(&self.font_family);
        style.min_size = self.font_size;
        style.max_size = self.font_size;
        style.stroke_width = self.stroke_width;
        style.uppercase = self.uppercase;
        before != (cell.caption.clone(), cell.style.clone())
    }
}

/// Accepts older files that stored `min_size`/`max_size` instead of `font_size`.
#[derive(Deserialize)]
#[serde(default)]
struct CaptionDefaultsRecord {
    show_top: bool,
    show_bottom: bool,
    font_family: Option<String>,
    font_size: Option<u32>,
    min_size: Option<u32>,
    max_size: Option<u32>,
    stroke_width: u32,
    uppercase: bool,
}

impl Default for CaptionDefaultsRecord {
    fn default() -> Self {
        let defaults = CaptionDefaults::default();
        Self {
            show_top: defaults.show_top,
            show_bottom: defaults.show_bottom,
            font_family: None,
            font_size: None,
            min_size: None,
            max_size: None,
            stroke_width: defaults.stroke_width,
            uppercase: defaults.uppercase,
        }
    }
}

impl From<CaptionDefaultsRecord> for CaptionDefaults {
    fn from(record: CaptionDefaultsRecord) -> Self {
        let defaults = Self::default();
        Self {
            show_top: record.show_top,
            show_bottom: record.show_bottom,
            font_family: record
                .font_family
                .filter(|family| !family.is_empty())
                .unwrap_or(defaults.font_family),
            font_size: record
                .font_size
                .or(record.min_size)
                .or(record.max_size)
                .unwrap_or(defaults.font_size),
            stroke_width: record.stroke_width,
            uppercase: record.uppercase,
        }
    }
}
