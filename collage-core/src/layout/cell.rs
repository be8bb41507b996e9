//! Layout cell value type and its JSON record

use serde::{Deserialize, Serialize};

use super::error::{LayoutError, LayoutResult};
use super::types::{Align, AspectMode, CellId, FitMode, Ratio};

/// One cell of a positional layout: geometry plus presentation metadata.
///
/// A span of 1×1 means the cell is not merged. `ratio` is only meaningful
/// when `aspect_mode` is [`AspectMode::Fixed`] and is always `Some` then.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutCell {
    /// Stable identifier
    pub id: CellId,
    /// Top-left row (0-based)
    pub row: usize,
    /// Top-left column (0-based)
    pub column: usize,
    /// Number of rows covered
    pub row_span: usize,
    /// Number of columns covered
    pub col_span: usize,
    /// Aspect constraint
    pub aspect_mode: AspectMode,
    /// Ratio used when `aspect_mode` is fixed
    pub ratio: Option<Ratio>,
    /// Scaling mode
    pub fit_mode: FitMode,
    /// Alignment keyword
    pub align: Align,
}

impl LayoutCell {
    /// Creates an unmerged cell with default presentation settings.
    #[must_use]
    pub fn new(id: CellId, row: usize, column: usize) -> Self {
        Self::spanning(id, row, column, 1, 1)
    }

    /// Creates a cell covering `row_span × col_span` positions.
    #[must_use]
    pub fn spanning(id: CellId, row: usize, column: usize, row_span: usize, col_span: usize) -> Self {
        Self {
            id,
            row,
            column,
            row_span,
            col_span,
            aspect_mode: AspectMode::Free,
            ratio: None,
            fit_mode: FitMode::Fit,
            align: Align::Center,
        }
    }

    /// Returns true if the cell spans more than one position.
    #[must_use]
    pub const fn is_merged(&self) -> bool {
        self.row_span != 1 || self.col_span != 1
    }

    /// Exclusive end row.
    #[must_use]
    pub const fn row_end(&self) -> usize {
        self.row.saturating_add(self.row_span)
    }

    /// Exclusive end column.
    #[must_use]
    pub const fn column_end(&self) -> usize {
        self.column.saturating_add(self.col_span)
    }

    /// Returns true if `(row, column)` lies inside the cell's rectangle.
    #[must_use]
    pub const fn contains(&self, row: usize, column: usize) -> bool {
        row >= self.row && row < self.row_end() && column >= self.column && column < self.column_end()
    }

    /// Returns true if the two cells share at least one position.
    #[must_use]
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.row < other.row_end()
            && other.row < self.row_end()
            && self.column < other.column_end()
            && other.column < self.column_end()
    }

    /// Iterates over every grid position the cell covers.
    pub fn positions(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (self.row..self.row_end())
            .flat_map(move |r| (self.column..self.column_end()).map(move |c| (r, c)))
    }

    pub(crate) fn to_record(&self) -> CellRecord {
        CellRecord {
            id: self.id.get(),
            row: self.row,
            column: self.column,
            row_span: self.row_span,
            col_span: self.col_span,
            aspect_mode: self.aspect_mode,
            fit_mode: self.fit_mode,
            align: self.align,
            ratio: match self.aspect_mode {
                AspectMode::Fixed => self.ratio.map(|r| r.to_string()),
                AspectMode::Free => None,
            },
        }
    }
}

impl TryFrom<CellRecord> for LayoutCell {
    type Error = LayoutError;

    fn try_from(record: CellRecord) -> LayoutResult<Self> {
        if record.row_span == 0 || record.col_span == 0 {
            return Err(LayoutError::MalformedLayout(format!(
                "cell {} has an empty span {}x{}",
                record.id, record.row_span, record.col_span
            )));
        }
        if record.row.checked_add(record.row_span).is_none()
            || record.column.checked_add(record.col_span).is_none()
        {
            return Err(LayoutError::MalformedLayout(format!(
                "cell {} at ({}, {}) spans past the largest grid",
                record.id, record.row, record.column
            )));
        }
        let ratio = match record.aspect_mode {
            AspectMode::Fixed => {
                let raw = record.ratio.ok_or(LayoutError::MissingRatio)?;
                Some(raw.parse::<Ratio>()?)
            }
            AspectMode::Free => None,
        };
        Ok(Self {
            id: CellId(record.id),
            row: record.row,
            column: record.column,
            row_span: record.row_span,
            col_span: record.col_span,
            aspect_mode: record.aspect_mode,
            ratio,
            fit_mode: record.fit_mode,
            align: record.align,
        })
    }
}

const fn one() -> usize {
    1
}

/// Wire form of a cell in layout JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CellRecord {
    pub id: u32,
    pub row: usize,
    pub column: usize,
    #[serde(default = "one")]
    pub row_span: usize,
    #[serde(default = "one")]
    pub col_span: usize,
    #[serde(default)]
    pub aspect_mode: AspectMode,
    #[serde(default)]
    pub fit_mode: FitMode,
    #[serde(default)]
    pub align: Align,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratio: Option<String>,
}

/// Wire form of a whole layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct LayoutDocument {
    #[serde(default)]
    pub cells: Vec<CellRecord>,
    #[serde(default)]
    pub gutter: u32,
    #[serde(default)]
    pub padding: u32,
}
