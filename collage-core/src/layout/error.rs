//! Error types for the positional layout manager

use super::types::CellId;

/// Errors returned by [`GridLayoutManager`](super::GridLayoutManager).
///
/// Every structural error leaves the layout untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// Grid dimensions must both be positive.
    #[error("invalid grid dimensions {rows}x{columns} (both must be positive)")]
    InvalidDimension {
        /// Requested row count
        rows: usize,
        /// Requested column count
        columns: usize,
    },

    /// A merge needs at least two positions.
    #[error("need at least two cells to merge, got {0}")]
    InsufficientSelection(usize),

    /// The merge positions do not fill their bounding rectangle.
    #[error("selection must form a filled rectangle")]
    NonRectangularSelection,

    /// A merge touched a position that is not an unmerged cell.
    #[error("cell at ({row}, {column}) is already merged")]
    CellAlreadyMerged {
        /// Row of the offending position
        row: usize,
        /// Column of the offending position
        column: usize,
    },

    /// A merge position lies outside the grid.
    #[error("position ({row}, {column}) is outside the grid")]
    PositionOutOfBounds {
        /// Requested row
        row: usize,
        /// Requested column
        column: usize,
    },

    /// No cell has the given id.
    #[error("cell not found: {0}")]
    CellNotFound(CellId),

    /// A split factor does not divide the cell's span.
    #[error("span {row_span}x{col_span} is not divisible into {rows}x{cols} parts")]
    IndivisibleSpan {
        /// Current row span
        row_span: usize,
        /// Current column span
        col_span: usize,
        /// Requested row parts
        rows: usize,
        /// Requested column parts
        cols: usize,
    },

    /// Spans and split factors must be positive.
    #[error("invalid span {row_span}x{col_span} (both must be positive)")]
    InvalidSpan {
        /// Requested row span
        row_span: usize,
        /// Requested column span
        col_span: usize,
    },

    /// A resize would leave the grid.
    #[error("resize of cell {cell_id} to {row_span}x{col_span} exceeds the grid bounds")]
    OutOfBounds {
        /// The resized cell
        cell_id: CellId,
        /// Requested row span
        row_span: usize,
        /// Requested column span
        col_span: usize,
    },

    /// A resize would cover another cell.
    #[error("resize of cell {cell_id} would overlap another cell")]
    OverlapDetected {
        /// The resized cell
        cell_id: CellId,
    },

    /// Fixed aspect mode was requested without a ratio.
    #[error("fixed aspect mode requires a ratio")]
    MissingRatio,

    /// A ratio string or value could not be used.
    #[error("invalid ratio '{0}' (expected W:H with positive integers)")]
    InvalidRatio(String),

    /// Nothing left on the undo stack.
    #[error("nothing to undo")]
    NothingToUndo,

    /// Nothing left on the redo stack.
    #[error("nothing to redo")]
    NothingToRedo,

    /// Every cell id up to `u32::MAX` has been handed out.
    #[error("no cell ids left to allocate")]
    IdsExhausted,

    /// Layout JSON could not be interpreted.
    #[error("malformed layout: {0}")]
    MalformedLayout(String),
}

/// Result type for layout operations
pub type LayoutResult<T> = std::result::Result<T, LayoutError>;
