//! Error types for the live collage grid

use crate::layout::CellId;

/// Errors returned by [`CollageGrid`](super::CollageGrid) operations.
///
/// A failed operation leaves the grid unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// Grid dimensions must both be positive.
    #[error("invalid grid dimensions {rows}x{columns} (both must be positive)")]
    InvalidDimension {
        /// Requested row count
        rows: usize,
        /// Requested column count
        columns: usize,
    },

    /// A merge must cover at least two positions.
    #[error("invalid merge span {row_span}x{col_span} (must cover at least two cells)")]
    InvalidSpan {
        /// Requested row span
        row_span: usize,
        /// Requested column span
        col_span: usize,
    },

    /// The rectangle leaves the grid.
    #[error("merge at ({row}, {column}) spanning {row_span}x{col_span} is out of bounds")]
    OutOfBounds {
        /// Top-left row
        row: usize,
        /// Top-left column
        column: usize,
        /// Row span
        row_span: usize,
        /// Column span
        col_span: usize,
    },

    /// A position outside the grid was addressed.
    #[error("position ({row}, {column}) is outside the grid")]
    PositionOutOfBounds {
        /// Requested row
        row: usize,
        /// Requested column
        column: usize,
    },

    /// The selected cells do not cover exactly the merge rectangle.
    #[error("selected cells do not exactly cover the merge rectangle")]
    SelectionMismatch,

    /// The selection is not a filled rectangle of at least two cells.
    #[error("selection must be a filled rectangle of at least two cells")]
    NoRectangularSelection,

    /// An existing merged block straddles the rectangle boundary.
    #[error("merged block at ({row}, {column}) only partially overlaps the rectangle")]
    PartialOverlap {
        /// Anchor row of the straddling block
        row: usize,
        /// Anchor column of the straddling block
        column: usize,
    },

    /// The rectangle's top-left position is covered by a block anchored elsewhere.
    #[error("position ({row}, {column}) is not the top-left of a cell")]
    NotMergeAnchor {
        /// Requested row
        row: usize,
        /// Requested column
        column: usize,
    },

    /// No merged block is anchored at the position.
    #[error("no merged cell at ({row}, {column})")]
    NotMerged {
        /// Requested row
        row: usize,
        /// Requested column
        column: usize,
    },

    /// No cell has the given id.
    #[error("cell not found: {0}")]
    CellNotFound(CellId),
}

/// Result type for grid operations
pub type GridResult<T> = std::result::Result<T, GridError>;
