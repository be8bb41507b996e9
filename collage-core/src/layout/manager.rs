//! Positional grid layout manager
//!
//! [`GridLayoutManager`] owns the cells of one grid and edits them through
//! explicit positions and ids: merge, split, resize and per-cell aspect
//! settings, each undoable. It knows nothing about images or captions; a
//! merge produces a brand new cell with default settings.

use std::collections::BTreeSet;

use super::cell::{LayoutCell, LayoutDocument};
use super::error::{LayoutError, LayoutResult};
use super::types::{Align, AspectMode, CellId, FitMode, Ratio};
use crate::tracing::span_names;

/// Aspect and alignment settings applied by [`GridLayoutManager::set_aspect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AspectSettings {
    /// Aspect constraint
    pub aspect_mode: AspectMode,
    /// Ratio, required when `aspect_mode` is fixed
    pub ratio: Option<Ratio>,
    /// Scaling mode
    pub fit_mode: FitMode,
    /// Alignment keyword
    pub align: Align,
}

impl AspectSettings {
    /// Free aspect with default fit and alignment.
    #[must_use]
    pub fn free() -> Self {
        Self::default()
    }

    /// Fixed aspect locked to `ratio`.
    #[must_use]
    pub fn fixed(ratio: Ratio) -> Self {
        Self {
            aspect_mode: AspectMode::Fixed,
            ratio: Some(ratio),
            ..Self::default()
        }
    }

    /// Sets the fit mode.
    #[must_use]
    pub const fn with_fit_mode(mut self, fit_mode: FitMode) -> Self {
        self.fit_mode = fit_mode;
        self
    }

    /// Sets the alignment.
    #[must_use]
    pub const fn with_align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }
}

/// Maintains and edits a grid based collage layout.
///
/// # Invariants
///
/// - Every position of the `rows × columns` grid is covered by exactly one cell.
/// - Cell ids are unique; `next_id` is never rolled back, not even by undo.
/// - A failed operation leaves cells and history untouched.
#[derive(Debug, Clone)]
pub struct GridLayoutManager {
    rows: usize,
    columns: usize,
    gutter: u32,
    padding: u32,
    cells: Vec<LayoutCell>,
    /// Incremented before every allocation.
    next_id: u32,
    undo_stack: Vec<Vec<LayoutCell>>,
    redo_stack: Vec<Vec<LayoutCell>>,
    history_limit: Option<usize>,
}

impl GridLayoutManager {
    /// Creates a grid of unmerged cells with ids `0..rows*columns`.
    ///
    /// # Errors
    ///
    /// Returns `LayoutError::InvalidDimension` if either dimension is zero.
    pub fn new(rows: usize, columns: usize) -> LayoutResult<Self> {
        Self::with_spacing(rows, columns, 0, 0)
    }

    /// Creates a grid with explicit gutter and padding.
    ///
    /// # Errors
    ///
    /// Returns `LayoutError::InvalidDimension` if either dimension is zero or
    /// the grid has more positions than there are cell ids.
    pub fn with_spacing(rows: usize, columns: usize, gutter: u32, padding: u32) -> LayoutResult<Self> {
        let next_id = rows
            .checked_mul(columns)
            .filter(|total| *total > 0)
            .and_then(|total| u32::try_from(total).ok())
            .ok_or(LayoutError::InvalidDimension { rows, columns })?;
        let cells = (0..rows)
            .flat_map(|r| (0..columns).map(move |c| (r, c)))
            .zip(0..next_id)
            .map(|((r, c), id)| LayoutCell::new(CellId(id), r, c))
            .collect();
        Ok(Self {
            rows,
            columns,
            gutter,
            padding,
            cells,
            next_id,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            history_limit: None,
        })
    }

    /// Bounds the undo and redo stacks. `None` keeps them unbounded.
    #[must_use]
    pub fn with_history_limit(mut self, limit: Option<usize>) -> Self {
        self.history_limit = limit.filter(|l| *l > 0);
        self.trim_history();
        self
    }

    /// Number of grid rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of grid columns.
    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns
    }

    /// Gutter between cells (presentation only).
    #[must_use]
    pub const fn gutter(&self) -> u32 {
        self.gutter
    }

    /// Outer padding (presentation only).
    #[must_use]
    pub const fn padding(&self) -> u32 {
        self.padding
    }

    /// Current cells, in no particular order.
    #[must_use]
    pub fn cells(&self) -> &[LayoutCell] {
        &self.cells
    }

    /// Current cells sorted by (row, column).
    #[must_use]
    pub fn sorted_cells(&self) -> Vec<&LayoutCell> {
        let mut cells: Vec<_> = self.cells.iter().collect();
        cells.sort_by_key(|c| (c.row, c.column));
        cells
    }

    /// Looks up a cell by id.
    #[must_use]
    pub fn cell(&self, id: CellId) -> Option<&LayoutCell> {
        self.cells.iter().find(|c| c.id == id)
    }

    /// Returns the cell covering `(row, column)`, merged or not.
    #[must_use]
    pub fn cell_at(&self, row: usize, column: usize) -> Option<&LayoutCell> {
        self.cells.iter().find(|c| c.contains(row, column))
    }

    /// Returns true if an undo step is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Returns true if a redo step is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of undo steps available.
    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Merges the cells at `positions` into one cell.
    ///
    /// The positions must exactly fill their bounding rectangle and each
    /// must be an unmerged cell. The new cell gets a fresh id and default
    /// settings; nothing of the removed cells is kept.
    ///
    /// # Errors
    ///
    /// - `InsufficientSelection` for fewer than two distinct positions
    /// - `PositionOutOfBounds` for a position outside the grid
    /// - `NonRectangularSelection` for gaps, L-shapes or diagonals
    /// - `CellAlreadyMerged` if a covered position belongs to a merged cell
    pub fn merge(&mut self, positions: &[(usize, usize)]) -> LayoutResult<CellId> {
        let _span = tracing::debug_span!(span_names::LAYOUT_MERGE, cells = positions.len()).entered();
        let selected: BTreeSet<(usize, usize)> = positions.iter().copied().collect();
        if selected.len() < 2 {
            return Err(LayoutError::InsufficientSelection(selected.len()));
        }
        if let Some(&(row, column)) = selected
            .iter()
            .find(|(r, c)| *r >= self.rows || *c >= self.columns)
        {
            return Err(LayoutError::PositionOutOfBounds { row, column });
        }

        let (min_r, max_r, min_c, max_c) = bounding_rect(&selected);
        let required: BTreeSet<(usize, usize)> = (min_r..=max_r)
            .flat_map(|r| (min_c..=max_c).map(move |c| (r, c)))
            .collect();
        if selected != required {
            return Err(LayoutError::NonRectangularSelection);
        }

        let mut covered = Vec::with_capacity(required.len());
        for &(row, column) in &required {
            let index = self
                .cells
                .iter()
                .position(|c| c.row == row && c.column == column && !c.is_merged())
                .ok_or(LayoutError::CellAlreadyMerged { row, column })?;
            covered.push(index);
        }
        self.reserve_ids(1)?;

        self.snapshot();
        covered.sort_unstable_by(|a, b| b.cmp(a));
        for index in covered {
            self.cells.swap_remove(index);
        }
        let id = self.allocate_id();
        self.cells.push(LayoutCell::spanning(
            id,
            min_r,
            min_c,
            max_r - min_r + 1,
            max_c - min_c + 1,
        ));
        tracing::debug!(
            cell_id = %id,
            row = min_r,
            column = min_c,
            row_span = max_r - min_r + 1,
            col_span = max_c - min_c + 1,
            "Merged layout cells"
        );
        Ok(id)
    }

    /// Splits a cell into a `rows × cols` sub-grid of equally sized cells.
    ///
    /// Returns the ids of the new cells in row-major order.
    ///
    /// # Errors
    ///
    /// - `InvalidSpan` if `rows` or `cols` is zero
    /// - `CellNotFound` if no cell has `cell_id`
    /// - `IndivisibleSpan` if the spans are not divisible by the factors
    pub fn split(&mut self, cell_id: CellId, rows: usize, cols: usize) -> LayoutResult<Vec<CellId>> {
        let _span = tracing::debug_span!(span_names::LAYOUT_SPLIT, cell_id = %cell_id).entered();
        if rows == 0 || cols == 0 {
            return Err(LayoutError::InvalidSpan {
                row_span: rows,
                col_span: cols,
            });
        }
        let index = self.index_of(cell_id)?;
        let cell = &self.cells[index];
        if cell.row_span % rows != 0 || cell.col_span % cols != 0 {
            return Err(LayoutError::IndivisibleSpan {
                row_span: cell.row_span,
                col_span: cell.col_span,
                rows,
                cols,
            });
        }
        self.reserve_ids(rows * cols)?;

        self.snapshot();
        let cell = self.cells.swap_remove(index);
        let sub_r = cell.row_span / rows;
        let sub_c = cell.col_span / cols;
        let mut created = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                let id = self.allocate_id();
                self.cells.push(LayoutCell::spanning(
                    id,
                    cell.row + r * sub_r,
                    cell.column + c * sub_c,
                    sub_r,
                    sub_c,
                ));
                created.push(id);
            }
        }
        tracing::debug!(cell_id = %cell_id, rows, cols, "Split layout cell");
        Ok(created)
    }

    /// Resizes a cell in place, keeping its top-left corner.
    ///
    /// Positions released by a shrink are refilled with fresh unmerged cells
    /// so the grid stays fully covered. Growing only succeeds into positions
    /// no other cell occupies.
    ///
    /// # Errors
    ///
    /// - `InvalidSpan` if either span is zero
    /// - `CellNotFound` if no cell has `cell_id`
    /// - `OutOfBounds` if the new rectangle leaves the grid
    /// - `OverlapDetected` if it intersects another cell
    pub fn resize(&mut self, cell_id: CellId, row_span: usize, col_span: usize) -> LayoutResult<()> {
        if row_span == 0 || col_span == 0 {
            return Err(LayoutError::InvalidSpan { row_span, col_span });
        }
        let index = self.index_of(cell_id)?;
        let cell = &self.cells[index];
        if cell.row.checked_add(row_span).is_none_or(|end| end > self.rows)
            || cell.column.checked_add(col_span).is_none_or(|end| end > self.columns)
        {
            return Err(LayoutError::OutOfBounds {
                cell_id,
                row_span,
                col_span,
            });
        }

        let occupied = self.occupied_positions(Some(cell_id));
        let resized = LayoutCell::spanning(cell_id, cell.row, cell.column, row_span, col_span);
        let new_area: BTreeSet<(usize, usize)> = resized.positions().collect();
        if !occupied.is_disjoint(&new_area) {
            return Err(LayoutError::OverlapDetected { cell_id });
        }
        let released: Vec<(usize, usize)> = cell
            .positions()
            .filter(|pos| !new_area.contains(pos))
            .collect();
        self.reserve_ids(released.len())?;

        self.snapshot();
        let cell = &mut self.cells[index];
        cell.row_span = row_span;
        cell.col_span = col_span;
        for (row, column) in released {
            let id = self.allocate_id();
            self.cells.push(LayoutCell::new(id, row, column));
        }
        tracing::debug!(cell_id = %cell_id, row_span, col_span, "Resized layout cell");
        Ok(())
    }

    /// Updates the aspect, fit and alignment settings of a cell.
    ///
    /// The ratio is dropped when the mode is free. The change is undoable.
    ///
    /// # Errors
    ///
    /// - `CellNotFound` if no cell has `cell_id`
    /// - `MissingRatio` if the mode is fixed and no ratio is given
    pub fn set_aspect(&mut self, cell_id: CellId, settings: AspectSettings) -> LayoutResult<()> {
        let index = self.index_of(cell_id)?;
        if settings.aspect_mode == AspectMode::Fixed && settings.ratio.is_none() {
            return Err(LayoutError::MissingRatio);
        }
        self.snapshot();
        let cell = &mut self.cells[index];
        cell.aspect_mode = settings.aspect_mode;
        cell.ratio = match settings.aspect_mode {
            AspectMode::Fixed => settings.ratio,
            AspectMode::Free => None,
        };
        cell.fit_mode = settings.fit_mode;
        cell.align = settings.align;
        Ok(())
    }

    /// Restores the cells as they were before the last edit.
    ///
    /// # Errors
    ///
    /// Returns `LayoutError::NothingToUndo` if the undo stack is empty.
    pub fn undo(&mut self) -> LayoutResult<()> {
        let previous = self.undo_stack.pop().ok_or(LayoutError::NothingToUndo)?;
        let current = std::mem::replace(&mut self.cells, previous);
        self.redo_stack.push(current);
        self.trim_history();
        Ok(())
    }

    /// Re-applies the last undone edit.
    ///
    /// # Errors
    ///
    /// Returns `LayoutError::NothingToRedo` if the redo stack is empty.
    pub fn redo(&mut self) -> LayoutResult<()> {
        let next = self.redo_stack.pop().ok_or(LayoutError::NothingToRedo)?;
        let current = std::mem::replace(&mut self.cells, next);
        self.undo_stack.push(current);
        self.trim_history();
        Ok(())
    }

    /// Drops all undo and redo history.
    pub fn clear_history(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Serializes the layout as compact JSON, cells sorted by (row, column).
    ///
    /// # Errors
    ///
    /// Returns `LayoutError::MalformedLayout` if serialization fails.
    pub fn to_json(&self) -> LayoutResult<String> {
        let document = LayoutDocument {
            cells: self.sorted_cells().into_iter().map(LayoutCell::to_record).collect(),
            gutter: self.gutter,
            padding: self.padding,
        };
        serde_json::to_string(&document).map_err(|e| LayoutError::MalformedLayout(e.to_string()))
    }

    /// Rebuilds a manager from layout JSON.
    ///
    /// Grid dimensions are inferred from the furthest cell extents and the id
    /// counter resumes after the largest id. History starts empty.
    ///
    /// # Errors
    ///
    /// - `MalformedLayout` for invalid JSON, duplicate ids, gaps or overlaps
    /// - `InvalidRatio` / `MissingRatio` for broken fixed-aspect cells
    /// - `InvalidDimension` for a layout without cells
    pub fn from_json(json: &str) -> LayoutResult<Self> {
        let _span = tracing::debug_span!(span_names::LAYOUT_LOAD, bytes = json.len()).entered();
        let document: LayoutDocument =
            serde_json::from_str(json).map_err(|e| LayoutError::MalformedLayout(e.to_string()))?;
        let cells = document
            .cells
            .into_iter()
            .map(LayoutCell::try_from)
            .collect::<LayoutResult<Vec<_>>>()?;

        let rows = cells.iter().map(LayoutCell::row_end).max().unwrap_or(0);
        let columns = cells.iter().map(LayoutCell::column_end).max().unwrap_or(0);
        if rows == 0 || columns == 0 {
            return Err(LayoutError::InvalidDimension { rows, columns });
        }

        let mut ids = BTreeSet::new();
        for cell in &cells {
            if !ids.insert(cell.id) {
                return Err(LayoutError::MalformedLayout(format!(
                    "duplicate cell id {}",
                    cell.id
                )));
            }
        }

        let manager = Self {
            rows,
            columns,
            gutter: document.gutter,
            padding: document.padding,
            next_id: ids.iter().next_back().map_or(0, |id| id.get()),
            cells,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            history_limit: None,
        };
        manager.check_coverage()?;
        Ok(manager)
    }

    /// Verifies that every grid position is covered by exactly one cell.
    ///
    /// Cells must lie inside the grid and be pairwise disjoint; their areas
    /// then have to add up to the grid area.
    ///
    /// # Errors
    ///
    /// Returns `LayoutError::MalformedLayout` describing the first
    /// out-of-bounds cell, overlap or gap.
    pub fn check_coverage(&self) -> LayoutResult<()> {
        let total = self.rows.checked_mul(self.columns).ok_or(LayoutError::InvalidDimension {
            rows: self.rows,
            columns: self.columns,
        })?;
        let mut covered = 0;
        for (i, cell) in self.cells.iter().enumerate() {
            if cell.row_end() > self.rows || cell.column_end() > self.columns {
                return Err(LayoutError::MalformedLayout(format!(
                    "cell {} extends outside the {}x{} grid",
                    cell.id, self.rows, self.columns
                )));
            }
            if let Some(other) = self.cells[..i].iter().find(|other| other.overlaps(cell)) {
                return Err(LayoutError::MalformedLayout(format!(
                    "cells {} and {} overlap",
                    other.id, cell.id
                )));
            }
            covered += cell.row_span * cell.col_span;
        }
        if covered != total {
            return Err(LayoutError::MalformedLayout(format!(
                "cells cover {covered} of {total} positions"
            )));
        }
        Ok(())
    }

    fn index_of(&self, cell_id: CellId) -> LayoutResult<usize> {
        self.cells
            .iter()
            .position(|c| c.id == cell_id)
            .ok_or(LayoutError::CellNotFound(cell_id))
    }

    fn occupied_positions(&self, exclude: Option<CellId>) -> BTreeSet<(usize, usize)> {
        self.cells
            .iter()
            .filter(|c| Some(c.id) != exclude)
            .flat_map(LayoutCell::positions)
            .collect()
    }

    fn reserve_ids(&self, count: usize) -> LayoutResult<()> {
        u32::try_from(count)
            .ok()
            .and_then(|count| self.next_id.checked_add(count))
            .map(|_| ())
            .ok_or(LayoutError::IdsExhausted)
    }

    /// Only called after `reserve_ids` covered the allocation.
    fn allocate_id(&mut self) -> CellId {
        self.next_id += 1;
        CellId(self.next_id)
    }

    fn snapshot(&mut self) {
        self.undo_stack.push(self.cells.clone());
        self.redo_stack.clear();
        self.trim_history();
    }

    fn trim_history(&mut self) {
        if let Some(limit) = self.history_limit {
            for stack in [&mut self.undo_stack, &mut self.redo_stack] {
                if stack.len() > limit {
                    let excess = stack.len() - limit;
                    stack.drain(..excess);
                }
            }
        }
    }
}

fn bounding_rect(positions: &BTreeSet<(usize, usize)>) -> (usize, usize, usize, usize) {
    let mut min_r = usize::MAX;
    let mut max_r = 0;
    let mut min_c = usize::MAX;
    let mut max_c = 0;
    for &(r, c) in positions {
        min_r = min_r.min(r);
        max_r = max_r.max(r);
        min_c = min_c.min(c);
        max_c = max_c.max(c);
    }
    (min_r, max_r, min_c, max_c)
}
