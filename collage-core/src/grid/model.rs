//! Selection-driven collage grid model

use std::collections::{BTreeMap, BTreeSet};

use super::cell::{AutosaveToken, CellContent, CollageCell};
use super::error::{GridError, GridResult};
use crate::codec::CellImage;
use crate::layout::CellId;
use crate::tracing::span_names;

/// Default spacing between cells in pixels.
pub const DEFAULT_SPACING: u32 = 2;

/// Grid position as `(row, column)`.
pub type Position = (usize, usize);

/// Rectangle as `(row, column, row_span, col_span)`.
pub type Rect = (usize, usize, usize, usize);

/// The live collage grid.
///
/// Cells are keyed by the position of their top-left corner (their anchor).
/// Merged blocks are additionally recorded in `merged_cells` as
/// anchor → `(row_span, col_span)`; every other position of a block has no
/// entry in `cells`.
///
/// Unlike [`GridLayoutManager`](crate::layout::GridLayoutManager), merging
/// here keeps the anchor cell and all of its content.
#[derive(Debug, Clone)]
pub struct CollageGrid<I> {
    rows: usize,
    columns: usize,
    spacing: u32,
    cells: BTreeMap<Position, CollageCell<I>>,
    merged_cells: BTreeMap<Position, (usize, usize)>,
    next_cell_id: u32,
}

impl<I: CellImage> CollageGrid<I> {
    /// Creates an unmerged grid of empty cells.
    ///
    /// # Errors
    ///
    /// Returns `GridError::InvalidDimension` if either dimension is zero.
    pub fn new(rows: usize, columns: usize) -> GridResult<Self> {
        if rows == 0 || columns == 0 || rows.checked_mul(columns).is_none() {
            return Err(GridError::InvalidDimension { rows, columns });
        }
        let mut grid = Self {
            rows,
            columns,
            spacing: DEFAULT_SPACING,
            cells: BTreeMap::new(),
            merged_cells: BTreeMap::new(),
            next_cell_id: 0,
        };
        grid.populate();
        Ok(grid)
    }

    /// Sets the spacing between cells.
    #[must_use]
    pub const fn with_spacing(mut self, spacing: u32) -> Self {
        self.spacing = spacing;
        self
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns
    }

    /// Spacing between cells in pixels.
    #[must_use]
    pub const fn spacing(&self) -> u32 {
        self.spacing
    }

    /// Updates the spacing between cells.
    pub fn set_spacing(&mut self, spacing: u32) {
        self.spacing = spacing;
    }

    /// Merged blocks as anchor → `(row_span, col_span)`.
    #[must_use]
    pub const fn merged_cells(&self) -> &BTreeMap<Position, (usize, usize)> {
        &self.merged_cells
    }

    /// Iterates over cells with their anchor positions in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (Position, &CollageCell<I>)> {
        self.cells.iter().map(|(pos, cell)| (*pos, cell))
    }

    /// Iterates mutably over cells with their anchor positions.
    pub fn cells_mut(&mut self) -> impl Iterator<Item = (Position, &mut CollageCell<I>)> {
        self.cells.iter_mut().map(|(pos, cell)| (*pos, cell))
    }

    /// Number of cells, merged blocks counting once.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Returns the anchor of the cell covering `(row, column)`.
    #[must_use]
    pub fn anchor_of(&self, row: usize, column: usize) -> Option<Position> {
        if self.cells.contains_key(&(row, column)) {
            return Some((row, column));
        }
        self.merged_cells
            .iter()
            .find(|&(&(r, c), &(rs, cs))| row >= r && row < r + rs && column >= c && column < c + cs)
            .map(|(anchor, _)| *anchor)
    }

    /// Returns the cell covering `(row, column)`.
    #[must_use]
    pub fn cell_at(&self, row: usize, column: usize) -> Option<&CollageCell<I>> {
        self.anchor_of(row, column).and_then(|pos| self.cells.get(&pos))
    }

    /// Returns the cell covering `(row, column)` mutably.
    pub fn cell_at_mut(&mut self, row: usize, column: usize) -> Option<&mut CollageCell<I>> {
        let anchor = self.anchor_of(row, column)?;
        self.cells.get_mut(&anchor)
    }

    /// Returns the anchor position of the cell with `id`.
    #[must_use]
    pub fn position_of(&self, id: CellId) -> Option<Position> {
        self.cells
            .iter()
            .find(|(_, cell)| cell.id() == id)
            .map(|(pos, _)| *pos)
    }

    /// Returns the cell with `id`.
    #[must_use]
    pub fn cell_by_id(&self, id: CellId) -> Option<&CollageCell<I>> {
        self.cells.values().find(|cell| cell.id() == id)
    }

    /// Sets the selection flag of the cell covering `(row, column)`.
    ///
    /// # Errors
    ///
    /// Returns `GridError::PositionOutOfBounds` for a position outside the grid.
    pub fn set_selected(&mut self, row: usize, column: usize, selected: bool) -> GridResult<()> {
        let cell = self
            .cell_at_mut(row, column)
            .ok_or(GridError::PositionOutOfBounds { row, column })?;
        cell.selected = selected;
        Ok(())
    }

    /// Deselects every cell.
    pub fn clear_selection(&mut self) {
        for cell in self.cells.values_mut() {
            cell.selected = false;
        }
    }

    /// Positions covered by selected cells, merged blocks expanded.
    #[must_use]
    pub fn selected_positions(&self) -> BTreeSet<Position> {
        self.cells
            .iter()
            .filter(|(_, cell)| cell.selected)
            .flat_map(|(&(r, c), cell)| footprint((r, c, cell.row_span(), cell.col_span())))
            .collect()
    }

    /// Returns true if the selection covers exactly the given rectangle and
    /// the rectangle lies inside the grid.
    #[must_use]
    pub fn is_valid_merge(&self, start_row: usize, start_col: usize, row_span: usize, col_span: usize) -> bool {
        if row_span == 0 || col_span == 0 || !self.fits((start_row, start_col, row_span, col_span)) {
            tracing::debug!(
                row = start_row,
                column = start_col,
                row_span,
                col_span,
                "Merge rectangle out of bounds"
            );
            return false;
        }
        let required: BTreeSet<Position> = footprint((start_row, start_col, row_span, col_span)).collect();
        self.selected_positions() == required
    }

    /// Merges a rectangle into its top-left cell.
    ///
    /// The anchor keeps its id and all of its content; the other covered
    /// cells are removed. Merged blocks lying completely inside the
    /// rectangle are absorbed. With `require_selection` the current
    /// selection must cover exactly the rectangle; restore paths pass
    /// `false` and only get bounds checking.
    ///
    /// # Errors
    ///
    /// - `InvalidSpan` if the rectangle covers fewer than two positions
    /// - `OutOfBounds` if it leaves the grid
    /// - `SelectionMismatch` if the selection does not match
    /// - `NotMergeAnchor` if the top-left position is inside another block
    /// - `PartialOverlap` if a merged block straddles the rectangle's edge
    pub fn merge_cells(
        &mut self,
        start_row: usize,
        start_col: usize,
        row_span: usize,
        col_span: usize,
        require_selection: bool,
    ) -> GridResult<()> {
        let rect = (start_row, start_col, row_span, col_span);
        if row_span.checked_mul(col_span).is_none_or(|area| area < 2) {
            return Err(GridError::InvalidSpan { row_span, col_span });
        }
        if !self.fits(rect) {
            return Err(GridError::OutOfBounds {
                row: start_row,
                column: start_col,
                row_span,
                col_span,
            });
        }
        if require_selection && !self.is_valid_merge(start_row, start_col, row_span, col_span) {
            return Err(GridError::SelectionMismatch);
        }
        if !self.cells.contains_key(&(start_row, start_col)) {
            return Err(GridError::NotMergeAnchor {
                row: start_row,
                column: start_col,
            });
        }
        for (&(r, c), &(rs, cs)) in &self.merged_cells {
            let block = (r, c, rs, cs);
            if intersects(rect, block) && !contains(rect, block) {
                return Err(GridError::PartialOverlap { row: r, column: c });
            }
        }

        let absorbed: Vec<Position> = self
            .cells
            .keys()
            .copied()
            .filter(|&(r, c)| (r, c) != (start_row, start_col) && contains(rect, (r, c, 1, 1)))
            .collect();
        for pos in &absorbed {
            self.cells.remove(pos);
            self.merged_cells.remove(pos);
        }
        if let Some(anchor) = self.cells.get_mut(&(start_row, start_col)) {
            anchor.set_span(row_span, col_span);
        }
        self.merged_cells
            .insert((start_row, start_col), (row_span, col_span));
        tracing::info!(
            row = start_row,
            column = start_col,
            row_span,
            col_span,
            "Merged collage cells"
        );
        Ok(())
    }

    /// Merges the selected cells if they form a filled rectangle.
    ///
    /// Returns the merged rectangle.
    ///
    /// # Errors
    ///
    /// Returns `GridError::NoRectangularSelection` if the selection is not a
    /// rectangle of at least two positions, or any error of
    /// [`merge_cells`](Self::merge_cells).
    pub fn merge_selected(&mut self) -> GridResult<Rect> {
        let rect = self
            .selected_rectangle()
            .ok_or(GridError::NoRectangularSelection)?;
        self.merge_cells(rect.0, rect.1, rect.2, rect.3, true)?;
        Ok(rect)
    }

    /// Splits the merged block anchored at `(row, column)` into unit cells.
    ///
    /// The image, caption texts and selection of the block move to the
    /// unit at the anchor; every other unit starts empty with a fresh id.
    ///
    /// # Errors
    ///
    /// Returns `GridError::NotMerged` if no block is anchored there.
    pub fn split_cells(&mut self, row: usize, column: usize) -> GridResult<()> {
        let (row_span, col_span) = self
            .merged_cells
            .remove(&(row, column))
            .ok_or(GridError::NotMerged { row, column })?;
        let Some(mut merged) = self.cells.remove(&(row, column)) else {
            return Err(GridError::NotMerged { row, column });
        };

        for pos in footprint((row, column, row_span, col_span)) {
            let mut cell = self.new_cell();
            if pos == (row, column) {
                let (image, payload) = merged.take_image();
                cell.adopt_image(image, payload);
                cell.caption = std::mem::take(&mut merged.caption);
                cell.selected = merged.selected;
            }
            self.cells.insert(pos, cell);
        }
        tracing::info!(row, column, row_span, col_span, "Split merged collage cell");
        Ok(())
    }

    /// Changes the grid dimensions.
    ///
    /// Merges that still fit are re-applied, the rest are dropped. Content
    /// at positions that still exist lands on whichever cell covers them;
    /// content outside the new bounds is discarded.
    ///
    /// # Errors
    ///
    /// Returns `GridError::InvalidDimension` if either dimension is zero.
    pub fn update_grid(&mut self, rows: usize, columns: usize) -> GridResult<()> {
        let _span = tracing::debug_span!(span_names::GRID_UPDATE, rows, columns).entered();
        if rows == 0 || columns == 0 {
            return Err(GridError::InvalidDimension { rows, columns });
        }
        let old_merges = std::mem::take(&mut self.merged_cells);
        let contents: Vec<(Position, CellContent<I>)> = std::mem::take(&mut self.cells)
            .into_iter()
            .map(|(pos, mut cell)| (pos, cell.take_content()))
            .collect();

        self.rows = rows;
        self.columns = columns;
        self.populate();

        for ((r, c), (rs, cs)) in old_merges {
            if !self.fits((r, c, rs, cs)) {
                tracing::info!(row = r, column = c, row_span = rs, col_span = cs, "Dropped merge outside new grid");
                continue;
            }
            if let Err(e) = self.merge_cells(r, c, rs, cs, false) {
                tracing::info!(row = r, column = c, error = %e, "Dropped merge during grid update");
            }
        }

        for ((r, c), content) in contents {
            if r >= rows || c >= columns {
                continue;
            }
            if let Some(cell) = self.cell_at_mut(r, c) {
                cell.restore_content(content);
            }
        }
        tracing::info!(rows, columns, "Updated collage grid dimensions");
        Ok(())
    }

    /// Returns the selected rectangle as `(row, column, row_span, col_span)`
    /// when at least two cells are selected and their footprint fills it.
    #[must_use]
    pub fn selected_rectangle(&self) -> Option<Rect> {
        if self.cells.values().filter(|cell| cell.selected).count() < 2 {
            return None;
        }
        let selected = self.selected_positions();
        let r0 = selected.iter().map(|p| p.0).min()?;
        let r1 = selected.iter().map(|p| p.0).max()?;
        let c0 = selected.iter().map(|p| p.1).min()?;
        let c1 = selected.iter().map(|p| p.1).max()?;
        let rect = (r0, c0, r1 - r0 + 1, c1 - c0 + 1);
        (selected.len() == rect.2 * rect.3).then_some(rect)
    }

    /// Swaps images and caption texts of the cells covering two positions.
    ///
    /// # Errors
    ///
    /// Returns `GridError::PositionOutOfBounds` if either position is
    /// outside the grid.
    pub fn swap_content(&mut self, a: Position, b: Position) -> GridResult<()> {
        let anchor_a = self
            .anchor_of(a.0, a.1)
            .ok_or(GridError::PositionOutOfBounds { row: a.0, column: a.1 })?;
        let anchor_b = self
            .anchor_of(b.0, b.1)
            .ok_or(GridError::PositionOutOfBounds { row: b.0, column: b.1 })?;
        if anchor_a == anchor_b {
            return Ok(());
        }
        let (image_a, caption_a) = match self.cells.get_mut(&anchor_a) {
            Some(cell) => (cell.take_image(), std::mem::take(&mut cell.caption)),
            None => return Ok(()),
        };
        let (image_b, caption_b) = match self.cells.get_mut(&anchor_b) {
            Some(cell) => {
                let taken = (cell.take_image(), std::mem::replace(&mut cell.caption, caption_a));
                cell.adopt_image(image_a.0, image_a.1);
                taken
            }
            None => return Ok(()),
        };
        if let Some(cell) = self.cells.get_mut(&anchor_a) {
            cell.adopt_image(image_b.0, image_b.1);
            cell.caption = caption_b;
        }
        tracing::debug!(from = ?anchor_a, to = ?anchor_b, "Swapped cell content");
        Ok(())
    }

    /// Stores a background encoding result.
    ///
    /// Returns false and drops the payload if the cell is gone or its image
    /// changed after the token was issued.
    pub fn accept_encoded_payload(&mut self, token: AutosaveToken, payload: Option<String>) -> bool {
        match self.cells.values_mut().find(|cell| cell.id() == token.cell) {
            Some(cell) if cell.generation() == token.generation => {
                cell.set_autosave_payload(payload);
                true
            }
            Some(_) => {
                tracing::debug!(cell_id = %token.cell, "Dropped stale encoded payload");
                false
            }
            None => false,
        }
    }

    /// Cells whose image has no cached payload yet, with the token to encode under.
    #[must_use]
    pub fn pending_encodes(&self) -> Vec<(AutosaveToken, I)> {
        self.cells
            .values()
            .filter(|cell| cell.autosave_payload().is_none())
            .filter_map(|cell| {
                cell.image()
                    .filter(|image| !image.is_empty())
                    .map(|image| (cell.autosave_token(), image.clone()))
            })
            .collect()
    }

    /// Resets the grid to empty unmerged cells of the same dimensions.
    pub fn clear(&mut self) {
        self.merged_cells.clear();
        self.populate();
        tracing::info!(rows = self.rows, columns = self.columns, "Cleared collage grid");
    }

    fn populate(&mut self) {
        self.cells.clear();
        for r in 0..self.rows {
            for c in 0..self.columns {
                let cell = self.new_cell();
                self.cells.insert((r, c), cell);
            }
        }
        tracing::debug!(rows = self.rows, columns = self.columns, "Populated collage grid");
    }

    fn new_cell(&mut self) -> CollageCell<I> {
        self.next_cell_id += 1;
        CollageCell::new(CellId(self.next_cell_id))
    }

    // Spans come from snapshots too, so the sums may overflow.
    const fn fits(&self, (r, c, rs, cs): Rect) -> bool {
        match (r.checked_add(rs), c.checked_add(cs)) {
            (Some(row_end), Some(col_end)) => row_end <= self.rows && col_end <= self.columns,
            _ => false,
        }
    }
}

fn footprint((r, c, rs, cs): Rect) -> impl Iterator<Item = Position> {
    (r..r + rs).flat_map(move |row| (c..c + cs).map(move |col| (row, col)))
}

const fn intersects(a: Rect, b: Rect) -> bool {
    a.0 < b.0 + b.2 && b.0 < a.0 + a.2 && a.1 < b.1 + b.3 && b.1 < a.1 + a.3
}

const fn contains(outer: Rect, inner: Rect) -> bool {
    inner.0 >= outer.0
        && inner.1 >= outer.1
        && inner.0 + inner.2 <= outer.0 + outer.2
        && inner.1 + inner.3 <= outer.1 + outer.3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Tile(&'static str);

    impl CellImage for Tile {
        fn is_empty(&self) -> bool {
            self.0.is_empty()
        }
    }

    fn grid(rows: usize, columns: usize) -> CollageGrid<Tile> {
        CollageGrid::new(rows, columns).unwrap()
    }

    fn select(grid: &mut CollageGrid<Tile>, positions: &[Position]) {
        for &(r, c) in positions {
            grid.set_selected(r, c, true).unwrap();
        }
    }

    #[test]
    fn new_grid_has_one_cell_per_position() {
        let grid = grid(2, 3);
        assert_eq!(grid.cell_count(), 6);
        let ids: BTreeSet<CellId> = grid.cells().map(|(_, c)| c.id()).collect();
        assert_eq!(ids.len(), 6);
        assert!(matches!(
            CollageGrid::<Tile>::new(0, 1),
            Err(GridError::InvalidDimension { .. })
        ));
    }

    #[test]
    fn merge_requires_exact_selection() {
        let mut grid = grid(3, 3);
        select(&mut grid, &[(0, 0), (0, 1)]);
        assert!(!grid.is_valid_merge(0, 0, 2, 2));
        assert_eq!(grid.merge_cells(0, 0, 2, 2, true), Err(GridError::SelectionMismatch));

        select(&mut grid, &[(1, 0), (1, 1), (2, 2)]);
        assert!(!grid.is_valid_merge(0, 0, 2, 2));

        grid.set_selected(2, 2, false).unwrap();
        assert!(grid.is_valid_merge(0, 0, 2, 2));
        assert!(!grid.is_valid_merge(2, 2, 2, 2));
    }

    #[test]
    fn merge_keeps_anchor_content() {
        let mut grid = grid(2, 2);
        let anchor = grid.cell_at_mut(0, 0).unwrap();
        anchor.set_image(Tile("cat"));
        anchor.caption.top_caption = "HELLO".into();
        let anchor_id = anchor.id();

        grid.merge_cells(0, 0, 1, 2, false).unwrap();
        let merged = grid.cell_at(0, 1).unwrap();
        assert_eq!(merged.id(), anchor_id);
        assert_eq!(merged.image(), Some(&Tile("cat")));
        assert_eq!(merged.caption.top_caption, "HELLO");
        assert_eq!((merged.row_span(), merged.col_span()), (1, 2));
        assert_eq!(grid.cell_count(), 3);
        assert_eq!(grid.merged_cells().get(&(0, 0)), Some(&(1, 2)));
    }

    #[test]
    fn merge_rejects_partial_overlap_atomically() {
        let mut grid = grid(3, 3);
        grid.merge_cells(0, 1, 2, 2, false).unwrap();
        assert_eq!(
            grid.merge_cells(0, 0, 1, 2, false),
            Err(GridError::PartialOverlap { row: 0, column: 1 })
        );
        assert_eq!(
            grid.merge_cells(1, 1, 2, 2, false),
            Err(GridError::NotMergeAnchor { row: 1, column: 1 })
        );
        assert_eq!(grid.cell_count(), 6);
        assert_eq!(grid.merged_cells().len(), 1);
    }

    #[test]
    fn merge_absorbs_contained_blocks() {
        let mut grid = grid(3, 3);
        grid.merge_cells(1, 1, 2, 2, false).unwrap();
        grid.merge_cells(0, 0, 3, 3, false).unwrap();
        assert_eq!(grid.cell_count(), 1);
        assert_eq!(grid.merged_cells().len(), 1);
        assert_eq!(grid.merged_cells().get(&(0, 0)), Some(&(3, 3)));
    }

    #[test]
    fn merge_rejects_single_cell_and_out_of_bounds() {
        let mut grid = grid(2, 2);
        assert!(matches!(grid.merge_cells(0, 0, 1, 1, false), Err(GridError::InvalidSpan { .. })));
        assert!(matches!(grid.merge_cells(1, 1, 2, 1, false), Err(GridError::OutOfBounds { .. })));
    }

    #[test]
    fn split_moves_content_to_anchor_unit() {
        let mut grid = grid(2, 2);
        select(&mut grid, &[(0, 0), (0, 1), (1, 0), (1, 1)]);
        assert_eq!(grid.merge_selected(), Ok((0, 0, 2, 2)));
        let cell = grid.cell_at_mut(0, 0).unwrap();
        cell.set_image(Tile("dog"));
        cell.caption.bottom_caption = "BOTTOM".into();
        let merged_id = cell.id();

        grid.split_cells(0, 0).unwrap();
        assert_eq!(grid.cell_count(), 4);
        assert!(grid.merged_cells().is_empty());
        let anchor = grid.cell_at(0, 0).unwrap();
        assert_ne!(anchor.id(), merged_id);
        assert_eq!(anchor.image(), Some(&Tile("dog")));
        assert_eq!(anchor.caption.bottom_caption, "BOTTOM");
        assert!(anchor.selected);
        let other = grid.cell_at(1, 1).unwrap();
        assert!(other.image().is_none());
        assert!(!other.selected);
    }

    #[test]
    fn split_without_merge_fails() {
        let mut grid = grid(2, 2);
        assert_eq!(grid.split_cells(0, 0), Err(GridError::NotMerged { row: 0, column: 0 }));
    }

    #[test]
    fn update_grid_keeps_fitting_merges_and_content() {
        let mut grid = grid(3, 3);
        grid.merge_cells(0, 0, 2, 2, false).unwrap();
        grid.merge_cells(1, 2, 2, 1, false).unwrap();
        grid.cell_at_mut(0, 0).unwrap().set_image(Tile("a"));
        grid.cell_at_mut(2, 0).unwrap().set_image(Tile("b"));
        grid.cell_at_mut(1, 2).unwrap().set_image(Tile("c"));

        grid.update_grid(2, 3).unwrap();
        assert_eq!((grid.rows(), grid.columns()), (2, 3));
        assert_eq!(grid.merged_cells().get(&(0, 0)), Some(&(2, 2)));
        assert!(!grid.merged_cells().contains_key(&(1, 2)));
        assert_eq!(grid.cell_at(1, 1).unwrap().image(), Some(&Tile("a")));
        assert_eq!(grid.cell_at(1, 2).unwrap().image(), Some(&Tile("c")));
        assert!(grid.cells().all(|(_, cell)| cell.image() != Some(&Tile("b"))));
    }

    #[test]
    fn selected_rectangle_needs_filled_rectangle() {
        let mut grid = grid(3, 3);
        grid.set_selected(0, 0, true).unwrap();
        assert_eq!(grid.selected_rectangle(), None);
        select(&mut grid, &[(1, 1)]);
        assert_eq!(grid.selected_rectangle(), None);
        select(&mut grid, &[(0, 1), (1, 0)]);
        assert_eq!(grid.selected_rectangle(), Some((0, 0, 2, 2)));
        grid.clear_selection();
        assert_eq!(grid.merge_selected(), Err(GridError::NoRectangularSelection));
    }

    #[test]
    fn lone_merged_block_is_not_a_selection() {
        let mut grid = grid(3, 3);
        grid.merge_cells(0, 0, 2, 2, false).unwrap();
        grid.set_selected(1, 1, true).unwrap();
        assert_eq!(grid.selected_positions().len(), 4);
        assert_eq!(grid.selected_rectangle(), None);
        assert_eq!(grid.merge_selected(), Err(GridError::NoRectangularSelection));

        grid.set_selected(2, 0, true).unwrap();
        grid.set_selected(2, 1, true).unwrap();
        assert_eq!(grid.selected_rectangle(), Some((0, 0, 3, 2)));
    }

    #[test]
    fn overflowing_spans_are_rejected() {
        let mut grid = grid(2, 2);
        assert_eq!(
            grid.merge_cells(0, 0, usize::MAX, 2, false),
            Err(GridError::InvalidSpan {
                row_span: usize::MAX,
                col_span: 2
            })
        );
        assert!(matches!(
            grid.merge_cells(1, 0, usize::MAX, 1, false),
            Err(GridError::OutOfBounds { .. })
        ));
        assert!(!grid.is_valid_merge(usize::MAX, 0, 2, 1));
        assert!(grid.merged_cells().is_empty());
        assert_eq!(
            CollageGrid::<Tile>::new(usize::MAX, 2).err(),
            Some(GridError::InvalidDimension {
                rows: usize::MAX,
                columns: 2
            })
        );
    }

    #[test]
    fn stale_encoded_payloads_are_dropped() {
        let mut grid = grid(1, 2);
        let cell = grid.cell_at_mut(0, 0).unwrap();
        cell.set_image(Tile("x"));
        let (token, _) = grid.pending_encodes().remove(0);

        grid.cell_at_mut(0, 0).unwrap().set_image(Tile("y"));
        assert!(!grid.accept_encoded_payload(token, Some("old".into())));
        assert!(grid.cell_at(0, 0).unwrap().autosave_payload().is_none());

        let (fresh, image) = grid.pending_encodes().remove(0);
        assert_eq!(image, Tile("y"));
        assert!(grid.accept_encoded_payload(fresh, Some("new".into())));
        assert_eq!(grid.cell_at(0, 0).unwrap().autosave_payload(), Some("new"));
        assert!(grid.pending_encodes().is_empty());
    }

    #[test]
    fn swap_content_exchanges_images_and_captions() {
        let mut grid = grid(1, 2);
        grid.cell_at_mut(0, 0).unwrap().set_image(Tile("left"));
        grid.cell_at_mut(0, 0).unwrap().caption.caption = "L".into();
        let before = grid.cell_at(0, 1).unwrap().generation();

        grid.swap_content((0, 0), (0, 1)).unwrap();
        assert!(grid.cell_at(0, 0).unwrap().image().is_none());
        assert_eq!(grid.cell_at(0, 1).unwrap().image(), Some(&Tile("left")));
        assert_eq!(grid.cell_at(0, 1).unwrap().caption.caption, "L");
        assert!(grid.cell_at(0, 1).unwrap().generation() > before);
    }

    #[test]
    fn clear_resets_merges_and_content() {
        let mut grid = grid(2, 2);
        grid.merge_cells(0, 0, 2, 2, false).unwrap();
        grid.cell_at_mut(0, 0).unwrap().set_image(Tile("z"));
        grid.clear();
        assert_eq!(grid.cell_count(), 4);
        assert!(grid.merged_cells().is_empty());
        assert!(grid.cells().all(|(_, cell)| cell.image().is_none()));
    }
}
