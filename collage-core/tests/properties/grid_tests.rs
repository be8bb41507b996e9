//! Property tests for the live collage grid

use collage_core::codec::RasterImage;
use collage_core::grid::{CollageGrid, GridError};
use proptest::prelude::*;

type Grid = CollageGrid<RasterImage>;

#[derive(Debug, Clone)]
enum Op {
    Merge(usize, usize, usize, usize),
    MergeSelected(Vec<(usize, usize)>),
    Split(usize, usize),
    Resize(usize, usize),
    Caption(usize, usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..5, 0usize..5, 1usize..4, 1usize..4).prop_map(|(r, c, rs, cs)| Op::Merge(r, c, rs, cs)),
        proptest::collection::vec((0usize..5, 0usize..5), 2..6).prop_map(Op::MergeSelected),
        (0usize..5, 0usize..5).prop_map(|(r, c)| Op::Split(r, c)),
        (1usize..6, 1usize..6).prop_map(|(r, c)| Op::Resize(r, c)),
        (0usize..5, 0usize..5).prop_map(|(r, c)| Op::Caption(r, c)),
    ]
}

fn apply(grid: &mut Grid, op: &Op, counter: &mut usize) -> Result<(), GridError> {
    match op {
        Op::Merge(r, c, rs, cs) => grid.merge_cells(*r, *c, *rs, *cs, false),
        Op::MergeSelected(positions) => {
            grid.clear_selection();
            for &(r, c) in positions {
                grid.set_selected(r, c, true)?;
            }
            grid.merge_selected().map(|_| ())
        }
        Op::Split(r, c) => grid.split_cells(*r, *c),
        Op::Resize(rows, columns) => grid.update_grid(*rows, *columns),
        Op::Caption(r, c) => {
            *counter += 1;
            let cell = grid
                .cell_at_mut(*r, *c)
                .ok_or(GridError::PositionOutOfBounds { row: *r, column: *c })?;
            cell.caption.caption = format!("caption {counter}");
            Ok(())
        }
    }
}

/// Every position is covered by exactly one anchor and spans add up.
fn assert_covered(grid: &Grid) -> Result<(), TestCaseError> {
    let mut area = 0;
    for ((r, c), cell) in grid.cells() {
        prop_assert!(r + cell.row_span() <= grid.rows());
        prop_assert!(c + cell.col_span() <= grid.columns());
        area += cell.row_span() * cell.col_span();
    }
    prop_assert_eq!(area, grid.rows() * grid.columns());
    for r in 0..grid.rows() {
        for c in 0..grid.columns() {
            prop_assert!(grid.anchor_of(r, c).is_some(), "({}, {}) uncovered", r, c);
        }
    }
    for (&(r, c), &(rs, cs)) in grid.merged_cells() {
        let cell = grid.cell_at(r, c).unwrap();
        prop_assert_eq!((cell.row_span(), cell.col_span()), (rs, cs));
    }
    Ok(())
}

proptest! {
    /// Property: merges, splits and resizes never leave gaps or overlaps
    #[test]
    fn grid_stays_covered(
        rows in 1usize..5,
        columns in 1usize..5,
        ops in proptest::collection::vec(op_strategy(), 0..25),
    ) {
        let mut grid = Grid::new(rows, columns).unwrap();
        let mut counter = 0;
        for op in &ops {
            let _ = apply(&mut grid, op, &mut counter);
            assert_covered(&grid)?;
        }
    }

    /// Property: cell ids stay unique
    #[test]
    fn cell_ids_are_unique(ops in proptest::collection::vec(op_strategy(), 0..25)) {
        let mut grid = Grid::new(3, 3).unwrap();
        let mut counter = 0;
        for op in &ops {
            let _ = apply(&mut grid, op, &mut counter);
            let ids: std::collections::BTreeSet<_> = grid.cells().map(|(_, cell)| cell.id()).collect();
            prop_assert_eq!(ids.len(), grid.cell_count());
        }
    }

    /// Property: growing the grid keeps every caption where it was
    #[test]
    fn growing_keeps_content(
        rows in 1usize..4,
        columns in 1usize..4,
        extra_rows in 0usize..3,
        extra_columns in 0usize..3,
    ) {
        let mut grid = Grid::new(rows, columns).unwrap();
        for r in 0..rows {
            for c in 0..columns {
                grid.cell_at_mut(r, c).unwrap().caption.caption = format!("{r}/{c}");
            }
        }
        grid.update_grid(rows + extra_rows, columns + extra_columns).unwrap();
        for r in 0..rows {
            for c in 0..columns {
                prop_assert_eq!(&grid.cell_at(r, c).unwrap().caption.caption, &format!("{r}/{c}"));
            }
        }
    }

    /// Property: a merge rejected for partial overlap changes nothing
    #[test]
    fn rejected_merge_is_atomic(
        r in 0usize..3,
        c in 0usize..3,
        rs in 1usize..4,
        cs in 1usize..4,
    ) {
        let mut grid = Grid::new(4, 4).unwrap();
        grid.merge_cells(1, 1, 2, 2, false).unwrap();
        let before: Vec<_> = grid.cells().map(|(pos, cell)| (pos, cell.id(), cell.row_span(), cell.col_span())).collect();
        if grid.merge_cells(r, c, rs, cs, false).is_err() {
            let after: Vec<_> = grid.cells().map(|(pos, cell)| (pos, cell.id(), cell.row_span(), cell.col_span())).collect();
            prop_assert_eq!(before, after);
        }
    }
}

#[test]
fn selected_rectangle_requires_filled_footprint() {
    let mut grid = Grid::new(3, 3).unwrap();
    grid.set_selected(0, 0, true).unwrap();
    grid.set_selected(1, 1, true).unwrap();
    assert_eq!(grid.selected_rectangle(), None);
    assert_eq!(grid.merge_selected(), Err(GridError::NoRectangularSelection));

    grid.set_selected(0, 1, true).unwrap();
    grid.set_selected(1, 0, true).unwrap();
    assert_eq!(grid.selected_rectangle(), Some((0, 0, 2, 2)));
    assert_eq!(grid.merge_selected(), Ok((0, 0, 2, 2)));
}
