//! Property tests for the positional layout manager

use collage_core::layout::{AspectSettings, CellId, GridLayoutManager, LayoutError, Ratio};
use proptest::prelude::*;

/// One random edit
#[derive(Debug, Clone)]
enum Op {
    Merge {
        row: usize,
        column: usize,
        height: usize,
        width: usize,
    },
    Split {
        pick: usize,
        rows: usize,
        cols: usize,
    },
    Resize {
        pick: usize,
        row_span: usize,
        col_span: usize,
    },
    Aspect {
        pick: usize,
        ratio: Option<(u32, u32)>,
    },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..5, 0usize..5, 1usize..4, 1usize..4).prop_map(|(row, column, height, width)| Op::Merge {
            row,
            column,
            height,
            width
        }),
        (any::<usize>(), 1usize..3, 1usize..3).prop_map(|(pick, rows, cols)| Op::Split { pick, rows, cols }),
        (any::<usize>(), 1usize..4, 1usize..4).prop_map(|(pick, row_span, col_span)| Op::Resize {
            pick,
            row_span,
            col_span
        }),
        (any::<usize>(), proptest::option::of((1u32..20, 1u32..20)))
            .prop_map(|(pick, ratio)| Op::Aspect { pick, ratio }),
    ]
}

fn pick_id(mgr: &GridLayoutManager, pick: usize) -> CellId {
    let cells = mgr.sorted_cells();
    cells[pick % cells.len()].id
}

fn apply(mgr: &mut GridLayoutManager, op: &Op) -> Result<(), LayoutError> {
    match *op {
        Op::Merge {
            row,
            column,
            height,
            width,
        } => {
            let positions: Vec<_> = (row..row + height)
                .flat_map(|r| (column..column + width).map(move |c| (r, c)))
                .collect();
            mgr.merge(&positions).map(|_| ())
        }
        Op::Split { pick, rows, cols } => {
            let id = pick_id(mgr, pick);
            mgr.split(id, rows, cols).map(|_| ())
        }
        Op::Resize {
            pick,
            row_span,
            col_span,
        } => {
            let id = pick_id(mgr, pick);
            mgr.resize(id, row_span, col_span)
        }
        Op::Aspect { pick, ratio } => {
            let id = pick_id(mgr, pick);
            let settings = match ratio {
                Some((w, h)) => AspectSettings::fixed(Ratio::new(w, h)?),
                None => AspectSettings::free(),
            };
            mgr.set_aspect(id, settings)
        }
    }
}

proptest! {
    /// Property: every position stays covered by exactly one cell
    #[test]
    fn coverage_holds_after_random_edits(
        rows in 1usize..5,
        columns in 1usize..5,
        ops in proptest::collection::vec(op_strategy(), 0..25),
    ) {
        let mut mgr = GridLayoutManager::new(rows, columns).unwrap();
        for op in &ops {
            let before = mgr.to_json().unwrap();
            if apply(&mut mgr, op).is_err() {
                prop_assert_eq!(mgr.to_json().unwrap(), before, "failed {:?} changed the layout", op);
            }
            prop_assert!(mgr.check_coverage().is_ok(), "coverage broken after {:?}", op);
        }
    }

    /// Property: undo restores the previous document and redo reproduces it
    #[test]
    fn undo_then_redo_is_identity(
        ops in proptest::collection::vec(op_strategy(), 1..15),
    ) {
        let mut mgr = GridLayoutManager::new(4, 4).unwrap();
        for op in &ops {
            let before = mgr.to_json().unwrap();
            if apply(&mut mgr, op).is_ok() {
                let after = mgr.to_json().unwrap();
                mgr.undo().unwrap();
                prop_assert_eq!(mgr.to_json().unwrap(), before);
                mgr.redo().unwrap();
                prop_assert_eq!(mgr.to_json().unwrap(), after);
            }
        }
    }

    /// Property: the JSON document survives a parse and re-serialize
    #[test]
    fn json_round_trip_is_stable(
        ops in proptest::collection::vec(op_strategy(), 0..15),
        gutter in 0u32..20,
        padding in 0u32..20,
    ) {
        let mut mgr = GridLayoutManager::with_spacing(4, 3, gutter, padding).unwrap();
        for op in &ops {
            let _ = apply(&mut mgr, op);
        }
        let json = mgr.to_json().unwrap();
        let restored = GridLayoutManager::from_json(&json).unwrap();
        prop_assert_eq!(restored.to_json().unwrap(), json);
        prop_assert_eq!(restored.gutter(), gutter);
        prop_assert_eq!(restored.padding(), padding);
    }

    /// Property: ids are never reused, even after undo
    #[test]
    fn ids_are_never_reused(ops in proptest::collection::vec(op_strategy(), 1..20)) {
        let mut mgr = GridLayoutManager::new(3, 3).unwrap();
        let mut seen: std::collections::BTreeSet<CellId> = mgr.cells().iter().map(|c| c.id).collect();
        for op in &ops {
            let before: std::collections::BTreeSet<CellId> = mgr.cells().iter().map(|c| c.id).collect();
            if apply(&mut mgr, op).is_ok() {
                for cell in mgr.cells() {
                    if !before.contains(&cell.id) {
                        prop_assert!(seen.insert(cell.id), "id {} reused", cell.id);
                    }
                }
                mgr.undo().unwrap();
                mgr.redo().unwrap();
            }
        }
    }
}

#[test]
fn merge_split_and_undo_back_to_start() {
    let mut mgr = GridLayoutManager::new(3, 3).unwrap();
    let original = mgr.to_json().unwrap();

    let merged = mgr.merge(&[(0, 0), (0, 1), (1, 0), (1, 1)]).unwrap();
    assert_eq!(mgr.cells().len(), 6);
    mgr.split(merged, 2, 2).unwrap();
    assert_eq!(mgr.cells().len(), 9);
    assert!(mgr.cells().iter().all(|c| c.row_span == 1 && c.col_span == 1));

    // Merge and split are one history entry each: two undos reach the
    // original layout and the third undo reports NothingToUndo.
    mgr.undo().unwrap();
    mgr.undo().unwrap();
    assert_eq!(mgr.undo(), Err(LayoutError::NothingToUndo));
    assert_eq!(mgr.to_json().unwrap(), original);
}

#[test]
fn round_trip_with_merge_resize_and_fixed_aspect() {
    let mut mgr = GridLayoutManager::with_spacing(3, 3, 4, 8).unwrap();
    let block = mgr.merge(&[(0, 0), (0, 1), (1, 0), (1, 1)]).unwrap();
    mgr.resize(block, 1, 2).unwrap();
    assert_eq!(mgr.cells().len(), 8);
    let corner = mgr.cell_at(2, 2).unwrap().id;
    mgr.set_aspect(corner, AspectSettings::fixed("16:9".parse().unwrap()))
        .unwrap();

    let json = mgr.to_json().unwrap();
    assert!(json.contains("\"16:9\""));
    let restored = GridLayoutManager::from_json(&json).unwrap();
    assert_eq!(restored.to_json().unwrap(), json);
}

#[test]
fn malformed_ratio_is_rejected_on_load() {
    let json = r#"{"cells":[{"id":0,"row":0,"column":0,"aspectMode":"fixed","ratio":"16/9"}]}"#;
    assert!(GridLayoutManager::from_json(json).is_err());
}
