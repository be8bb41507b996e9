//! Property tests for the autosave snapshot format

use std::sync::atomic::{AtomicUsize, Ordering};

use collage_core::autosave::{CellAutosaveState, CollageAutosaveState, SessionSnapshot};
use collage_core::codec::{CellImage, ImageCodec};
use collage_core::grid::{CollageCell, CollageGrid, Rgba};
use collage_core::layout::CellId;
use proptest::prelude::*;

#[derive(Debug, Clone, PartialEq)]
struct Tile(String);

impl CellImage for Tile {
    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Stores the tile name as the payload and counts encodes.
#[derive(Debug, Default)]
struct CountingCodec {
    encodes: AtomicUsize,
}

impl ImageCodec for CountingCodec {
    type Image = Tile;

    fn encode(&self, image: &Tile) -> Option<String> {
        self.encodes.fetch_add(1, Ordering::SeqCst);
        Some(format!("tile:{}", image.0))
    }

    fn decode(&self, payload: &str) -> Option<Tile> {
        payload.strip_prefix("tile:").map(|name| Tile(name.to_string()))
    }
}

fn rgba() -> impl Strategy<Value = Option<Rgba>> {
    proptest::option::of(any::<[u8; 4]>().prop_map(Rgba))
}

prop_compose! {
    fn cell_state()(
        position in (0usize..8, 0usize..8, 1usize..4, 1usize..4),
        image in proptest::option::of("[A-Za-z0-9+/]{0,24}"),
        captions in ("[ -~]{0,16}", "[ -~]{0,16}", "\\PC{0,16}"),
        shows in any::<(bool, bool)>(),
        font in "[A-Za-z ]{0,12}",
        sizes in (0u32..200, 0u32..200, 0u32..20, 0u32..200),
        flags in any::<(bool, bool, bool, bool, bool)>(),
        colors in (rgba(), rgba()),
        margin in 0.0f64..0.5,
        modes in (proptest::option::of(0i64..2), proptest::option::of(0i64..3)),
    ) -> CellAutosaveState {
        CellAutosaveState {
            row: position.0,
            column: position.1,
            row_span: position.2,
            col_span: position.3,
            has_image: image.is_some(),
            image,
            caption: captions.0,
            top_caption: captions.1,
            bottom_caption: captions.2,
            show_top_caption: shows.0,
            show_bottom_caption: shows.1,
            caption_font_family: font,
            caption_min_size: sizes.0,
            caption_max_size: sizes.1,
            caption_uppercase: flags.0,
            caption_stroke_width: sizes.2,
            caption_stroke_color: colors.0,
            caption_fill_color: colors.1,
            caption_safe_margin_ratio: margin,
            caption_font_size: sizes.3,
            caption_bold: flags.1,
            caption_italic: flags.2,
            caption_underline: flags.3,
            transformation_mode: modes.0,
            aspect_ratio_mode: modes.1,
            selected: flags.4,
        }
    }
}

proptest! {
    /// Property: a cell record survives conversion to a JSON tree and back
    #[test]
    fn cell_state_round_trips(state in cell_state()) {
        let tree = serde_json::to_value(&state).unwrap();
        let back: CellAutosaveState = serde_json::from_value(tree).unwrap();
        prop_assert_eq!(back, state);
    }

    /// Property: a cached payload is reused and the codec is not called
    #[test]
    fn cached_payload_skips_encoder(name in "[a-z]{1,8}", cached in "[A-Za-z0-9]{1,16}") {
        let codec = CountingCodec::default();
        let mut cell: CollageCell<Tile> = CollageCell::new(CellId(1));
        cell.set_image(Tile(name));
        cell.set_autosave_payload(Some(cached.clone()));

        let state = CellAutosaveState::from_cell(&cell, 0, 0, &codec);
        prop_assert_eq!(state.image.as_deref(), Some(cached.as_str()));
        prop_assert!(state.has_image);
        prop_assert_eq!(codec.encodes.load(Ordering::SeqCst), 0);
    }

    /// Property: restoring a grid snapshot and capturing it again gives the same snapshot
    #[test]
    fn grid_snapshot_restores_identically(
        rows in 1usize..5,
        columns in 1usize..5,
        merge in proptest::option::of((0usize..4, 0usize..4, 1usize..3, 1usize..3)),
        tiles in proptest::collection::vec(proptest::option::of("[a-z]{1,6}"), 16),
        captions in proptest::collection::vec("[a-z ]{0,10}", 16),
    ) {
        let codec = CountingCodec::default();
        let mut grid: CollageGrid<Tile> = CollageGrid::new(rows, columns).unwrap();
        if let Some((r, c, rs, cs)) = merge {
            let _ = grid.merge_cells(r, c, rs, cs, false);
        }
        for (i, (_, cell)) in grid.cells_mut().enumerate() {
            if let Some(name) = &tiles[i] {
                cell.set_image(Tile(name.clone()));
            }
            cell.caption.caption.clone_from(&captions[i]);
        }

        let saved = CollageAutosaveState::from_grid(&grid, &codec);
        let restored = saved.restore_grid(&codec).unwrap();
        prop_assert_eq!(restored.merged_cells(), grid.merged_cells());
        prop_assert_eq!(CollageAutosaveState::from_grid(&restored, &codec), saved);
    }
}

#[test]
fn image_change_drops_cached_payload() {
    let codec = CountingCodec::default();
    let mut cell: CollageCell<Tile> = CollageCell::new(CellId(1));
    cell.set_image(Tile("old".into()));
    cell.set_autosave_payload(Some("tile:old".into()));
    cell.set_image(Tile("new".into()));

    let state = CellAutosaveState::from_cell(&cell, 0, 0, &codec);
    assert_eq!(state.image.as_deref(), Some("tile:new"));
    assert_eq!(codec.encodes.load(Ordering::SeqCst), 1);
}

#[test]
fn missing_keys_fall_back_to_defaults() {
    let snapshot = SessionSnapshot::from_json(r#"{"collage":{"rows":2,"columns":2,"cells":[{"caption":"hi"}]}}"#).unwrap();
    let cell = &snapshot.collage.cells[0];
    assert_eq!((cell.row, cell.column, cell.row_span, cell.col_span), (0, 0, 1, 1));
    assert!(cell.show_top_caption && cell.show_bottom_caption);
    assert_eq!(cell.caption, "hi");
    assert_eq!(cell.transformation_mode, None);
}

#[test]
fn structurally_broken_snapshot_is_rejected() {
    assert!(SessionSnapshot::from_json(r#"{"collage":{"cells":"nope"}}"#).is_err());
}
