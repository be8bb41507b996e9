//! Workspace autosave to disk and restore

use std::sync::Arc;
use std::time::Duration;

use collage_core::autosave::{
    AUTOSAVE_PREFIX, AutosaveEvent, AutosaveManager, AutosaveScheduler, DirectoryStore,
    SessionSnapshot,
};
use collage_core::codec::{PngCodec, RasterImage};
use collage_core::controls::CaptionDefaults;
use collage_core::history::{SessionController, StateAdapter};
use collage_core::workspace::CollageWorkspace;
use image::{DynamicImage, Rgba, RgbaImage};
use tempfile::TempDir;

fn no_sleep(_: Duration) {}

fn square(color: [u8; 4]) -> RasterImage {
    RasterImage::new(DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba(color))))
}

fn manager(dir: &TempDir) -> AutosaveManager<DirectoryStore> {
    AutosaveManager::new(DirectoryStore::new(dir.path().join("autosave"))).with_sleep(no_sleep)
}

fn edited_workspace() -> CollageWorkspace<PngCodec> {
    let mut ws = CollageWorkspace::new(3, 3, PngCodec).unwrap();
    ws.grid_mut().merge_cells(0, 0, 2, 2, false).unwrap();
    let anchor = ws.grid_mut().cell_at_mut(0, 0).unwrap();
    anchor.set_image(square([255, 0, 0, 255]));
    anchor.caption.top_caption = "TOP".into();
    ws.grid_mut()
        .cell_at_mut(2, 2)
        .unwrap()
        .set_image(square([0, 0, 255, 255]));
    ws.set_caption_defaults(CaptionDefaults {
        font_size: 20,
        ..CaptionDefaults::default()
    });
    ws
}

#[test]
fn workspace_survives_save_and_load_from_disk() {
    let dir = TempDir::new().unwrap();
    let manager = manager(&dir);
    let ws = edited_workspace();

    let name = manager.perform_autosave(&ws.snapshot()).unwrap();
    assert!(name.starts_with(AUTOSAVE_PREFIX));
    assert!(dir.path().join("autosave").join(&name).is_file());

    let loaded: SessionSnapshot = manager.load_latest().unwrap().unwrap();
    let mut restored = CollageWorkspace::new(1, 1, PngCodec).unwrap();
    restored.restore(&loaded).unwrap();

    assert_eq!(restored.snapshot(), ws.snapshot());
    assert_eq!(restored.grid().merged_cells().get(&(0, 0)), Some(&(2, 2)));
    let anchor = restored.grid().cell_at(1, 1).unwrap();
    assert_eq!(anchor.caption.top_caption, "TOP");
    assert_eq!(anchor.image().map(RasterImage::dimensions), Some((4, 4)));
    assert_eq!(restored.captions().font_size, 20);
}

#[test]
fn retention_applies_to_real_directory() {
    let dir = TempDir::new().unwrap();
    let manager = manager(&dir).with_max_files(2);
    let ws = CollageWorkspace::new(2, 2, PngCodec).unwrap();

    for _ in 0..4 {
        manager.perform_autosave(&ws.snapshot()).unwrap();
    }
    manager.write_recovery(&ws.snapshot()).unwrap();

    assert_eq!(manager.autosaves().unwrap().len(), 2);
    assert_eq!(manager.recoveries().unwrap().len(), 1);
}

#[test]
fn restored_session_has_fresh_history() {
    let dir = TempDir::new().unwrap();
    let manager = manager(&dir);
    manager.perform_autosave(&edited_workspace().snapshot()).unwrap();

    let mut session = SessionController::new(CollageWorkspace::new(2, 2, PngCodec).unwrap());
    let loaded: SessionSnapshot = manager.load_latest().unwrap().unwrap();
    session.restore_state(&loaded.to_state_tree().unwrap()).unwrap();
    session.reset_history();

    assert!(!session.can_undo());
    assert_eq!(session.adapter().grid().rows(), 3);
    assert_eq!(session.baseline(), &session.current_state());
}

#[test]
fn corrupt_file_is_reported_not_restored() {
    let dir = TempDir::new().unwrap();
    let manager = manager(&dir);
    let name = manager.perform_autosave(&edited_workspace().snapshot()).unwrap();
    std::fs::write(dir.path().join("autosave").join(&name), "{ not json").unwrap();

    assert!(manager.load::<SessionSnapshot>(&name).is_err());
}

#[tokio::test]
async fn scheduler_writes_periodic_snapshots() {
    let dir = TempDir::new().unwrap();
    let manager = Arc::new(manager(&dir));
    let state = edited_workspace().read_state();

    let (scheduler, mut events) =
        AutosaveScheduler::start(Arc::clone(&manager), Duration::from_millis(20), move || {
            Some(state.clone())
        });

    let event = tokio::time::timeout(Duration::from_secs(5), events.recv())
        .await
        .unwrap()
        .unwrap();
    let name = match event {
        AutosaveEvent::Saved(name) => name,
        other => panic!("unexpected event {other:?}"),
    };
    scheduler.shutdown().await;

    let loaded: SessionSnapshot = manager.load(&name).unwrap();
    assert_eq!(loaded.collage.rows, 3);
}
