//! Repeated errors trigger a recovery snapshot that can be restored

use std::time::{Duration, Instant};

use collage_core::autosave::{AutosaveManager, DirectoryStore, RECOVERY_PREFIX, SessionSnapshot};
use collage_core::codec::PngCodec;
use collage_core::grid::GridError;
use collage_core::history::SessionController;
use collage_core::recovery::{ErrorRecoveryMonitor, RecoverySettings};
use collage_core::workspace::CollageWorkspace;
use tempfile::TempDir;

fn no_sleep(_: Duration) {}

#[test]
fn failing_edits_trigger_recovery_and_reset() {
    let dir = TempDir::new().unwrap();
    let manager = AutosaveManager::new(DirectoryStore::new(dir.path())).with_sleep(no_sleep);
    let mut monitor = ErrorRecoveryMonitor::new(&RecoverySettings {
        error_threshold: 3,
        window_secs: 60,
    });
    let mut session = SessionController::new(CollageWorkspace::new(3, 3, PngCodec).unwrap());
    session
        .edit(|ws| ws.grid_mut().merge_cells(0, 0, 2, 3, false))
        .unwrap();
    session
        .edit(|ws| {
            ws.grid_mut().cell_at_mut(2, 1).unwrap().caption.caption = "keep me".into();
            Ok::<_, GridError>(())
        })
        .unwrap();

    let start = Instant::now();
    let mut recovered = None;
    for i in 0..3u64 {
        let failed = session.edit(|ws| ws.grid_mut().merge_cells(1, 1, 2, 2, false));
        let err = failed.unwrap_err();
        assert!(matches!(err, GridError::NotMergeAnchor { .. }));
        assert_eq!(session.undo_depth(), 2, "failed edits are not recorded");

        let snapshot = session.adapter().snapshot();
        let mut reset = false;
        let outcome = monitor.report_error_at(
            start + Duration::from_secs(i),
            &err,
            &manager,
            &snapshot,
            || reset = true,
        );
        if let Some(written) = outcome {
            assert!(reset);
            recovered = Some(written.unwrap());
        }
    }

    let name = recovered.expect("third error should trigger recovery");
    assert!(name.starts_with(RECOVERY_PREFIX));
    assert!(manager.autosaves().unwrap().is_empty());
    assert_eq!(monitor.error_count(start + Duration::from_secs(3)), 0);

    let snapshot: SessionSnapshot = manager.load(&name).unwrap();
    let mut fresh = CollageWorkspace::new(1, 1, PngCodec).unwrap();
    fresh.restore(&snapshot).unwrap();
    assert_eq!(fresh.grid().merged_cells().get(&(0, 0)), Some(&(2, 3)));
    assert_eq!(fresh.grid().cell_at(2, 1).unwrap().caption.caption, "keep me");
}

#[test]
fn sparse_errors_never_recover() {
    let dir = TempDir::new().unwrap();
    let manager = AutosaveManager::new(DirectoryStore::new(dir.path())).with_sleep(no_sleep);
    let mut monitor = ErrorRecoveryMonitor::new(&RecoverySettings {
        error_threshold: 2,
        window_secs: 10,
    });
    let start = Instant::now();
    for i in 0..5u64 {
        let outcome = monitor.report_error_at(
            start + Duration::from_secs(i * 20),
            &"render failed",
            &manager,
            &serde_json::json!({}),
            || panic!("no reset expected"),
        );
        assert!(outcome.is_none());
    }
    assert!(manager.recoveries().unwrap().is_empty());
}
