//! Autosave and crash recovery
//!
//! This module turns the live grid into JSON snapshots and back:
//!
//! - [`SessionSnapshot`]: the on-disk snapshot format
//! - [`SnapshotStore`]: where snapshots live (a directory, or memory)
//! - [`AutosaveManager`]: timestamped writes with retry, retention and recovery files
//! - [`AutosaveScheduler`]: a tokio task that saves on an interval
//! - [`AutosaveEncoder`]: background image encoding with stale-result rejection

mod encoder;
mod error;
mod manager;
mod retry;
mod scheduler;
mod state;
mod store;

pub use encoder::{AutosaveEncoder, EncodedPayload};
pub use error::{AutosaveError, AutosaveResult};
pub use manager::{
    AUTOSAVE_PREFIX, AutosaveManager, DEFAULT_INTERVAL, DEFAULT_MAX_FILES, RECOVERY_PREFIX,
};
pub use retry::{
    DEFAULT_BACKOFF_MULTIPLIER, DEFAULT_INITIAL_DELAY_MS, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_MAX_DELAY_MS, RetryConfig, RetryState, retry_with_backoff,
};
pub use scheduler::{AutosaveEvent, AutosaveScheduler};
pub use state::{CellAutosaveState, CollageAutosaveState, MergedCellState, SessionSnapshot};
pub use store::{DirectoryStore, MemoryStore, SnapshotStore};
