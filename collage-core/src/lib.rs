//! Collage Maker Core Library
//!
//! Grid layout engine behind the collage editor: rectangular grids of
//! cells that can be merged, split and resized, with snapshot-based undo
//! and crash-safe autosave.
//!
//! # Crate Structure
//!
//! - [`layout`] - Positional layout manager (cell ids, spans, aspect settings, JSON)
//! - [`grid`] - Live grid driven by selection, with image and caption content
//! - [`history`] - Undo/redo over whole-state snapshots
//! - [`autosave`] - Snapshot format, storage, retention, scheduling and background encoding
//! - [`workspace`] - Grid, controls and caption defaults bundled as one undoable session
//! - [`recovery`] - Repeated-error detection that writes recovery snapshots
//! - [`codec`] - Image payload encoding (PNG + base64)
//! - [`controls`] / [`template`] - Control panel state, caption defaults and grid templates
//! - [`config`] - `config.toml` settings
//! - [`tracing`] - Logging setup and span/field names
//! - [`error`] - Crate-wide error aggregate

#![warn(missing_docs)]

pub mod autosave;
pub mod codec;
pub mod config;
pub mod controls;
pub mod error;
pub mod grid;
pub mod history;
pub mod layout;
pub mod recovery;
pub mod template;
pub mod tracing;
pub mod workspace;

pub use autosave::{
    AutosaveEncoder, AutosaveError, AutosaveEvent, AutosaveManager, AutosaveResult,
    AutosaveScheduler, DirectoryStore, MemoryStore, RetryConfig, SessionSnapshot, SnapshotStore,
};
pub use codec::{CellImage, ImageCodec, PngCodec, RasterImage};
pub use config::{AppSettings, ConfigManager};
pub use controls::{CaptionDefaults, ControlsState};
pub use error::{CollageError, CollageResult, ConfigError, ConfigResult};
pub use grid::{CollageCell, CollageGrid, GridError, GridResult};
pub use history::{SessionController, SessionError, SessionResult, StateAdapter, StateTree};
pub use layout::{CellId, GridLayoutManager, LayoutCell, LayoutError, LayoutResult};
pub use recovery::{ErrorRecoveryMonitor, RecoverySettings};
pub use template::{GridTemplate, builtin_templates};
pub use workspace::CollageWorkspace;
