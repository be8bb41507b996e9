//! Reading and applying session state

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::error::AdapterError;

/// JSON-safe tree describing the whole editable state.
pub type StateTree = serde_json::Value;

/// Bridge between a [`SessionController`](super::SessionController) and the
/// state it tracks.
pub trait StateAdapter {
    /// Returns the current state.
    fn read_state(&self) -> StateTree;

    /// Replaces the current state.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be applied; the adapter should
    /// then be left as it was.
    fn apply_state(&mut self, state: StateTree) -> Result<(), AdapterError>;
}

/// [`StateAdapter`] built from a pair of closures.
pub struct FnStateAdapter<R, W> {
    read: R,
    write: W,
}

impl<R, W> FnStateAdapter<R, W>
where
    R: Fn() -> StateTree,
    W: FnMut(StateTree) -> Result<(), AdapterError>,
{
    /// Creates an adapter from a reader and a writer.
    pub const fn new(read: R, write: W) -> Self {
        Self { read, write }
    }
}

impl<R, W> StateAdapter for FnStateAdapter<R, W>
where
    R: Fn() -> StateTree,
    W: FnMut(StateTree) -> Result<(), AdapterError>,
{
    fn read_state(&self) -> StateTree {
        (self.read)()
    }

    fn apply_state(&mut self, state: StateTree) -> Result<(), AdapterError> {
        (self.write)(state)
    }
}

impl<R, W> fmt::Debug for FnStateAdapter<R, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnStateAdapter").finish_non_exhaustive()
    }
}

/// Shared view of the "restoring" flag.
///
/// The flag is raised while the controller applies a snapshot, so change
/// handlers triggered by that apply can skip recording history.
#[derive(Debug, Clone, Default)]
pub struct RestoreFlag(Arc<AtomicBool>);

impl RestoreFlag {
    /// Returns true while a snapshot is being applied.
    #[must_use]
    pub fn is_restoring(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub(crate) fn raise(&self) -> RestoreGuard<'_> {
        self.0.store(true, Ordering::Release);
        RestoreGuard(self)
    }
}

/// Lowers the flag when dropped, whether the apply succeeded or not.
pub(crate) struct RestoreGuard<'a>(&'a RestoreFlag);

impl Drop for RestoreGuard<'_> {
    fn drop(&mut self) {
        (self.0).0.store(false, Ordering::Release);
    }
}
