//! Snapshot based undo/redo controller

use super::adapter::{RestoreFlag, StateAdapter, StateTree};
use super::error::{SessionError, SessionResult};
use crate::tracing::span_names;

/// Default number of undo steps kept.
pub const DEFAULT_HISTORY_LIMIT: usize = 30;

/// Undo/redo manager over whole-state snapshots.
///
/// The controller keeps a *baseline*: the state as of the last completed
/// edit. Capturing a snapshot pushes the baseline, not the live state, so
/// an edit that was already applied when the capture happens is still
/// undone correctly. After every edit the caller refreshes the baseline.
///
/// Both stacks hold at most `history_limit` entries; the oldest entry is
/// dropped first.
#[derive(Debug)]
pub struct SessionController<A> {
    adapter: A,
    history_limit: usize,
    undo_stack: Vec<StateTree>,
    redo_stack: Vec<StateTree>,
    baseline: StateTree,
    restoring: RestoreFlag,
}

impl<A: StateAdapter> SessionController<A> {
    /// Creates a controller with the default history limit.
    ///
    /// The adapter's current state becomes the baseline.
    pub fn new(adapter: A) -> Self {
        let baseline = adapter.read_state();
        Self {
            adapter,
            history_limit: DEFAULT_HISTORY_LIMIT,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            baseline,
            restoring: RestoreFlag::default(),
        }
    }

    /// Creates a controller keeping at most `history_limit` steps.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidHistoryLimit` if `history_limit` is zero.
    pub fn with_history_limit(adapter: A, history_limit: usize) -> SessionResult<Self> {
        if history_limit == 0 {
            return Err(SessionError::InvalidHistoryLimit(history_limit));
        }
        let mut controller = Self::new(adapter);
        controller.history_limit = history_limit;
        Ok(controller)
    }

    /// Returns the adapter.
    pub const fn adapter(&self) -> &A {
        &self.adapter
    }

    /// Returns the adapter mutably.
    ///
    /// Changes made here are not recorded; prefer [`edit`](Self::edit).
    pub const fn adapter_mut(&mut self) -> &mut A {
        &mut self.adapter
    }

    /// Maximum number of entries per stack.
    #[must_use]
    pub const fn history_limit(&self) -> usize {
        self.history_limit
    }

    /// Returns true while a snapshot is being applied.
    #[must_use]
    pub fn is_restoring(&self) -> bool {
        self.restoring.is_restoring()
    }

    /// Returns a handle that observes the restoring flag.
    #[must_use]
    pub fn restore_flag(&self) -> RestoreFlag {
        self.restoring.clone()
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

    /// Number of redo steps available.
    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Returns the baseline state.
    #[must_use]
    pub const fn baseline(&self) -> &StateTree {
        &self.baseline
    }

    /// Pushes a copy of the baseline onto the undo stack and clears redo.
    ///
    /// Returns false, recording nothing, while a snapshot is being applied.
    pub fn capture_snapshot(&mut self) -> bool {
        if self.is_restoring() {
            return false;
        }
        self.undo_stack.push(self.baseline.clone());
        trim(&mut self.undo_stack, self.history_limit);
        self.redo_stack.clear();
        true
    }

    /// Drops the newest undo entry without restoring it.
    pub fn discard_latest_snapshot(&mut self) {
        self.undo_stack.pop();
    }

    /// Sets the baseline to `state`, or to the live state when `None`.
    pub fn update_baseline(&mut self, state: Option<StateTree>) {
        self.baseline = state.unwrap_or_else(|| self.adapter.read_state());
    }

    /// Clears both stacks and resyncs the baseline with the live state.
    pub fn reset_history(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.update_baseline(None);
    }

    /// Applies `state` through the adapter and makes it the baseline.
    ///
    /// The restoring flag is raised for the duration of the apply and
    /// lowered again even if the adapter fails. Empty states (null or an
    /// empty object) are ignored.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::ApplyFailed` if the adapter rejects the state;
    /// the baseline is left unchanged.
    pub fn restore_state(&mut self, state: &StateTree) -> SessionResult<()> {
        if is_empty_state(state) {
            return Ok(());
        }
        {
            let _span = tracing::debug_span!(span_names::SESSION_RESTORE).entered();
            let _guard = self.restoring.raise();
            self.adapter
                .apply_state(state.clone())
                .map_err(SessionError::ApplyFailed)?;
        }
        self.update_baseline(Some(state.clone()));
        Ok(())
    }

    /// Restores the previous snapshot, moving the live state onto redo.
    ///
    /// # Errors
    ///
    /// - `SessionError::UndoUnavailable` if there is nothing to undo
    /// - `SessionError::ApplyFailed` if the adapter rejects the snapshot, in
    ///   which case both stacks are left as they were
    pub fn undo(&mut self) -> SessionResult<()> {
        let snapshot = self.undo_stack.pop().ok_or(SessionError::UndoUnavailable)?;
        let current = self.adapter.read_state();
        if let Err(e) = self.restore_state(&snapshot) {
            tracing::warn!(error = %e, "Undo failed, history left unchanged");
            self.undo_stack.push(snapshot);
            return Err(e);
        }
        self.redo_stack.push(current);
        trim(&mut self.redo_stack, self.history_limit);
        tracing::debug!(undo = self.undo_stack.len(), redo = self.redo_stack.len(), "Undo applied");
        Ok(())
    }

    /// Re-applies the next redo snapshot, moving the live state onto undo.
    ///
    /// # Errors
    ///
    /// - `SessionError::RedoUnavailable` if there is nothing to redo
    /// - `SessionError::ApplyFailed` if the adapter rejects the snapshot, in
    ///   which case both stacks are left as they were
    pub fn redo(&mut self) -> SessionResult<()> {
        let snapshot = self.redo_stack.pop().ok_or(SessionError::RedoUnavailable)?;
        let current = self.adapter.read_state();
        if let Err(e) = self.restore_state(&snapshot) {
            tracing::warn!(error = %e, "Redo failed, history left unchanged");
            self.redo_stack.push(snapshot);
            return Err(e);
        }
        self.undo_stack.push(current);
        trim(&mut self.undo_stack, self.history_limit);
        tracing::debug!(undo = self.undo_stack.len(), redo = self.redo_stack.len(), "Redo applied");
        Ok(())
    }

    /// Returns a copy of the live state.
    #[must_use]
    pub fn current_state(&self) -> StateTree {
        self.adapter.read_state()
    }

    /// Runs one recorded edit.
    ///
    /// Captures a snapshot, runs `f` on the adapter, then drops the snapshot
    /// if `f` failed or refreshes the baseline if it succeeded.
    ///
    /// # Errors
    ///
    /// Returns whatever `f` returns.
    pub fn edit<T, E>(&mut self, f: impl FnOnce(&mut A) -> Result<T, E>) -> Result<T, E> {
        let captured = self.capture_snapshot();
        match f(&mut self.adapter) {
            Ok(value) => {
                self.update_baseline(None);
                Ok(value)
            }
            Err(e) => {
                if captured {
                    self.discard_latest_snapshot();
                }
                Err(e)
            }
        }
    }
}

fn trim(stack: &mut Vec<StateTree>, limit: usize) {
    if stack.len() > limit {
        let excess = stack.len() - limit;
        stack.drain(..excess);
    }
}

fn is_empty_state(state: &StateTree) -> bool {
    match state {
        StateTree::Null => true,
        StateTree::Object(map) => map.is_empty(),
        _ => false,
    }
}
