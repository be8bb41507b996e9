//! Repeated-error detection
//!
//! [`ErrorRecoveryMonitor`] counts errors in a sliding time window. Once
//! the threshold is hit it writes a recovery snapshot, runs a reset
//! callback and starts counting from zero again.

use std::collections::VecDeque;
use std::fmt::Display;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::autosave::{AutosaveManager, AutosaveResult, SnapshotStore};

/// Default number of errors that triggers recovery
pub const DEFAULT_ERROR_THRESHOLD: u32 = 5;

/// Default window errors are counted in, in seconds
pub const DEFAULT_WINDOW_SECS: u64 = 300;

/// Recovery trigger settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecoverySettings {
    /// Errors within the window that trigger recovery
    pub error_threshold: u32,
    /// Window length in seconds
    pub window_secs: u64,
}

impl Default for RecoverySettings {
    fn default() -> Self {
        Self {
            error_threshold: DEFAULT_ERROR_THRESHOLD,
            window_secs: DEFAULT_WINDOW_SECS,
        }
    }
}

/// Sliding-window error counter that triggers recovery.
#[derive(Debug, Clone)]
pub struct ErrorRecoveryMonitor {
    threshold: usize,
    window: Duration,
    errors: VecDeque<Instant>,
}

impl Default for ErrorRecoveryMonitor {
    fn default() -> Self {
        Self::new(&RecoverySettings::default())
    }
}

impl ErrorRecoveryMonitor {
    /// Creates a monitor. A zero threshold is treated as one.
    #[must_use]
    pub fn new(settings: &RecoverySettings) -> Self {
        Self {
            threshold: settings.error_threshold.max(1) as usize,
            window: Duration::from_secs(settings.window_secs),
            errors: VecDeque::new(),
        }
    }

    /// Errors counted inside the window ending at `now`.
    #[must_use]
    pub fn error_count(&self, now: Instant) -> usize {
        self.errors
            .iter()
            .filter(|&&at| now.saturating_duration_since(at) <= self.window)
            .count()
    }

    /// Forgets all counted errors.
    pub fn reset(&mut self) {
        self.errors.clear();
    }

    /// Counts one error at `now` and returns true once the threshold is reached.
    pub fn record_error_at(&mut self, now: Instant) -> bool {
        while let Some(&oldest) = self.errors.front() {
            if now.saturating_duration_since(oldest) > self.window {
                self.errors.pop_front();
            } else {
                break;
            }
        }
        self.errors.push_back(now);
        self.errors.len() >= self.threshold
    }

    /// Reports an error at the current time.
    ///
    /// See [`report_error_at`](Self::report_error_at).
    pub fn report_error<S, T>(
        &mut self,
        error: &dyn Display,
        manager: &AutosaveManager<S>,
        state: &T,
        on_reset: impl FnOnce(),
    ) -> Option<AutosaveResult<String>>
    where
        S: SnapshotStore,
        T: Serialize,
    {
        self.report_error_at(Instant::now(), error, manager, state, on_reset)
    }

    /// Counts an error and recovers once the threshold is reached.
    ///
    /// Recovery writes `state` as a recovery snapshot, runs `on_reset` even
    /// if the write failed, and clears the counter. Returns the outcome of
    /// the write when recovery happened, `None` otherwise.
    pub fn report_error_at<S, T>(
        &mut self,
        now: Instant,
        error: &dyn Display,
        manager: &AutosaveManager<S>,
        state: &T,
        on_reset: impl FnOnce(),
    ) -> Option<AutosaveResult<String>>
    where
        S: SnapshotStore,
        T: Serialize,
    {
        tracing::warn!(error = %error, "Editor error reported");
        if !self.record_error_at(now) {
            return None;
        }
        tracing::error!(
            errors = self.errors.len(),
            window_secs = self.window.as_secs(),
            "Error threshold reached, recovering"
        );
        let written = manager.write_recovery(state);
        if let Err(e) = &written {
            tracing::error!(error = %e, "Failed to write recovery snapshot");
        }
        on_reset();
        self.reset();
        Some(written)
    }
}
