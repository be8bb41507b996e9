//! Periodic snapshot writer with retention
//!
//! The manager names snapshots by timestamp, writes them with retry and
//! backoff, and keeps only the newest `max_files` autosaves. Recovery
//! snapshots written after repeated errors share the store but are never
//! pruned.

use std::io;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::{AutosaveError, AutosaveResult};
use super::retry::{RetryConfig, retry_with_backoff};
use super::store::SnapshotStore;
use crate::tracing::span_names;

/// File name prefix of periodic autosaves
pub const AUTOSAVE_PREFIX: &str = "collage_autosave_";

/// File name prefix of recovery snapshots
pub const RECOVERY_PREFIX: &str = "recovery_";

/// Default number of autosaves kept
pub const DEFAULT_MAX_FILES: usize = 5;

/// Default time between autosaves
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(300);

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S_%3f";

/// Writes, lists, loads and prunes session snapshots.
#[derive(Debug)]
pub struct AutosaveManager<S> {
    store: S,
    max_files: usize,
    retry: RetryConfig,
    sleep: fn(Duration),
}

impl<S: SnapshotStore> AutosaveManager<S> {
    /// Creates a manager with default retention and retry.
    pub fn new(store: S) -> Self {
        Self {
            store,
            max_files: DEFAULT_MAX_FILES,
            retry: RetryConfig::default(),
            sleep: std::thread::sleep,
        }
    }

    /// Sets how many autosaves are kept (at least one).
    #[must_use]
    pub fn with_max_files(mut self, max_files: usize) -> Self {
        self.max_files = max_files.max(1);
        self
    }

    /// Sets the retry policy of the write path.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Replaces the function used to wait between retries.
    #[must_use]
    pub fn with_sleep(mut self, sleep: fn(Duration)) -> Self {
        self.sleep = sleep;
        self
    }

    /// The underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Number of autosaves kept.
    #[must_use]
    pub const fn max_files(&self) -> usize {
        self.max_files
    }

    /// Writes `state` as a new autosave, then prunes old ones.
    ///
    /// Returns the snapshot name. Pruning failures are logged only.
    ///
    /// # Errors
    ///
    /// - `AutosaveError::Serialization` if `state` cannot be serialized
    /// - `AutosaveError::Io` for a permanent write failure
    /// - `AutosaveError::RetriesExhausted` if transient failures outlast the retries
    pub fn perform_autosave<T: Serialize>(&self, state: &T) -> AutosaveResult<String> {
        let name = self.write_snapshot(AUTOSAVE_PREFIX, state)?;
        self.prune();
        Ok(name)
    }

    /// Writes `state` as a recovery snapshot.
    ///
    /// # Errors
    ///
    /// Same as [`perform_autosave`](Self::perform_autosave).
    pub fn write_recovery<T: Serialize>(&self, state: &T) -> AutosaveResult<String> {
        self.write_snapshot(RECOVERY_PREFIX, state)
    }

    /// Autosave names, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `AutosaveError::Io` if the store cannot be listed.
    pub fn autosaves(&self) -> AutosaveResult<Vec<String>> {
        self.names_with_prefix(AUTOSAVE_PREFIX)
    }

    /// Recovery snapshot names, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `AutosaveError::Io` if the store cannot be listed.
    pub fn recoveries(&self) -> AutosaveResult<Vec<String>> {
        self.names_with_prefix(RECOVERY_PREFIX)
    }

    /// Name of the newest autosave.
    ///
    /// # Errors
    ///
    /// Returns `AutosaveError::Io` if the store cannot be listed.
    pub fn latest(&self) -> AutosaveResult<Option<String>> {
        Ok(self.autosaves()?.pop())
    }

    /// Loads and parses a snapshot.
    ///
    /// # Errors
    ///
    /// - `AutosaveError::NotFound` if no snapshot has that name
    /// - `AutosaveError::Io` if it cannot be read
    /// - `AutosaveError::Deserialization` if it is not valid for `T`
    pub fn load<T: DeserializeOwned>(&self, name: &str) -> AutosaveResult<T> {
        let json = self.store.load(name).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => AutosaveError::NotFound(name.to_string()),
            io::ErrorKind::InvalidInput => AutosaveError::InvalidName(name.to_string()),
            _ => AutosaveError::Io(e),
        })?;
        serde_json::from_str(&json).map_err(AutosaveError::Deserialization)
    }

    /// Loads the newest autosave, if any.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load).
    pub fn load_latest<T: DeserializeOwned>(&self) -> AutosaveResult<Option<T>> {
        match self.latest()? {
            Some(name) => self.load(&name).map(Some),
            None => Ok(None),
        }
    }

    /// Deletes autosaves beyond `max_files`, oldest first.
    ///
    /// Returns the names removed. Failures are logged and skipped.
    pub fn prune(&self) -> Vec<String> {
        let names = match self.autosaves() {
            Ok(names) => names,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to list autosaves for pruning");
                return Vec::new();
            }
        };
        let excess = names.len().saturating_sub(self.max_files);
        let mut removed = Vec::with_capacity(excess);
        for name in names.into_iter().take(excess) {
            match self.store.remove(&name) {
                Ok(()) => {
                    tracing::debug!(snapshot = %name, "Pruned old autosave");
                    removed.push(name);
                }
                Err(e) => tracing::warn!(snapshot = %name, error = %e, "Failed to prune autosave"),
            }
        }
        removed
    }

    fn names_with_prefix(&self, prefix: &str) -> AutosaveResult<Vec<String>> {
        let mut names: Vec<String> = self
            .store
            .list()?
            .into_iter()
            .filter(|name| name.starts_with(prefix))
            .collect();
        names.sort();
        Ok(names)
    }

    fn write_snapshot<T: Serialize>(&self, prefix: &str, state: &T) -> AutosaveResult<String> {
        let _span = tracing::debug_span!(span_names::AUTOSAVE_WRITE, prefix).entered();
        let json = serde_json::to_string_pretty(state).map_err(AutosaveError::Serialization)?;
        let name = self.unique_name(prefix)?;
        retry_with_backoff(&self.retry, is_transient, self.sleep, || self.store.save(&name, &json))
            .map_err(|(error, attempts)| {
                tracing::error!(snapshot = %name, attempts, error = %error, "Snapshot write failed");
                if is_transient(&error) {
                    AutosaveError::RetriesExhausted {
                        attempts,
                        source: error,
                    }
                } else {
                    AutosaveError::Io(error)
                }
            })?;
        tracing::info!(snapshot = %name, bytes = json.len(), "Snapshot written");
        Ok(name)
    }

    fn unique_name(&self, prefix: &str) -> AutosaveResult<String> {
        let stamp = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();
        let base = format!("{prefix}{stamp}");
        let existing = self.store.list()?;
        let mut name = format!("{base}.json");
        let mut suffix = 1;
        while existing.contains(&name) {
            name = format!("{base}_{suffix}.json");
            suffix += 1;
        }
        Ok(name)
    }
}

/// Errors worth retrying: anything but permission, input and format problems.
fn is_transient(error: &io::Error) -> bool {
    !matches!(
        error.kind(),
        io::ErrorKind::PermissionDenied
            | io::ErrorKind::InvalidInput
            | io::ErrorKind::InvalidData
            | io::ErrorKind::Unsupported
    )
}
