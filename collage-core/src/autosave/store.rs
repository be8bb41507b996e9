//! Named snapshot storage
//!
//! A [`SnapshotStore`] keeps JSON documents under flat names such as
//! `collage_autosave_20250101_120000_000.json`. [`DirectoryStore`] maps names
//! to files in one directory; [`MemoryStore`] keeps them in memory and can
//! inject write failures for tests.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Storage backend for snapshot documents.
///
/// Methods return `std::io::Error` so callers can tell transient failures
/// from permanent ones by `ErrorKind`.
pub trait SnapshotStore {
    /// Writes `contents` under `name`, replacing any previous document.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error.
    fn save(&self, name: &str, contents: &str) -> io::Result<()>;

    /// Lists stored names in ascending order.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error.
    fn list(&self) -> io::Result<Vec<String>>;

    /// Reads the document stored under `name`.
    ///
    /// # Errors
    ///
    /// Returns `ErrorKind::NotFound` for unknown names.
    fn load(&self, name: &str) -> io::Result<String>;

    /// Deletes the document stored under `name`.
    ///
    /// # Errors
    ///
    /// Returns `ErrorKind::NotFound` for unknown names.
    fn remove(&self, name: &str) -> io::Result<()>;
}

fn validate_name(name: &str) -> io::Result<()> {
    if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid snapshot name '{name}'"),
        ));
    }
    Ok(())
}

/// Stores snapshots as `.json` files in a directory.
///
/// The directory is created on first write. Writes go to a temporary file
/// that is renamed into place, so a crash never leaves a truncated snapshot.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    dir: PathBuf,
}

impl DirectoryStore {
    /// Creates a store rooted at `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory holding the snapshots.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path of the snapshot stored under `name`.
    #[must_use]
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }
}

impl SnapshotStore for DirectoryStore {
    fn save(&self, name: &str, contents: &str) -> io::Result<()> {
        validate_name(name)?;
        std::fs::create_dir_all(&self.dir)?;
        let tmp = self.dir.join(format!(".{name}.tmp"));
        std::fs::write(&tmp, contents)?;
        if let Err(e) = std::fs::rename(&tmp, self.path_for(name)) {
            let _ = std::fs::remove_file(&tmp);
            return Err(e);
        }
        Ok(())
    }

    fn list(&self) -> io::Result<Vec<String>> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str()
                && name.ends_with(".json")
                && !name.starts_with('.')
            {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn load(&self, name: &str) -> io::Result<String> {
        validate_name(name)?;
        std::fs::read_to_string(self.path_for(name))
    }

    fn remove(&self, name: &str) -> io::Result<()> {
        validate_name(name)?;
        std::fs::remove_file(self.path_for(name))
    }
}

/// In-memory snapshot store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: Mutex<BTreeMap<String, String>>,
    failures: Mutex<Vec<io::ErrorKind>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next writes fail with the given error kinds, in order.
    pub fn fail_next_saves(&self, kinds: impl IntoIterator<Item = io::ErrorKind>) {
        let mut failures = lock(&self.failures);
        failures.extend(kinds);
    }

    /// Number of stored documents.
    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.documents).len()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

impl SnapshotStore for MemoryStore {
    fn save(&self, name: &str, contents: &str) -> io::Result<()> {
        validate_name(name)?;
        {
            let mut failures = lock(&self.failures);
            if !failures.is_empty() {
                let kind = failures.remove(0);
                return Err(io::Error::new(kind, "injected failure"));
            }
        }
        lock(&self.documents).insert(name.to_string(), contents.to_string());
        Ok(())
    }

    fn list(&self) -> io::Result<Vec<String>> {
        Ok(lock(&self.documents).keys().cloned().collect())
    }

    fn load(&self, name: &str) -> io::Result<String> {
        lock(&self.documents)
            .get(name)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("no snapshot '{name}'")))
    }

    fn remove(&self, name: &str) -> io::Result<()> {
        lock(&self.documents)
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("no snapshot '{name}'")))
    }
}
