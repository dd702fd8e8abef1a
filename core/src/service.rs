use crate::scanner::Scanner;
use crate::store::{normalize_project_path, IndexStore};
use crate::{KeywordCountTable, Result};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

/// Serializes mutating operations per normalized project path.
#[derive(Default)]
struct PathLocks {
    inner: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl PathLocks {
    fn for_path(&self, path: &PathBuf) -> Arc<Mutex<()>> {
        self.inner.lock().entry(path.clone()).or_default().clone()
    }
}

/// The four public operations over a project's keyword index.
///
/// Generate, update, and delete each hold the path's lock end-to-end, so at
/// most one mutating operation per project is in flight at a time. Retrieve
/// needs no lock: records become visible atomically on the store's rename
/// commit.
pub struct CounterService {
    scanner: Scanner,
    store: IndexStore,
    locks: PathLocks,
}

impl CounterService {
    pub fn new(scanner: Scanner, store: IndexStore) -> Self {
        Self { scanner, store, locks: PathLocks::default() }
    }

    /// Scan the project and persist its keyword counts, unless an index
    /// already exists. Returns `false`, without scanning, when one does.
    pub fn generate(&self, path: &str) -> Result<bool> {
        let path = normalize_project_path(path)?;
        let lock = self.locks.for_path(&path);
        let _guard = lock.lock();
        if self.store.exists(&path) {
            tracing::debug!(path = %path.display(), "index already present, skipping scan");
            return Ok(false);
        }
        let table = self.scanner.scan(&path)?;
        self.store.create(&path, &table)
    }

    /// Return the stored keyword counts for the project; `NotFound` when it
    /// was never generated.
    pub fn retrieve(&self, path: &str) -> Result<KeywordCountTable> {
        let path = normalize_project_path(path)?;
        Ok(self.store.read(&path)?.counts)
    }

    /// Re-scan the project and overwrite whatever was stored before,
    /// creating the index when absent.
    pub fn update(&self, path: &str) -> Result<bool> {
        let path = normalize_project_path(path)?;
        let lock = self.locks.for_path(&path);
        let _guard = lock.lock();
        let table = self.scanner.scan(&path)?;
        self.store.replace(&path, &table)
    }

    /// Remove the stored index. Returns `false` when none existed.
    pub fn delete(&self, path: &str) -> Result<bool> {
        let path = normalize_project_path(path)?;
        let lock = self.locks.for_path(&path);
        let _guard = lock.lock();
        self.store.delete(&path)
    }
}
