use std::collections::{BTreeMap, HashMap};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::NamedTempFile;

use super::{lock, PreferenceStorage};
use crate::StorageError;

/// File-backed storage: a JSON object of string keys to string values.
///
/// A missing file reads as empty. Writes keep any other keys in the file.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(StorageError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content).map_err(|source| StorageError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn io_error(&self, source: io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl PreferenceStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.load()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = match self.load() {
            Ok(items) => items,
            Err(StorageError::Corrupt { .. }) => {
                tracing::warn!(path = %self.path.display(), "replacing corrupt storage file");
                BTreeMap::new()
            }
            Err(err) => return Err(err),
        };
        items.insert(key.to_string(), value.to_string());

        let dir = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
                parent
            }
            None => Path::new("."),
        };
        let json = serde_json::to_string_pretty(&items).map_err(|source| StorageError::Corrupt {
            path: self.path.clone(),
            source,
        })?;

        // Written beside the target and renamed over it, so readers never see
        // a truncated file.
        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| self.io_error(e))?;
        tmp.write_all(json.as_bytes()).map_err(|e| self.io_error(e))?;
        tmp.persist(&self.path).map_err(|e| self.io_error(e.error))?;
        Ok(())
    }
}

/// In-memory storage for tests.
///
/// Clones share the same items, so a test can keep a handle after giving one
/// to a store. Reads and writes can be made to fail independently.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Mutex<MemoryState>>,
}

#[derive(Debug, Default)]
struct MemoryState {
    items: HashMap<String, String>,
    fail_reads: bool,
    fail_writes: bool,
    writes: usize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage where every read and write is denied.
    pub fn failing() -> Self {
        let storage = Self::new();
        storage.fail_reads(true);
        storage.fail_writes(true);
        storage
    }

    pub fn with_item(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        lock(&self.inner).items.insert(key.into(), value.into());
        self
    }

    pub fn fail_reads(&self, fail: bool) {
        lock(&self.inner).fail_reads = fail;
    }

    pub fn fail_writes(&self, fail: bool) {
        lock(&self.inner).fail_writes = fail;
    }

    /// Inspect a stored value, ignoring injected failures.
    pub fn get(&self, key: &str) -> Option<String> {
        lock(&self.inner).items.get(key).cloned()
    }

    /// Number of successful writes.
    pub fn write_count(&self) -> usize {
        lock(&self.inner).writes
    }
}

impl PreferenceStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let state = lock(&self.inner);
        if state.fail_reads {
            return Err(StorageError::denied("reads disabled"));
        }
        Ok(state.items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut state = lock(&self.inner);
        if state.fail_writes {
            return Err(StorageError::QuotaExceeded);
        }
        state.items.insert(key.to_string(), value.to_string());
        state.writes += 1;
        Ok(())
    }
}
