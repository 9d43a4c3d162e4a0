//! Key-value persistence for the dashboard counters.
//!
//! State is two small JSON documents (cave → count maps) behind a string
//! key-value seam, the same layout the dashboard kept in browser storage:
//! one file per key on disk, or a shared map in memory for tests and the
//! headless harness.

use std::collections::{BTreeMap, HashMap};
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use log::warn;

/// String key-value backing store for the persisted counter maps.
pub trait StateStore: Send + Sync {
    /// Fetch the raw value for `key`, `None` if it was never written.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    /// Write the raw value for `key`.
    fn put(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// One JSON file per key under a data directory.
///
/// The directory is created on first write, so pointing at a fresh path
/// behaves like an empty store.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl StateStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    fn put(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path_for(key), value)?;
        Ok(())
    }
}

/// Shared in-memory store. Clones see the same entries, which lets tests
/// read back what the engine wrote.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Read a counter map, falling back to empty on any failure.
///
/// A missing key is a normal first run and stays quiet; an unreadable or
/// malformed value is logged and treated the same way. Persistence never
/// takes the dashboard down.
pub fn load_counts(store: &dyn StateStore, key: &str) -> BTreeMap<String, u64> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return BTreeMap::new(),
        Err(e) => {
            warn!("failed to read '{}': {}", key, e);
            return BTreeMap::new();
        }
    };

    match serde_json::from_str(&raw) {
        Ok(map) => map,
        Err(e) => {
            warn!("malformed JSON under '{}', resetting: {}", key, e);
            BTreeMap::new()
        }
    }
}

/// Serialize and write a counter map.
pub fn save_counts(
    store: &mut dyn StateStore,
    key: &str,
    counts: &BTreeMap<String, u64>,
) -> Result<(), StoreError> {
    let json = serde_json::to_string(counts)?;
    store.put(key, &json)
}

/// Errors from the backing store.
#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Json(e)
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "IO error: {}", e),
            StoreError::Json(e) => write!(f, "Serialization error: {}", e),
        }
    }
}

impl std::error::Error for StoreError {}
