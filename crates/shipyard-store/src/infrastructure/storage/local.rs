//! Durable key/value storage.
//!
//! [`MemoryStorage`] lives as long as the process and backs tests and
//! one-shot commands.  [`JsonFileStorage`] keeps the same map in a JSON file
//! so overrides saved by one CLI run are seen by the next.
//!
//! Both follow the `localStorage` contract: reads and writes never fail from
//! the caller's point of view.  `JsonFileStorage` logs write failures and
//! keeps serving the in-memory copy.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use thiserror::Error;
use tracing::{debug, warn};

use crate::application::collaborators::KeyValueStore;

// ── MemoryStorage ─────────────────────────────────────────────────────────────

/// Process-lifetime key/value storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.items.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner).get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
    }

    fn remove_item(&self, key: &str) {
        self.items.lock().unwrap_or_else(PoisonError::into_inner).remove(key);
    }
}

// ── JsonFileStorage ───────────────────────────────────────────────────────────

/// Error opening a storage file.
#[derive(Debug, Error)]
pub enum LocalStorageError {
    #[error("I/O error reading local storage at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("local storage at {path} is not a JSON object of strings: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Key/value storage persisted as a single JSON object.
///
/// The whole map is rewritten on every change.
#[derive(Debug)]
pub struct JsonFileStorage {
    path: PathBuf,
    items: Mutex<BTreeMap<String, String>>,
}

impl JsonFileStorage {
    /// Opens the storage file at `path`.  A missing file starts empty.
    ///
    /// # Errors
    ///
    /// Returns [`LocalStorageError::Io`] for read failures other than "not
    /// found" and [`LocalStorageError::Parse`] if the file is not a JSON
    /// object of strings.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LocalStorageError> {
        let path = path.into();
        let items = match std::fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => serde_json::from_str(&content).map_err(|source| LocalStorageError::Parse {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(LocalStorageError::Io { path, source }),
        };
        debug!(path = %path.display(), keys = items.len(), "opened local storage");
        Ok(Self {
            path,
            items: Mutex::new(items),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, items: &BTreeMap<String, String>) {
        let content = match serde_json::to_string_pretty(items) {
            Ok(content) => content,
            Err(e) => {
                warn!(error = %e, "could not encode local storage");
                return;
            }
        };
        if let Some(dir) = self.path.parent() {
            if let Err(e) = std::fs::create_dir_all(dir) {
                warn!(path = %dir.display(), error = %e, "could not create local storage directory");
                return;
            }
        }
        if let Err(e) = std::fs::write(&self.path, content) {
            warn!(path = %self.path.display(), error = %e, "could not write local storage");
        }
    }
}

impl KeyValueStore for JsonFileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner).get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        items.insert(key.to_string(), value.to_string());
        self.flush(&items);
    }

    fn remove_item(&self, key: &str) {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        if items.remove(key).is_some() {
            self.flush(&items);
        }
    }
}
