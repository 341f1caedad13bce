//! Persistence of the photo list between runs.
//!
//! Two layers:
//!
//! - [`Storage`]: raw key/value string storage. [`FileStorage`] keeps one
//!   `<key>.json` file per key in a directory; [`MemoryStorage`] keeps a map
//!   and is used by tests and by sessions that never persist.
//! - [`PathStore`]: encodes the ordered list of [`PhotoPath`]s as a JSON array
//!   of strings under a single named key.
//!
//! ## Storage layout
//!
//! ```text
//! my-gallery/
//! ├── photo-shelf.toml
//! └── .photo-shelf/
//!     └── photoGallery.json     # ["cats/tom.jpg","dogs/rex.png"]
//! ```
//!
//! ## Malformed data
//!
//! A missing key loads as an empty list. A value that is not JSON, or is JSON
//! but not an array, is reported as [`StoreError::CorruptPersistedState`] so
//! the caller can start empty and tell the user. Inside a valid array,
//! entries that are not non-blank strings (numbers, `null`, objects, `""`) are
//! dropped with a warning and the rest of the list survives.

use crate::types::PhotoPath;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Directory inside the gallery that holds saved lists.
pub const STORE_DIR: &str = ".photo-shelf";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("saved gallery '{key}' is unreadable: {reason}")]
    CorruptPersistedState { key: String, reason: String },
}

/// Key/value string storage.
///
/// Serialization is the caller's concern; implementations only move strings.
pub trait Storage {
    /// Read the value stored under `key`. `Ok(None)` if nothing is stored.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete `key`. Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// One JSON file per key inside a directory. The directory is created on
/// first write.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Resolve the file backing `key`.
    pub fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.key_path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.key_path(key), value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory storage. Nothing outlives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// The photo list persisted as a JSON array under one key.
pub struct PathStore {
    storage: Box<dyn Storage>,
    key: String,
}

impl PathStore {
    pub fn new(storage: Box<dyn Storage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Write the whole list, replacing the previous value.
    pub fn save(&mut self, paths: &[PhotoPath]) -> Result<(), StoreError> {
        let json = serde_json::to_string(paths)?;
        self.storage.set(&self.key, &json)?;
        log::debug!("saved {} paths under '{}'", paths.len(), self.key);
        Ok(())
    }

    /// Read the list back. See the [module docs](self) for how malformed
    /// values are handled.
    pub fn load(&self) -> Result<Vec<PhotoPath>, StoreError> {
        let Some(content) = self.storage.get(&self.key)? else {
            return Ok(Vec::new());
        };
        let value: serde_json::Value =
            serde_json::from_str(&content).map_err(|e| self.corrupt(e.to_string()))?;
        let serde_json::Value::Array(entries) = value else {
            return Err(self.corrupt("expected a JSON array of paths".to_string()));
        };

        let total = entries.len();
        let paths: Vec<PhotoPath> = entries
            .into_iter()
            .filter_map(|entry| match entry {
                serde_json::Value::String(s) => PhotoPath::parse(&s).ok(),
                _ => None,
            })
            .collect();

        if paths.len() < total {
            log::warn!(
                "dropped {} invalid entries from saved gallery '{}'",
                total - paths.len(),
                self.key
            );
        }
        Ok(paths)
    }

    /// Forget the persisted list entirely.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.storage.remove(&self.key)
    }

    fn corrupt(&self, reason: String) -> StoreError {
        StoreError::CorruptPersistedState {
            key: self.key.clone(),
            reason,
        }
    }
}

impl std::fmt::Debug for PathStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathStore").field("key", &self.key).finish()
    }
}
