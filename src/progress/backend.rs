//! Key-value backends for persisted learner state
//!
//! Each key holds one JSON document. Backends only move strings around; the store
//! decides what goes in them.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::error::StorageError;

/// Key holding reading progress
pub const READING_KEY: &str = "reading-progress";
/// Key holding listening progress
pub const LISTENING_KEY: &str = "listening-progress";
/// Key holding user preferences
pub const PREFERENCES_KEY: &str = "preferences";

/// A string key-value store
pub trait StorageBackend {
    /// Read the value stored under `key`, if any
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`; deleting a missing key is not an error
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-process backend, lost when dropped
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    values: HashMap<String, String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl StorageBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.values.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per key inside a directory
///
/// Writes go to a temporary sibling first and are renamed into place, so a reader
/// never sees a half-written document.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StorageBackend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        fs::read_to_string(&path).map(Some).map_err(|e| StorageError::io(key, e))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir).map_err(|e| StorageError::io(key, e))?;

        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(|e| StorageError::io(key, e))?;
        fs::rename(&tmp, &path).map_err(|e| StorageError::io(key, e))
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::io(key, e)),
        }
    }
}

/// Backend for contexts with no persistent storage
///
/// Reads find nothing and writes are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedBackend;

impl StorageBackend for DetachedBackend {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    fn set(&mut self, key: &str, _value: &str) -> Result<(), StorageError> {
        tracing::debug!("No persistent storage; dropping write to {}", key);
        Ok(())
    }

    fn remove(&mut self, _key: &str) -> Result<(), StorageError> {
        Ok(())
    }
}
