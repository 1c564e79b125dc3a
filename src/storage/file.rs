//! JSON-file-backed key-value store.
//!
//! On-device stand-in for platform storage: all keys live in one JSON
//! document that is read at open and rewritten whole on every mutation.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::storage::{KeyValueStore, StorageError};

/// File-backed store; the document maps keys to their JSON values.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, Value>>,
}

impl FileStore {
    /// Open the store, loading an existing document if one is present.
    ///
    /// An unreadable document is logged and replaced with an empty one at
    /// the next write; startup never fails on bad content, only on I/O
    /// errors.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();

        let entries = if path.exists() {
            let raw = std::fs::read_to_string(&path).map_err(|e| {
                StorageError::Persistence(format!("failed to read {}: {}", path.display(), e))
            })?;
            match serde_json::from_str(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "store file unreadable, starting empty");
                    HashMap::new()
                }
            }
        } else {
            HashMap::new()
        };

        tracing::info!(path = %path.display(), "file store opened");
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Default on-device location, preferring the platform data directory.
    pub fn default_path() -> PathBuf {
        let base = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(std::env::temp_dir);
        base.join("habitify").join("store.json")
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Value>>, StorageError> {
        self.entries
            .lock()
            .map_err(|_| StorageError::Persistence("store mutex poisoned".to_string()))
    }

    fn flush(path: &Path, entries: &HashMap<String, Value>) -> Result<(), StorageError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StorageError::Persistence(format!("failed to create {}: {}", parent.display(), e))
            })?;
        }
        let raw = serde_json::to_string_pretty(entries)?;
        std::fs::write(path, raw).map_err(|e| {
            StorageError::Persistence(format!("failed to write {}: {}", path.display(), e))
        })
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        Ok(self.lock()?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        let mut entries = self.lock()?;
        entries.insert(key.to_string(), value);
        Self::flush(&self.path, &entries)
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.lock()?;
        entries.remove(key);
        Self::flush(&self.path, &entries)
    }

    async fn clear(&self) -> Result<(), StorageError> {
        let mut entries = self.lock()?;
        entries.clear();
        Self::flush(&self.path, &entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        {
            let store = FileStore::open(&path).unwrap();
            store.set("k", json!([1, 2, 3])).await.unwrap();
        }

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(json!([1, 2, 3])));
    }

    #[tokio::test]
    async fn test_garbage_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "not json {{{").unwrap();

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_clear_removes_document_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let store = FileStore::open(&path).unwrap();
        store.set("a", json!(1)).await.unwrap();
        store.clear().await.unwrap();
        store.clear().await.unwrap();

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get("a").await.unwrap(), None);
    }
}
