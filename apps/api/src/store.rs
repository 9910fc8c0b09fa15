//! Development key/value shim backed by a single JSON file.
//!
//! Every write rewrites the whole file. There is no locking: concurrent
//! writers race and the last one wins. Not a production store.
//!
//! `get` only reads memory. Async callers write through `set_async` and
//! `remove_async`, which run the file rewrite on the blocking pool.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub const TOKEN_KEY: &str = "token";

pub fn analysis_key(candidate_id: &str) -> String {
    format!("analysis:{candidate_id}")
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("store JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("store lock poisoned")]
    Poisoned,

    #[error("store write task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[derive(Debug)]
pub struct KeyValueStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, Value>>,
}

impl KeyValueStore {
    /// Opens the store, starting empty when the file does not exist yet.
    /// A corrupt file is logged and treated as empty.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let entries = match std::fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        error = %e,
                        "store file unreadable, starting empty"
                    );
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.display().to_string(),
                    source,
                })
            }
        };
        debug!(path = %path.display(), keys = entries.len(), "store opened");

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries
            .get(key)
            .map(|value| serde_json::from_value(value.clone()))
            .transpose()
            .map_err(StoreError::from)
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let value = serde_json::to_value(value)?;
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.insert(key.to_string(), value);
        self.flush(&entries)
    }

    /// Removes `key`; returns whether it was present.
    pub fn remove(&self, key: &str) -> Result<bool, StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        let existed = entries.remove(key).is_some();
        if existed {
            self.flush(&entries)?;
        }
        Ok(existed)
    }

    pub async fn set_async<T: Serialize>(
        self: &Arc<Self>,
        key: &str,
        value: &T,
    ) -> Result<(), StoreError> {
        let value = serde_json::to_value(value)?;
        let store = Arc::clone(self);
        let key = key.to_string();
        tokio::task::spawn_blocking(move || store.set(&key, &value)).await?
    }

    pub async fn remove_async(self: &Arc<Self>, key: &str) -> Result<bool, StoreError> {
        let store = Arc::clone(self);
        let key = key.to_string();
        tokio::task::spawn_blocking(move || store.remove(&key)).await?
    }

    fn flush(&self, entries: &BTreeMap<String, Value>) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(entries)?;
        std::fs::write(&self.path, bytes).map_err(|source| StoreError::Io {
            path: self.path.display().to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = KeyValueStore::open(dir.path().join("store.json")).unwrap();
        assert_eq!(store.get::<String>(TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let store = KeyValueStore::open(&path).unwrap();
        store.set(TOKEN_KEY, &"abc").unwrap();
        store.set(&analysis_key("7"), &vec![1, 2, 3]).unwrap();
        drop(store);

        let reopened = KeyValueStore::open(&path).unwrap();
        assert_eq!(
            reopened.get::<String>(TOKEN_KEY).unwrap().as_deref(),
            Some("abc")
        );
        assert_eq!(
            reopened.get::<Vec<u8>>("analysis:7").unwrap(),
            Some(vec![1, 2, 3])
        );
    }

    #[test]
    fn test_remove_and_last_writer_wins() {
        let dir = tempfile::tempdir().unwrap();
        let store = KeyValueStore::open(dir.path().join("s.json")).unwrap();
        store.set(TOKEN_KEY, &"one").unwrap();
        store.set(TOKEN_KEY, &"two").unwrap();
        assert_eq!(store.get::<String>(TOKEN_KEY).unwrap().as_deref(), Some("two"));

        assert!(store.remove(TOKEN_KEY).unwrap());
        assert!(!store.remove(TOKEN_KEY).unwrap());
        assert_eq!(store.get::<String>(TOKEN_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_async_writes_reach_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.json");
        let store = Arc::new(KeyValueStore::open(&path).unwrap());

        store.set_async(TOKEN_KEY, &"abc").await.unwrap();
        store.set_async(&analysis_key("9"), &vec![4, 5]).await.unwrap();
        assert_eq!(store.get::<String>(TOKEN_KEY).unwrap().as_deref(), Some("abc"));
        let on_disk = KeyValueStore::open(&path).unwrap();
        assert_eq!(on_disk.get::<Vec<u8>>("analysis:9").unwrap(), Some(vec![4, 5]));

        assert!(store.remove_async(TOKEN_KEY).await.unwrap());
        assert!(!store.remove_async(TOKEN_KEY).await.unwrap());
        let on_disk = KeyValueStore::open(&path).unwrap();
        assert_eq!(on_disk.get::<String>(TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.json");
        std::fs::write(&path, b"not json").unwrap();
        let store = KeyValueStore::open(&path).unwrap();
        assert_eq!(store.get::<String>(TOKEN_KEY).unwrap(), None);
    }
}
