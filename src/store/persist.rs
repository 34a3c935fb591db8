//! Namespaced JSON key-value persistence, standing in for browser local
//! storage. One file holds a flat object of key -> JSON value; every write
//! is flushed through to disk synchronously.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type PersistResult<T> = Result<T, PersistError>;

/// File-backed key-value store.
///
/// A missing or unparseable file is treated as empty: the previous session
/// is silently lost, which matches how the client swallowed local-storage
/// parse failures with a console log and a null fallback.
pub struct LocalStore {
    entries: RwLock<HashMap<String, serde_json::Value>>,
    path: Option<PathBuf>,
}

impl LocalStore {
    /// Open the store at `path`, creating parent directories as needed.
    pub fn open<P: AsRef<Path>>(path: P) -> PersistResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<HashMap<String, serde_json::Value>>(&raw) {
                Ok(entries) => entries,
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "discarding unparseable store file");
                    HashMap::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(err) => return Err(err.into()),
        };

        Ok(Self {
            entries: RwLock::new(entries),
            path: Some(path),
        })
    }

    /// Purely in-memory store (used by tests and the default test stores).
    pub fn in_memory() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            path: None,
        }
    }

    /// Read and deserialize the value under `key`. A malformed value is
    /// logged and reported as absent.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let entries = self.entries.read();
        let value = entries.get(key)?;
        match serde_json::from_value(value.clone()) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                tracing::warn!(key, error = %err, "stored value failed to deserialize");
                None
            }
        }
    }

    /// Serialize `value` under `key` and flush to disk.
    pub fn set_json<T: Serialize>(&self, key: &str, value: &T) -> PersistResult<()> {
        let serialized = serde_json::to_value(value)?;
        let mut entries = self.entries.write();
        entries.insert(key.to_string(), serialized);
        self.flush(&entries)
    }

    /// Remove `key`. Returns whether an entry was present.
    pub fn remove(&self, key: &str) -> PersistResult<bool> {
        let mut entries = self.entries.write();
        let removed = entries.remove(key).is_some();
        if removed {
            self.flush(&entries)?;
        }
        Ok(removed)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn flush(&self, entries: &HashMap<String, serde_json::Value>) -> PersistResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let raw = serde_json::to_string_pretty(entries)?;
        std::fs::write(path, raw)?;
        Ok(())
    }
}
