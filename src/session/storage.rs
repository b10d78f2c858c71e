//! Persistence store backends
//!
//! The store is a small async key-value interface over JSON values.
//! [`FileStore`] keeps every key in one JSON document, by default
//! `~/.config/tab-session/store.json`; [`MemoryStore`] keeps them in memory.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from a persistence store backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to {action} store file {path:?}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("store data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Async key-value persistence
///
/// Both operations may suspend; callers treat them as fire-and-forget from
/// the session's point of view.
#[allow(async_fn_in_trait)]
pub trait PersistenceStore {
    /// Read the value stored under `key`
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Read-modify-write the value stored under `key`
    ///
    /// `updater` receives the current value (if any) and returns the new one.
    async fn update<F>(&self, key: &str, updater: F) -> Result<(), StoreError>
    where
        F: FnOnce(Option<Value>) -> Value;
}

// ── MemoryStore ──────────────────────────────────────────────────────────────

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a value directly (e.g. data written by an older version)
    pub fn insert(&self, key: impl Into<String>, value: Value) {
        self.values.lock().insert(key.into(), value);
    }

    pub fn snapshot(&self, key: &str) -> Option<Value> {
        self.values.lock().get(key).cloned()
    }
}

impl PersistenceStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.values.lock().get(key).cloned())
    }

    async fn update<F>(&self, key: &str, updater: F) -> Result<(), StoreError>
    where
        F: FnOnce(Option<Value>) -> Value,
    {
        let mut values = self.values.lock();
        let current = values.remove(key);
        values.insert(key.to_string(), updater(current));
        Ok(())
    }
}

// ── FileStore ────────────────────────────────────────────────────────────────

/// On-disk layout of a [`FileStore`]
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreDocument {
    /// Timestamp of the last write (RFC 3339)
    #[serde(default)]
    pub saved_at: String,
    #[serde(default)]
    pub entries: BTreeMap<String, Value>,
}

/// Store backed by a single JSON file
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default location
    pub fn at_default_location() -> Self {
        Self::new(default_store_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole document
    ///
    /// Returns `None` if the file doesn't exist or is empty.
    /// Returns an error if the file exists but is corrupt.
    pub async fn load_document(&self) -> Result<Option<StoreDocument>, StoreError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    action: "read",
                    path: self.path.clone(),
                    source,
                });
            }
        };

        if contents.trim().is_empty() {
            return Ok(None);
        }

        let document: StoreDocument = serde_json::from_str(&contents)?;
        log::debug!(
            "Loaded store document ({} keys) from {:?}",
            document.entries.len(),
            self.path
        );
        Ok(Some(document))
    }

    async fn write_document(&self, document: &StoreDocument) -> Result<(), StoreError> {
        let io_err = |action, source| StoreError::Io {
            action,
            path: self.path.clone(),
            source,
        };

        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| io_err("create directory for", e))?;
        }

        let contents = serde_json::to_string_pretty(document)?;

        // Atomic save: write to temp file then rename to prevent corruption on crash
        let temp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, contents)
            .await
            .map_err(|e| io_err("write", e))?;
        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| io_err("replace", e))?;
        Ok(())
    }
}

impl PersistenceStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self
            .load_document()
            .await?
            .and_then(|mut document| document.entries.remove(key)))
    }

    async fn update<F>(&self, key: &str, updater: F) -> Result<(), StoreError>
    where
        F: FnOnce(Option<Value>) -> Value,
    {
        let mut document = self.load_document().await?.unwrap_or_default();
        let current = document.entries.remove(key);
        document.entries.insert(key.to_string(), updater(current));
        document.saved_at = chrono::Utc::now().to_rfc3339();
        self.write_document(&document).await?;
        log::info!("Saved store key {:?} to {:?}", key, self.path);
        Ok(())
    }
}

/// Get the path to the default store file
pub fn default_store_path() -> PathBuf {
    tab_session_config::Config::config_dir().join("store.json")
}
