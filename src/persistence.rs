//! Persistent key/value storage
//!
//! String values keyed by name, in the shape of browser local storage.
//! [`JsonFileStorage`] re-reads its file on every access so separate
//! processes sharing the file see each other's writes.

use anyhow::{Context, Result};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, warn};

pub trait KeyValueStorage {
    fn get_string(&self, key: &str) -> Option<String>;
    fn set_string(&self, key: &str, value: &str) -> Result<()>;
}

/// Flat JSON object on disk: `{"key": "value", ...}`
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing or unreadable files read as empty
    fn read_entries(&self) -> BTreeMap<String, String> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(_) => return BTreeMap::new(),
        };

        serde_json::from_str(&contents).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "Storage file is malformed, treating as empty");
            BTreeMap::new()
        })
    }
}

impl KeyValueStorage for JsonFileStorage {
    fn get_string(&self, key: &str) -> Option<String> {
        self.read_entries().remove(key)
    }

    fn set_string(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.read_entries();
        entries.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create storage directory {:?}", parent))?;
        }

        let json = serde_json::to_string_pretty(&entries).context("Failed to serialize storage")?;

        // Write then rename so readers never see a half-written file
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).with_context(|| format!("Failed to write storage to {:?}", tmp))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace storage file {:?}", self.path))?;

        debug!(key = %key, value = %value, path = %self.path.display(), "Persisted storage entry");
        Ok(())
    }
}

/// Shared in-memory storage; clones see the same entries
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_string(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.get(key).cloned()
    }

    fn set_string(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_storage_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("nested/storage.json"));

        assert_eq!(storage.get_string("k"), None);
        storage.set_string("k", "true").unwrap();
        storage.set_string("other", "1").unwrap();
        assert_eq!(storage.get_string("k").as_deref(), Some("true"));
        assert_eq!(storage.get_string("other").as_deref(), Some("1"));
    }

    #[test]
    fn test_file_storage_sees_writes_from_another_handle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        let first = JsonFileStorage::new(&path);
        let second = JsonFileStorage::new(&path);

        first.set_string("k", "false").unwrap();
        assert_eq!(second.get_string("k").as_deref(), Some("false"));
    }

    #[test]
    fn test_malformed_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "][").unwrap();

        let storage = JsonFileStorage::new(&path);
        assert_eq!(storage.get_string("k"), None);

        // Writing repairs it
        storage.set_string("k", "true").unwrap();
        assert_eq!(storage.get_string("k").as_deref(), Some("true"));
    }

    #[test]
    fn test_memory_storage_clones_share_entries() {
        let a = MemoryStorage::new();
        let b = a.clone();
        a.set_string("k", "v").unwrap();
        assert_eq!(b.get_string("k").as_deref(), Some("v"));
    }
}
