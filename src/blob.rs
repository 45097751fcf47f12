//! Key-value persistence for serialized blobs.
//!
//! The store writes its entire state as one blob under one key. `FileBlobStore` keeps each key in
//! its own file; `MemoryBlobStore` keeps them in a shared map.

use crate::Result;
use anyhow::Context;
use std::collections::HashMap;
use std::fmt::Debug;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::trace;

/// A minimal string-to-string key-value store.
pub trait BlobStore: Debug {
    /// Returns the blob stored under `key`, or `None` if there is none.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the blob stored under `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    dir: PathBuf,
}

impl FileBlobStore {
    /// Creates a `FileBlobStore` rooted at `dir`. The directory must already exist.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The file that holds `key`.
    pub fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl BlobStore for FileBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path(key);
        match std::fs::read_to_string(&path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Unable to read {}", path.display())),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path(key);
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        trace!("Writing {} bytes to {}", value.len(), path.display());
        std::fs::write(&tmp, value)
            .with_context(|| format!("Unable to write to {}", tmp.display()))?;
        std::fs::rename(&tmp, &path).with_context(|| {
            format!(
                "Unable to move '{}' to '{}'",
                tmp.display(),
                path.display()
            )
        })
    }
}

/// An in-memory `BlobStore`. Clones share the same map, so a test can keep one handle and inspect
/// what the store persisted through the other.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    data: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.data
            .lock()
            .map_err(|_| anyhow::anyhow!("The in-memory blob store lock is poisoned"))
    }
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_store_missing_key() {
        let dir = TempDir::new().unwrap();
        let store = FileBlobStore::new(dir.path());
        assert_eq!(store.get("nothing").unwrap(), None);
    }

    #[test]
    fn test_file_store_set_get() {
        let dir = TempDir::new().unwrap();
        let mut store = FileBlobStore::new(dir.path());
        store.set("budgettracker.v1", "[]").unwrap();
        assert_eq!(store.get("budgettracker.v1").unwrap().as_deref(), Some("[]"));
        assert!(dir.path().join("budgettracker.v1.json").is_file());

        store.set("budgettracker.v1", "[1]").unwrap();
        assert_eq!(store.get("budgettracker.v1").unwrap().as_deref(), Some("[1]"));
        assert!(!dir.path().join(".budgettracker.v1.json.tmp").exists());
    }

    #[test]
    fn test_file_store_missing_dir_errors() {
        let dir = TempDir::new().unwrap();
        let mut store = FileBlobStore::new(dir.path().join("does-not-exist"));
        assert!(store.set("k", "v").is_err());
    }

    #[test]
    fn test_memory_store_clones_share_data() {
        let observer = MemoryBlobStore::new();
        let mut writer = observer.clone();
        writer.set("k", "v").unwrap();
        assert_eq!(observer.get("k").unwrap().as_deref(), Some("v"));
        assert_eq!(observer.get("other").unwrap(), None);
    }
}
