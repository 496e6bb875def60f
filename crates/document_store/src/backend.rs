//! Key-value backend trait and implementations.
//!
//! The store serializes one blob per table; the backend only ever sees
//! opaque string values under namespaced keys. Every mutating operation
//! upstream is a full read-transform-write of a single blob, so the backend
//! needs no partial-update or append semantics.

use std::{collections::HashMap, io, path::PathBuf, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::StoreResult;

/// Trait for the flat key-value storage underneath the document store.
#[async_trait]
pub trait KeyValueBackend: Send + Sync {
    /// Reads the blob stored under `key`, if any.
    async fn read(&self, key: &str) -> StoreResult<Option<String>>;

    /// Writes `value` under `key`, replacing any previous blob.
    async fn write(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Removes the blob under `key`. Removing a missing key is a no-op.
    async fn remove(&self, key: &str) -> StoreResult<()>;
}

/// In-memory backend for testing purposes.
#[derive(Debug, Default, Clone)]
pub struct MemoryBackend {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryBackend {
    /// Creates a new in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueBackend for MemoryBackend {
    async fn read(&self, key: &str) -> StoreResult<Option<String>> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).cloned())
    }

    async fn write(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        let mut entries = self.entries.write().await;
        entries.remove(key);
        Ok(())
    }
}

/// File-backed backend: one JSON file per key under a data directory.
///
/// I/O failures other than a missing file surface as storage errors.
#[derive(Debug, Clone)]
pub struct FileBackend {
    root: PathBuf,
}

impl FileBackend {
    /// Creates a backend rooted at `root`. The directory is created on the
    /// first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

#[async_trait]
impl KeyValueBackend for FileBackend {
    async fn read(&self, key: &str) -> StoreResult<Option<String>> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn write(&self, key: &str, value: &str) -> StoreResult<()> {
        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::write(self.path_for(key), value).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_backend_round_trip() {
        let backend = MemoryBackend::new();

        assert_eq!(backend.read("billing_products").await.unwrap(), None);

        backend.write("billing_products", "[]").await.unwrap();
        assert_eq!(
            backend.read("billing_products").await.unwrap(),
            Some("[]".to_string())
        );

        backend.remove("billing_products").await.unwrap();
        assert_eq!(backend.read("billing_products").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_backend_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path());

        backend.write("billing_quotes", "[1,2]").await.unwrap();
        assert_eq!(
            backend.read("billing_quotes").await.unwrap(),
            Some("[1,2]".to_string())
        );

        // A second backend over the same directory sees the same data.
        let reopened = FileBackend::new(dir.path());
        assert_eq!(
            reopened.read("billing_quotes").await.unwrap(),
            Some("[1,2]".to_string())
        );
    }

    #[tokio::test]
    async fn test_file_backend_missing_key_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path());

        assert_eq!(backend.read("billing_users").await.unwrap(), None);
        // Removing a key that was never written is a no-op.
        backend.remove("billing_users").await.unwrap();
    }
}
