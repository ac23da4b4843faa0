use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

/// All the ways a slot store can fail
#[derive(Error, Debug)]
pub enum SlotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid slot key: {0}")]
    InvalidKey(String),
}

pub type Result<T> = std::result::Result<T, SlotError>;

/// A string-keyed slot store: get/set/remove one serialized blob per key.
///
/// This is deliberately dumb. No schema, no query language, no TTL.
/// Callers own serialization; the store only moves strings around.
/// There is also no read-modify-write locking across calls - two
/// concurrent mutations of the same key race and the last writer wins.
#[async_trait]
pub trait SlotStore: Send + Sync {
    /// Read the blob stored under `key`, or `None` if the slot is absent.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the blob under `key` in a single write.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete the slot entirely. Removing an absent slot is a no-op.
    async fn remove(&self, key: &str) -> Result<()>;
}

/// In-memory slot store for tests and ephemeral sessions
#[derive(Default)]
pub struct MemorySlotStore {
    slots: Mutex<HashMap<String, String>>,
}

impl MemorySlotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SlotStore for MemorySlotStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        Ok(slots.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        slots.remove(key);
        Ok(())
    }
}

/// File-backed slot store - one JSON file per key under a base directory
///
/// Keys map straight to file names (`favorites` -> `favorites.json`),
/// so they are restricted to a safe alphabet. Writes replace the whole
/// file, which keeps the "single write per mutation" contract simple.
pub struct FileSlotStore {
    base_dir: PathBuf,
}

impl FileSlotStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn slot_path(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty()
            || !key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(SlotError::InvalidKey(key.to_string()));
        }
        Ok(self.base_dir.join(format!("{}.json", key)))
    }
}

#[async_trait]
impl SlotStore for FileSlotStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.slot_path(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Slot {} is absent", key);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.slot_path(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, value).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.slot_path(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemorySlotStore::new();

        assert_eq!(store.get("favorites").await.unwrap(), None);

        store.set("favorites", "[1,2,3]").await.unwrap();
        assert_eq!(
            store.get("favorites").await.unwrap(),
            Some("[1,2,3]".to_string())
        );

        store.remove("favorites").await.unwrap();
        assert_eq!(store.get("favorites").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_store_set_replaces() {
        let store = MemorySlotStore::new();

        store.set("k", "old").await.unwrap();
        store.set("k", "new").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some("new".to_string()));
    }

    #[tokio::test]
    async fn test_remove_absent_slot_is_noop() {
        let store = MemorySlotStore::new();
        assert!(store.remove("never-set").await.is_ok());
    }

    #[tokio::test]
    async fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSlotStore::new(dir.path());

        assert_eq!(store.get("favorites").await.unwrap(), None);

        store.set("favorites", r#"[{"id":"p1"}]"#).await.unwrap();
        assert_eq!(
            store.get("favorites").await.unwrap(),
            Some(r#"[{"id":"p1"}]"#.to_string())
        );

        store.remove("favorites").await.unwrap();
        assert_eq!(store.get("favorites").await.unwrap(), None);
        // Removing twice should still be fine
        store.remove("favorites").await.unwrap();
    }

    #[tokio::test]
    async fn test_file_store_creates_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSlotStore::new(dir.path().join("nested").join("data"));

        store.set("favorites", "[]").await.unwrap();
        assert_eq!(store.get("favorites").await.unwrap(), Some("[]".into()));
    }

    #[tokio::test]
    async fn test_file_store_rejects_path_traversal_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSlotStore::new(dir.path());

        assert!(matches!(
            store.get("../escape").await,
            Err(SlotError::InvalidKey(_))
        ));
        assert!(matches!(
            store.set("", "x").await,
            Err(SlotError::InvalidKey(_))
        ));
    }
}
