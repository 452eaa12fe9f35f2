//! JSON file storage implementation.
//!
//! Each key is a `<key>.json` file under the storage root. Writes go to a
//! temporary sibling first and are renamed into place, so a crash mid-write
//! leaves the previous blob intact.

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;
use super::{KvStore, Result, StorageError};

/// File-based JSON storage backend.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    /// Create storage rooted at `root`, creating the directory if needed.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    /// Storage root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn key_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(format!("{}.json", key)))
    }
}

#[async_trait::async_trait]
impl KvStore for JsonFileStore {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key)?;
        match fs::read_to_string(&path).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value.as_bytes()).await?;
        fs::rename(&tmp, &path).await?;
        debug!(key, bytes = value.len(), "saved blob");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_key_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path()).await.unwrap();
        assert!(store.load("fynkr_projects").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("data")).await.unwrap();

        store.save("fynkr_projects", "[1,2]").await.unwrap();
        store.save("fynkr_projects", "[3]").await.unwrap();

        assert_eq!(store.load("fynkr_projects").await.unwrap().as_deref(), Some("[3]"));
        assert!(dir.path().join("data").join("fynkr_projects.json").exists());
        assert!(!dir.path().join("data").join("fynkr_projects.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path()).await.unwrap();
        assert!(matches!(
            store.save("../escape", "x").await,
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(store.load("").await, Err(StorageError::InvalidKey(_))));
    }
}
