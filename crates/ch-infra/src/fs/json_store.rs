//! Whole-file JSON document store.
//!
//! The file holds one serialized `T`. Writes go to a sibling temp file that
//! is then renamed over the target, so a crash mid-write leaves the previous
//! document intact.

use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

pub struct JsonFileStore<T> {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
    _doc: PhantomData<fn() -> T>,
}

impl<T> JsonFileStore<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
            _doc: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing or blank files read as `T::default()`.
    pub async fn load(&self) -> anyhow::Result<T> {
        if !fs::try_exists(&self.path).await? {
            return Ok(T::default());
        }

        let content = fs::read_to_string(&self.path)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", self.path.display()))?;
        if content.trim().is_empty() {
            return Ok(T::default());
        }

        serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {e}", self.path.display()))
    }

    /// Load, apply `f`, and write back while holding the store lock.
    pub async fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> anyhow::Result<R> {
        let _guard = self.write_lock.lock().await;
        let mut doc = self.load().await?;
        let out = f(&mut doc);
        self.write(&doc).await?;
        Ok(out)
    }

    async fn write(&self, doc: &T) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(doc)
            .map_err(|e| anyhow::anyhow!("Failed to serialize {}: {e}", self.path.display()))?;

        let tmp_path = self.path.with_extension("json.tmp");
        let mut file = fs::File::create(&tmp_path)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to create {}: {e}", tmp_path.display()))?;
        file.write_all(json.as_bytes())
            .await
            .map_err(|e| anyhow::anyhow!("Failed to write {}: {e}", tmp_path.display()))?;
        file.sync_all()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to sync {}: {e}", tmp_path.display()))?;
        drop(file);

        fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to replace {}: {e}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn missing_file_loads_default() {
        let temp_dir = TempDir::new().unwrap();
        let store: JsonFileStore<Vec<u32>> = JsonFileStore::new(temp_dir.path().join("missing.json"));

        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_file_loads_default() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty.json");
        fs::write(&path, "  \n").await.unwrap();

        let store: JsonFileStore<Vec<u32>> = JsonFileStore::new(path);

        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn invalid_json_returns_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("invalid.json");
        fs::write(&path, "{invalid json").await.unwrap();

        let store: JsonFileStore<Vec<u32>> = JsonFileStore::new(path);
        let result = store.load().await;

        assert!(result.unwrap_err().to_string().contains("Failed to parse"));
    }

    #[tokio::test]
    async fn update_creates_parent_dirs_and_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("doc.json");
        let store: JsonFileStore<Vec<u32>> = JsonFileStore::new(path.clone());

        let len = store
            .update(|doc| {
                doc.extend([1, 2, 3]);
                doc.len()
            })
            .await
            .unwrap();

        assert_eq!(len, 3);
        assert_eq!(store.load().await.unwrap(), vec![1, 2, 3]);
        assert!(!path.with_extension("json.tmp").exists());
    }
}
