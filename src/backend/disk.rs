//! A filesystem-backed tier: one JSON file per key under a configured
//! directory. Grounded in the original `DiskBackend` (JSON-serialize whole
//! entry, write whole file) and adapted to async I/O via `tokio::fs`, which
//! offloads blocking filesystem calls to a worker thread internally.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::backend::Backend;
use crate::entry::CacheEntry;
use crate::error::{CacheError, Result};

pub struct DiskBackend {
    dir: PathBuf,
}

impl DiskBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DiskBackend { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    async fn ensure_dir(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| CacheError::Backend(Box::new(e)))
    }
}

#[async_trait]
impl Backend for DiskBackend {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>> {
        let path = self.path_for(key);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CacheError::Backend(Box::new(e))),
        };
        match CacheEntry::from_json(&bytes) {
            Ok(entry) => Ok(Some(entry)),
            Err(_) => {
                log::warn!("discarding undecodable disk cache entry at {}", path.display());
                let _ = tokio::fs::remove_file(&path).await;
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &str, entry: &CacheEntry, _ttl: Option<std::time::Duration>) -> Result<()> {
        self.ensure_dir().await?;
        let bytes = entry.to_json()?;
        tokio::fs::write(self.path_for(key), bytes)
            .await
            .map_err(|e| CacheError::Backend(Box::new(e)))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CacheError::Backend(Box::new(e))),
        }
    }

    async fn clear(&self) -> Result<()> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(CacheError::Backend(Box::new(e))),
        };
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| CacheError::Backend(Box::new(e)))?
        {
            let path: &Path = &entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                let _ = tokio::fs::remove_file(path).await;
            }
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "disk"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn entry() -> CacheEntry {
        CacheEntry::new("https://example.com", 200, None, HashMap::new(), b"body".to_vec(), None, "2024-01-01T00:00:00Z")
    }

    #[tokio::test]
    async fn set_then_get_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let backend = DiskBackend::new(dir.path());
        backend.set("k", &entry(), None).await.unwrap();
        assert_eq!(backend.get("k").await.unwrap(), Some(entry()));
    }

    #[tokio::test]
    async fn get_on_missing_key_is_none_not_error() {
        let dir = tempfile::tempdir().unwrap();
        let backend = DiskBackend::new(dir.path());
        assert_eq!(backend.get("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn delete_then_get_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let backend = DiskBackend::new(dir.path());
        backend.set("k", &entry(), None).await.unwrap();
        backend.delete("k").await.unwrap();
        assert_eq!(backend.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn clear_removes_all_entries() {
        let dir = tempfile::tempdir().unwrap();
        let backend = DiskBackend::new(dir.path());
        backend.set("a", &entry(), None).await.unwrap();
        backend.set("b", &entry(), None).await.unwrap();
        backend.clear().await.unwrap();
        assert_eq!(backend.get("a").await.unwrap(), None);
        assert_eq!(backend.get("b").await.unwrap(), None);
    }

    #[tokio::test]
    async fn undecodable_file_is_treated_as_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let backend = DiskBackend::new(dir.path());
        backend.ensure_dir().await.unwrap();
        tokio::fs::write(backend.path_for("k"), b"not json").await.unwrap();
        assert_eq!(backend.get("k").await.unwrap(), None);
    }
}
