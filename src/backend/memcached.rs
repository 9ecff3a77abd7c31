//! A Memcached-backed tier. Grounded in the original `MemcachedBackend`
//! (JSON-encoded values, `expire=ttl or 0`, `flush_all`). The `memcache`
//! crate's client is blocking, so every call is offloaded to
//! `tokio::task::spawn_blocking`, mirroring how the disk backend and the
//! original's thread-offloaded async wrappers bridge a blocking API into
//! the async profile.

use std::sync::Arc;

use async_trait::async_trait;

use crate::backend::Backend;
use crate::entry::CacheEntry;
use crate::error::{CacheError, Result};

pub struct MemcachedBackend {
    client: Arc<memcache::Client>,
}

impl MemcachedBackend {
    pub fn new(url: &str) -> Result<Self> {
        let client = memcache::Client::connect(url).map_err(|e| CacheError::Backend(Box::new(e)))?;
        Ok(MemcachedBackend { client: Arc::new(client) })
    }
}

async fn spawn_blocking_backend<F, T>(f: F) -> Result<T>
where
    F: FnOnce() -> std::result::Result<T, memcache::MemcacheError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| CacheError::Backend(Box::new(e)))?
        .map_err(|e| CacheError::Backend(Box::new(e)))
}

#[async_trait]
impl Backend for MemcachedBackend {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>> {
        let client = self.client.clone();
        let key = key.to_string();
        let raw: Option<Vec<u8>> = spawn_blocking_backend(move || client.get(&key)).await?;
        match raw {
            None => Ok(None),
            Some(bytes) => Ok(CacheEntry::from_json(&bytes).ok()),
        }
    }

    async fn set(&self, key: &str, entry: &CacheEntry, ttl: Option<std::time::Duration>) -> Result<()> {
        let client = self.client.clone();
        let key = key.to_string();
        let bytes = entry.to_json()?;
        let expire = ttl.map(|d| d.as_secs() as u32).unwrap_or(0);
        spawn_blocking_backend(move || client.set(&key, bytes.as_slice(), expire)).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let client = self.client.clone();
        let key = key.to_string();
        spawn_blocking_backend(move || client.delete(&key).map(|_| ())).await
    }

    async fn clear(&self) -> Result<()> {
        let client = self.client.clone();
        spawn_blocking_backend(move || client.flush()).await
    }

    fn name(&self) -> &'static str {
        "memcached"
    }
}
