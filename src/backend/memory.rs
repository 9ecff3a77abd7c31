//! The reference in-memory backend: an LRU map with lazy per-entry TTL
//! expiry, shared by both the synchronous and asynchronous profiles over
//! the same mutex-guarded core (see the crate's concurrency model notes).

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use lru::LruCache;

use crate::backend::Backend;
use crate::entry::CacheEntry;
use crate::error::Result;

struct Slot {
    entry: CacheEntry,
    expires_at: Option<Instant>,
}

struct Inner {
    cache: LruCache<String, Slot>,
}

/// A bounded, in-process cache. Entries past their TTL are evicted lazily
/// on the next `get`/`set` that touches them; entries beyond `capacity`
/// are evicted least-recently-used first.
pub struct MemoryBackend {
    inner: Mutex<Inner>,
}

impl MemoryBackend {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::new(1).unwrap());
        MemoryBackend {
            inner: Mutex::new(Inner { cache: LruCache::new(capacity) }),
        }
    }

    /// Synchronous lookup, for callers in the parallel-threaded profile
    /// that never cross an `.await` point.
    pub fn get_sync(&self, key: &str) -> Option<CacheEntry> {
        let mut inner = self.inner.lock().expect("memory backend mutex poisoned");
        let expired = match inner.cache.peek(key) {
            Some(slot) => slot.expires_at.is_some_and(|at| Instant::now() >= at),
            None => return None,
        };
        if expired {
            inner.cache.pop(key);
            return None;
        }
        inner.cache.get(key).map(|slot| slot.entry.clone())
    }

    /// Synchronous insert.
    pub fn set_sync(&self, key: &str, entry: CacheEntry, ttl: Option<Duration>) {
        let mut inner = self.inner.lock().expect("memory backend mutex poisoned");
        let expires_at = ttl.map(|d| Instant::now() + d);
        inner.cache.put(key.to_string(), Slot { entry, expires_at });
    }

    /// Synchronous delete.
    pub fn delete_sync(&self, key: &str) {
        let mut inner = self.inner.lock().expect("memory backend mutex poisoned");
        inner.cache.pop(key);
    }

    /// Synchronous clear.
    pub fn clear_sync(&self) {
        let mut inner = self.inner.lock().expect("memory backend mutex poisoned");
        inner.cache.clear();
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.inner.lock().expect("memory backend mutex poisoned").cache.len()
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        MemoryBackend::new(256)
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>> {
        Ok(self.get_sync(key))
    }

    async fn set(&self, key: &str, entry: &CacheEntry, ttl: Option<Duration>) -> Result<()> {
        self.set_sync(key, entry.clone(), ttl);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.delete_sync(key);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.clear_sync();
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> CacheEntry {
        CacheEntry::new("https://example.com", 200, None, HashMap::new(), vec![1, 2, 3], None, "2024-01-01T00:00:00Z")
    }

    #[tokio::test]
    async fn set_then_get_round_trips() {
        let backend = MemoryBackend::new(4);
        backend.set("k", &entry(), None).await.unwrap();
        let got = backend.get("k").await.unwrap();
        assert_eq!(got, Some(entry()));
    }

    #[tokio::test]
    async fn ttl_expiry_removes_after_deadline() {
        let backend = MemoryBackend::new(4);
        backend.set("k", &entry(), Some(Duration::from_millis(1))).await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(backend.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn lru_eviction_evicts_least_recently_used() {
        let backend = MemoryBackend::new(2);
        backend.set("a", &entry(), None).await.unwrap();
        backend.set("b", &entry(), None).await.unwrap();
        // touch "a" so "b" becomes the least recently used
        backend.get("a").await.unwrap();
        backend.set("c", &entry(), None).await.unwrap();
        assert_eq!(backend.get("b").await.unwrap(), None);
        assert!(backend.get("a").await.unwrap().is_some());
        assert!(backend.get("c").await.unwrap().is_some());
        assert_eq!(backend.len(), 2);
    }

    #[tokio::test]
    async fn delete_removes_entry() {
        let backend = MemoryBackend::new(4);
        backend.set("k", &entry(), None).await.unwrap();
        backend.delete("k").await.unwrap();
        assert_eq!(backend.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn clear_removes_all_entries() {
        let backend = MemoryBackend::new(4);
        backend.set("a", &entry(), None).await.unwrap();
        backend.set("b", &entry(), None).await.unwrap();
        backend.clear().await.unwrap();
        assert_eq!(backend.len(), 0);
    }
}
