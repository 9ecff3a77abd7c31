//! Storage backend contract and implementations.
//!
//! A [`Backend`] is a key-value store keyed by the 32-character hex cache
//! key from [`crate::key::fingerprint`], with values stored as
//! [`CacheEntry`]. Implementations are responsible only for the four
//! operations below; cross-tier coordination lives in [`crate::tier`].

use async_trait::async_trait;

use crate::entry::CacheEntry;
use crate::error::Result;

pub mod memory;

pub mod disk;

#[cfg(feature = "backend-redis")]
pub mod redis;

#[cfg(feature = "backend-memcached")]
pub mod memcached;

/// A single cache storage tier.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Looks up a key, returning `None` on a miss. A decode failure is
    /// surfaced as `Ok(None)` by well-behaved implementations (treated as
    /// a miss by the tier coordinator), not as an error — only operational
    /// failures (I/O errors, connection failures) should return `Err`.
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>>;

    /// Stores `entry` under `key` with the given time-to-live. A `ttl` of
    /// `None` means "no expiry" for backends that support it.
    async fn set(&self, key: &str, entry: &CacheEntry, ttl: Option<std::time::Duration>) -> Result<()>;

    /// Removes a single key. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Removes every entry this backend holds.
    async fn clear(&self) -> Result<()>;

    /// A short name for this backend, used only in log messages.
    fn name(&self) -> &'static str;
}
