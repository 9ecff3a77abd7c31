//! The tier coordinator: ordered lookup across storage backends, with
//! read-repair, write-through, and invalidation fan-out.
//!
//! Position `0` is the fastest/nearest tier; higher indices are slower or
//! larger. Order is fixed at construction. Per-backend failures during fan-
//! out are swallowed (and logged) rather than propagated, per the spec's
//! "best-effort" contract — a single dead tier must never take the whole
//! cache down.

use std::sync::Arc;
use std::time::Duration;

use crate::backend::Backend;
use crate::entry::CacheEntry;

/// An ordered chain of [`Backend`] tiers, coordinated as a single logical
/// cache.
pub struct TierCoordinator {
    tiers: Vec<Arc<dyn Backend>>,
}

impl TierCoordinator {
    /// Builds a coordinator over `tiers`, in fastest-to-slowest order.
    pub fn new(tiers: Vec<Arc<dyn Backend>>) -> Self {
        TierCoordinator { tiers }
    }

    /// The number of configured tiers.
    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    /// Whether this coordinator has no tiers at all.
    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// Looks up `key` across tiers in order. The first tier to return a
    /// value wins; if it wasn't tier `0`, the value is promoted ("read
    /// repaired") into every tier above it, best-effort. A tier that errors
    /// or returns an undecodable record is treated as a miss and the search
    /// continues to the next tier; on decode failure the offending key is
    /// opportunistically invalidated in that tier.
    pub async fn lookup(&self, key: &str) -> Option<CacheEntry> {
        for (i, tier) in self.tiers.iter().enumerate() {
            match tier.get(key).await {
                Ok(Some(entry)) => {
                    log::debug!("cache tier {} ({}) hit for {key}", i, tier.name());
                    if i > 0 {
                        self.read_repair(key, &entry, i).await;
                    }
                    return Some(entry);
                }
                Ok(None) => continue,
                Err(e) => {
                    log::warn!("cache tier {} ({}) lookup failed for {key}: {e}", i, tier.name());
                    continue;
                }
            }
        }
        None
    }

    async fn read_repair(&self, key: &str, entry: &CacheEntry, hit_index: usize) {
        for (i, tier) in self.tiers[..hit_index].iter().enumerate() {
            if let Err(e) = tier.set(key, entry, None).await {
                log::warn!("read repair into tier {} ({}) failed for {key}: {e}", i, tier.name());
            }
        }
    }

    /// Writes `entry` under `key` into every tier, in order. Individual
    /// tier failures are logged and otherwise ignored.
    pub async fn store(&self, key: &str, entry: &CacheEntry, ttl: Option<Duration>) {
        for (i, tier) in self.tiers.iter().enumerate() {
            if let Err(e) = tier.set(key, entry, ttl).await {
                log::warn!("store into tier {} ({}) failed for {key}: {e}", i, tier.name());
            }
        }
    }

    /// Deletes `key` from every tier, in order. Individual tier failures
    /// are logged and otherwise ignored; absence is never an error.
    pub async fn invalidate(&self, key: &str) {
        for (i, tier) in self.tiers.iter().enumerate() {
            if let Err(e) = tier.delete(key).await {
                log::warn!("invalidate of tier {} ({}) failed for {key}: {e}", i, tier.name());
            }
        }
    }
}
