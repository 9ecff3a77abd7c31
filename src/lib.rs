//! `cachio` is an RFC 7234 HTTP client-side caching middleware: a decorator
//! over a transport capability ([`middleware::Middleware`]) that consults an
//! ordered chain of storage [`backend::Backend`] tiers, classifies any hit
//! with the freshness engine, revalidates or refetches as needed, and
//! annotates the result with `x-cache: hits|miss`.
//!
//! ## Example
//!
//! ```no_run
//! use std::collections::HashSet;
//! use std::sync::Arc;
//!
//! use cachio::backend::memory::MemoryBackend;
//! use cachio::cache::HttpCache;
//!
//! # async fn run(mut middleware: impl cachio::middleware::Middleware) -> cachio::error::Result<()> {
//! let cache = HttpCache::new(vec![Arc::new(MemoryBackend::default())], HashSet::from([200]));
//! let response = cache.send(&mut middleware).await?;
//! assert!(response.header("x-cache").is_some());
//! # Ok(())
//! # }
//! ```
//!
//! ## Supported backends
//!
//! - [`backend::memory::MemoryBackend`] (always available): a bounded,
//!   in-process LRU cache with lazy TTL expiry.
//! - [`backend::disk::DiskBackend`] (always available): one JSON file per
//!   key under a configured directory.
//! - `backend::redis::RedisBackend` (feature `backend-redis`).
//! - `backend::memcached::MemcachedBackend` (feature `backend-memcached`).
//!
//! Tiers are composed by passing multiple backends, in fastest-to-slowest
//! order, to [`cache::HttpCache::new`]; see [`tier::TierCoordinator`] for
//! the read-repair/write-through/invalidation policy that ties them
//! together.
//!
//! ## Non-goals
//!
//! Request coalescing (single-flight), `Vary`-aware keying, `Range`
//! (partial-content) caching, cross-process coherence beyond what a chosen
//! backend offers, and authentication-aware (`private`/`s-maxage`) caching
//! are all out of scope — see the crate's design notes for why.

#![forbid(unsafe_code)]
#![warn(missing_docs, future_incompatible, rust_2018_idioms)]

pub mod backend;
pub mod cache;
pub mod config;
pub mod directive;
pub mod entry;
pub mod error;
pub mod freshness;
pub mod key;
pub mod middleware;
pub mod response;
pub mod revalidation;
pub mod stale_if_error;
pub mod tier;

pub use cache::HttpCache;
pub use config::HttpCacheOptions;
pub use entry::CacheEntry;
pub use error::{CacheError, Result};
pub use middleware::Middleware;
pub use response::HttpResponse;
