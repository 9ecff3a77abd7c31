//! A Redis-backed tier. Grounded in the original `RedisBackend`
//! (JSON-encoded values, `ex=ttl`, `flushdb`) and the `redis` crate's async
//! multiplexed connection. This is intentionally a thin wrapper, not a
//! tuned production client: no cluster support, no connection pooling
//! beyond what the multiplexed connection already gives for free.

use async_trait::async_trait;
use redis::AsyncCommands;

use crate::backend::Backend;
use crate::entry::CacheEntry;
use crate::error::{CacheError, Result};

pub struct RedisBackend {
    client: redis::Client,
}

impl RedisBackend {
    pub fn new(url: &str) -> Result<Self> {
        let client = redis::Client::open(url).map_err(|e| CacheError::Backend(Box::new(e)))?;
        Ok(RedisBackend { client })
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| CacheError::Backend(Box::new(e)))
    }
}

#[async_trait]
impl Backend for RedisBackend {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>> {
        let mut conn = self.connection().await?;
        let raw: Option<Vec<u8>> = conn.get(key).await.map_err(|e| CacheError::Backend(Box::new(e)))?;
        match raw {
            None => Ok(None),
            Some(bytes) => match CacheEntry::from_json(&bytes) {
                Ok(entry) => Ok(Some(entry)),
                Err(_) => {
                    log::warn!("discarding undecodable redis cache entry for key {key}");
                    let _: () = conn.del(key).await.map_err(|e| CacheError::Backend(Box::new(e)))?;
                    Ok(None)
                }
            },
        }
    }

    async fn set(&self, key: &str, entry: &CacheEntry, ttl: Option<std::time::Duration>) -> Result<()> {
        let mut conn = self.connection().await?;
        let bytes = entry.to_json()?;
        match ttl {
            Some(ttl) => {
                let _: () = conn
                    .set_ex(key, bytes, ttl.as_secs().max(1))
                    .await
                    .map_err(|e| CacheError::Backend(Box::new(e)))?;
            }
            None => {
                let _: () = conn.set(key, bytes).await.map_err(|e| CacheError::Backend(Box::new(e)))?;
            }
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.connection().await?;
        let _: () = conn.del(key).await.map_err(|e| CacheError::Backend(Box::new(e)))?;
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let mut conn = self.connection().await?;
        redis::cmd("FLUSHDB")
            .query_async::<()>(&mut conn)
            .await
            .map_err(|e| CacheError::Backend(Box::new(e)))
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}
