//! Redis cache implementation.
//!
//! Values are stored as raw bytes. TTLs are applied with `SET EX`, rounded up
//! to whole seconds. `invalidate_all` flushes the selected database, so the
//! cache should own a dedicated Redis database.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;

use journalsync_core::cache::{Cache, CacheError, Result};

use super::error::map_redis_error;

/// Redis cache backend using connection manager for pooling.
pub struct RedisCache {
    conn: redis::aio::ConnectionManager,
    op_timeout: Duration,
}

impl RedisCache {
    /// Creates a new Redis cache connection.
    ///
    /// # Arguments
    ///
    /// * `url` - Redis connection URL (e.g., "redis://localhost:6379")
    /// * `op_timeout` - Upper bound for each cache command
    ///
    /// # Errors
    ///
    /// Returns `CacheError::ConnectionFailed` if the connection cannot be established.
    pub async fn new(url: &str, op_timeout: Duration) -> Result<Self> {
        let client = redis::Client::open(url).map_err(map_redis_error)?;
        let conn = with_timeout(op_timeout, async {
            redis::aio::ConnectionManager::new(client)
                .await
                .map_err(map_redis_error)
        })
        .await?;
        Ok(Self { conn, op_timeout })
    }
}

/// Runs a cache command, turning an elapsed deadline into `CacheError::Timeout`.
async fn with_timeout<T, F>(limit: Duration, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(CacheError::Timeout(limit.as_millis() as u64)),
    }
}

/// Seconds for `SET EX`, rounding sub-second TTLs up. `None` for a zero TTL,
/// which is written as a delete so the key reads as absent right away.
fn ttl_seconds(ttl: Duration) -> Option<u64> {
    if ttl.is_zero() {
        return None;
    }
    let secs = ttl.as_secs();
    Some(if ttl.subsec_nanos() > 0 { secs + 1 } else { secs })
}

#[async_trait]
impl Cache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.conn.clone();
        with_timeout(self.op_timeout, async move {
            conn.get::<_, Option<Vec<u8>>>(key)
                .await
                .map_err(map_redis_error)
        })
        .await
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()> {
        let mut conn = self.conn.clone();
        with_timeout(self.op_timeout, async move {
            match ttl.map(ttl_seconds) {
                Some(Some(seconds)) => conn
                    .set_ex::<_, _, ()>(key, value, seconds)
                    .await
                    .map_err(map_redis_error),
                Some(None) => conn.del::<_, ()>(key).await.map_err(map_redis_error),
                None => conn
                    .set::<_, _, ()>(key, value)
                    .await
                    .map_err(map_redis_error),
            }
        })
        .await
    }

    async fn invalidate_all(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        with_timeout(self.op_timeout, async move {
            redis::cmd("FLUSHDB")
                .query_async::<()>(&mut conn)
                .await
                .map_err(map_redis_error)
        })
        .await?;
        tracing::debug!("Redis cache database flushed");
        Ok(())
    }
}
