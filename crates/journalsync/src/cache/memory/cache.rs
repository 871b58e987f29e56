//! In-memory cache implementation with LRU eviction.
//!
//! Provides a thread-safe in-memory cache with TTL support using
//! tokio synchronization primitives and LRU eviction policy.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use lru::LruCache;
use tokio::sync::Mutex;

use journalsync_core::cache::{Cache, CacheError, Result};

/// A single cache entry with optional expiration.
#[derive(Debug, Clone)]
struct CacheEntry {
    value: Vec<u8>,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    /// Creates a new cache entry with optional TTL.
    fn new(value: Vec<u8>, ttl: Option<Duration>) -> Self {
        let expires_at = ttl.map(|d| Instant::now() + d);
        Self { value, expires_at }
    }

    /// Returns true if this entry has expired.
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|exp| now >= exp)
    }
}

/// In-memory cache implementation with LRU eviction.
///
/// Expiry is lazy: an expired entry is dropped the next time its key is read.
/// Reads refresh LRU recency but never the TTL.
#[derive(Debug, Clone)]
pub struct MemoryCache {
    store: Arc<Mutex<LruCache<String, CacheEntry>>>,
}

impl MemoryCache {
    /// Creates a new in-memory cache holding at most `max_entries` keys.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::OperationFailed` if `max_entries` is 0.
    pub fn new(max_entries: usize) -> Result<Self> {
        let capacity = NonZeroUsize::new(max_entries).ok_or_else(|| {
            CacheError::OperationFailed("max_entries must be greater than zero".to_string())
        })?;
        Ok(Self {
            store: Arc::new(Mutex::new(LruCache::new(capacity))),
        })
    }

    /// Number of physically stored entries, expired or not.
    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.store.lock().await.len()
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut store = self.store.lock().await;

        match store.get(key) {
            Some(entry) if entry.is_expired(Instant::now()) => {
                store.pop(key);
                Ok(None)
            }
            Some(entry) => Ok(Some(entry.value.clone())),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()> {
        let mut store = self.store.lock().await;
        store.put(key.to_string(), CacheEntry::new(value.to_vec(), ttl));
        Ok(())
    }

    async fn invalidate_all(&self) -> Result<()> {
        let mut store = self.store.lock().await;
        let dropped = store.len();
        store.clear();
        tracing::debug!(dropped, "Memory cache invalidated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Default max entries for tests
    const TEST_MAX_ENTRIES: usize = 1000;

    #[tokio::test]
    async fn test_set_and_get() {
        let cache = MemoryCache::new(TEST_MAX_ENTRIES).unwrap();
        let key = "test:key";
        let value = b"test value";

        cache.set(key, value, None).await.unwrap();
        let result = cache.get(key).await.unwrap();

        assert_eq!(result, Some(value.to_vec()));
    }

    #[tokio::test]
    async fn test_get_nonexistent() {
        let cache = MemoryCache::new(TEST_MAX_ENTRIES).unwrap();
        let result = cache.get("nonexistent:key").await.unwrap();

        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_set_replaces_existing_value() {
        let cache = MemoryCache::new(TEST_MAX_ENTRIES).unwrap();

        cache.set("k", b"first", None).await.unwrap();
        cache.set("k", b"second", None).await.unwrap();

        assert_eq!(cache.get("k").await.unwrap(), Some(b"second".to_vec()));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_ttl_expiration() {
        let cache = MemoryCache::new(TEST_MAX_ENTRIES).unwrap();
        let key = "test:ttl";
        let value = b"short-lived";

        // Set with a very short TTL
        cache
            .set(key, value, Some(Duration::from_millis(50)))
            .await
            .unwrap();

        // Should exist immediately
        assert!(cache.get(key).await.unwrap().is_some());

        // Wait for expiration
        tokio::time::sleep(Duration::from_millis(100)).await;

        // Should be expired now, and dropped from the store
        assert!(cache.get(key).await.unwrap().is_none());
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn test_zero_ttl_reads_as_absent() {
        let cache = MemoryCache::new(TEST_MAX_ENTRIES).unwrap();
        cache.set("k", b"old", None).await.unwrap();

        cache.set("k", b"new", Some(Duration::ZERO)).await.unwrap();

        assert!(cache.get("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_does_not_extend_ttl() {
        let cache = MemoryCache::new(TEST_MAX_ENTRIES).unwrap();
        cache
            .set("k", b"v", Some(Duration::from_millis(80)))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(cache.get("k").await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(cache.get("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_resets_expiry() {
        let cache = MemoryCache::new(TEST_MAX_ENTRIES).unwrap();
        cache
            .set("k", b"old", Some(Duration::from_millis(20)))
            .await
            .unwrap();
        cache.set("k", b"new", None).await.unwrap();

        tokio::time::sleep(Duration::from_millis(40)).await;

        assert_eq!(cache.get("k").await.unwrap(), Some(b"new".to_vec()));
    }

    #[tokio::test]
    async fn test_invalidate_all() {
        let cache = MemoryCache::new(TEST_MAX_ENTRIES).unwrap();

        cache.set("weather_of_paris", b"1", None).await.unwrap();
        cache
            .set("weather_of_oslo", b"2", Some(Duration::from_secs(300)))
            .await
            .unwrap();

        cache.invalidate_all().await.unwrap();

        assert!(cache.get("weather_of_paris").await.unwrap().is_none());
        assert!(cache.get("weather_of_oslo").await.unwrap().is_none());
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn test_lru_eviction() {
        let cache = MemoryCache::new(2).unwrap();

        cache.set("key1", b"value1", None).await.unwrap();
        cache.set("key2", b"value2", None).await.unwrap();

        // Access key1 to make it most recently used
        cache.get("key1").await.unwrap();

        // Adding key3 evicts key2, the least recently used
        cache.set("key3", b"value3", None).await.unwrap();

        assert!(cache.get("key1").await.unwrap().is_some());
        assert!(cache.get("key2").await.unwrap().is_none());
        assert!(cache.get("key3").await.unwrap().is_some());
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        assert!(matches!(
            MemoryCache::new(0),
            Err(CacheError::OperationFailed(_))
        ));
    }
}
