use std::time::Duration;

use async_trait::async_trait;

use super::Result;

/// String-keyed byte store with per-entry expiry.
///
/// Values are opaque; typed access goes through [`get_typed`](super::get_typed)
/// and [`set_typed`](super::set_typed).
#[async_trait]
pub trait Cache: Send + Sync {
    /// Gets a value by key. Expired entries are reported as absent even if
    /// the backend still holds them. Reads never extend the expiry.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Stores a value, replacing any existing entry. With a TTL the entry
    /// expires at now + ttl; without one it lives until invalidated.
    /// A zero TTL leaves the key absent.
    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()>;

    /// Removes every entry.
    async fn invalidate_all(&self) -> Result<()>;
}
