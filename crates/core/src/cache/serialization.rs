//! JSON encoding for cached values.
//!
//! Cached values are stored as JSON bytes so they stay readable when
//! inspecting the backing store by hand.

use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;

use super::{Cache, CacheError, Result};

/// Serializes a value to JSON bytes.
pub fn serialize_value<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| CacheError::Serialization(e.to_string()))
}

/// Deserializes JSON bytes into a value.
pub fn deserialize_value<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| CacheError::Serialization(e.to_string()))
}

/// Gets a value and decodes it as `T`.
///
/// Absent and expired keys yield `Ok(None)`. Bytes that do not decode as `T`
/// yield `CacheError::Serialization`.
pub async fn get_typed<T, C>(cache: &C, key: &str) -> Result<Option<T>>
where
    T: DeserializeOwned,
    C: Cache + ?Sized,
{
    match cache.get(key).await? {
        Some(bytes) => deserialize_value(&bytes).map(Some),
        None => Ok(None),
    }
}

/// Encodes `value` as JSON and stores it under `key`.
pub async fn set_typed<T, C>(cache: &C, key: &str, value: &T, ttl: Option<Duration>) -> Result<()>
where
    T: Serialize + Sync + ?Sized,
    C: Cache + ?Sized,
{
    let bytes = serialize_value(value)?;
    cache.set(key, &bytes, ttl).await
}
