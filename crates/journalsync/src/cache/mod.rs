//! Cache store implementations.
//!
//! This module provides concrete implementations of the [`Cache`] trait
//! defined in `journalsync_core::cache`.
//!
//! # Feature Flags
//!
//! - default: in-memory LRU cache with lazy TTL expiry
//! - `redis`: Redis cache using the redis crate
//!
//! [`Cache`]: journalsync_core::cache::Cache

pub mod memory;

#[cfg(feature = "redis")]
pub mod redis_impl;

pub use memory::MemoryCache;

#[cfg(feature = "redis")]
pub use redis_impl::RedisCache;
