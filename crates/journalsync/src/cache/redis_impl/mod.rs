//! Redis cache backend implementation.
//!
//! Provides a shared cache using Redis for multi-instance deployments.
//! Every command is bounded by a per-call timeout.

mod cache;
mod error;

pub use cache::RedisCache;
