//! Storage backend implementations.
//!
//! This module provides concrete implementations of the repository traits
//! defined in `journalsync_core::storage`, plus the `ConfigSource` the
//! configuration cache is loaded from.
//!
//! # Feature Flags
//!
//! - default: in-memory storage, lost on restart
//! - `sqlite`: SQLite storage backend using `rusqlite` and `tokio-rusqlite`
//!
//! The in-memory backend is always compiled; the service tests run against it.

pub mod inmemory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use inmemory::InMemoryRepository;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteRepository;
