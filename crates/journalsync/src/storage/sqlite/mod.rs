//! SQLite storage backend implementation.
//!
//! This module provides a SQLite-based implementation of the repository traits
//! using `rusqlite` for synchronous operations and `tokio-rusqlite` for async wrapping.
//! Entry references live in a join table keyed by entry id, so each push or
//! pull is a single atomic statement and an entry can belong to one account only.

mod conversions;
mod error;
mod repository;
mod schema;

pub use repository::SqliteRepository;
