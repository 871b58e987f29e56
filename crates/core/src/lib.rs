//! Functional core for journalsync.
//!
//! Pure domain types, validation, key derivation and the traits the shell
//! crate implements for storage, caching and configuration lookup.

pub mod cache;
pub mod journal;
pub mod lookup;
pub mod storage;
