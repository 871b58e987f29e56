//! SQLite error mapping.
//!
//! Maps `tokio_rusqlite::Error` and `rusqlite::Error` to `RepositoryError` from
//! `journalsync_core::storage`. Constraint violations map to semantic variants.

use journalsync_core::storage::RepositoryError;

/// Maps a rusqlite error with a known ID to a RepositoryError.
///
/// # Error Mapping
///
/// - `SQLITE_CONSTRAINT_UNIQUE` / `SQLITE_CONSTRAINT_PRIMARYKEY` → `AlreadyExists`
/// - `SQLITE_CONSTRAINT_FOREIGNKEY` → `InvalidData`
/// - `QueryReturnedNoRows` → `NotFound`
/// - Open failures → `ConnectionFailed`
/// - All other errors → `QueryFailed`
fn map_rusqlite_error(err: &rusqlite::Error, entity_type: &'static str, id: &str) -> RepositoryError {
    match err {
        rusqlite::Error::SqliteFailure(sqlite_err, _)
            if sqlite_err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                || sqlite_err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
        {
            RepositoryError::AlreadyExists {
                entity_type,
                id: id.to_string(),
            }
        }

        rusqlite::Error::SqliteFailure(sqlite_err, _)
            if sqlite_err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY =>
        {
            RepositoryError::InvalidData(format!(
                "Foreign key constraint violation for {entity_type}"
            ))
        }

        rusqlite::Error::SqliteFailure(sqlite_err, _)
            if sqlite_err.code == rusqlite::ErrorCode::CannotOpen =>
        {
            RepositoryError::ConnectionFailed(format!("Cannot open database: {err}"))
        }

        rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
            entity_type,
            id: id.to_string(),
        },

        rusqlite::Error::FromSqlConversionFailure(..) => {
            RepositoryError::InvalidData(err.to_string())
        }

        _ => RepositoryError::QueryFailed(err.to_string()),
    }
}

/// Maps a tokio_rusqlite error to a RepositoryError.
///
/// Pass the entity ID when the call site knows it, so `NotFound` and
/// `AlreadyExists` carry it.
pub fn map_tokio_rusqlite_error(
    err: tokio_rusqlite::Error,
    entity_type: &'static str,
    id: impl Into<String>,
) -> RepositoryError {
    let id = id.into();
    match &err {
        tokio_rusqlite::Error::Rusqlite(rusqlite_err) => {
            map_rusqlite_error(rusqlite_err, entity_type, &id)
        }
        tokio_rusqlite::Error::Close(_) => {
            RepositoryError::ConnectionFailed("Connection closed unexpectedly".to_string())
        }
        _ => RepositoryError::QueryFailed(err.to_string()),
    }
}
