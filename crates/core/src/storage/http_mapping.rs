//! Status codes for storage failures, kept free of any HTTP crate so the
//! shell decides how to build the response.

use super::RepositoryError;

/// Maps a [`RepositoryError`] to the HTTP status the API answers with.
///
/// Backend outages are 503 so callers can retry; broken rows and queries are
/// 500; stored data that fails to parse is reported as a bad request.
///
/// ```
/// use journalsync_core::storage::{RepositoryError, repository_error_to_status_code};
///
/// let error = RepositoryError::NotFound {
///     entity_type: "Account",
///     id: "alice".to_string(),
/// };
/// assert_eq!(repository_error_to_status_code(&error), 404);
/// ```
pub fn repository_error_to_status_code(error: &RepositoryError) -> u16 {
    use RepositoryError::*;

    match error {
        NotFound { .. } => 404,
        AlreadyExists { .. } => 409,
        InvalidData(_) => 400,
        ConnectionFailed(_) => 503,
        QueryFailed(_) | Serialization(_) => 500,
    }
}
