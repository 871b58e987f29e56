use thiserror::Error;
use uuid::Uuid;

use crate::storage::RepositoryError;

/// Errors that can occur when validating journal entries.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EntryError {
    #[error("Entry title cannot be blank")]
    BlankTitle,
    #[error("Entry title must be between 3 and 100 characters")]
    TitleLength,
    #[error("Entry content cannot exceed 5000 characters")]
    ContentTooLong,
}

/// Errors that can occur when validating account fields.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccountError {
    #[error("Username cannot be blank")]
    BlankUsername,
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),
}

/// Errors surfaced by operations that span the entry and account stores.
#[derive(Debug, Error)]
pub enum JournalError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    /// The first write of a two-step operation succeeded and the second did
    /// not. The stores disagree until someone reconciles `entry_id`.
    #[error("Inconsistent state for entry {entry_id} of account {username}: {source}")]
    Inconsistent {
        entry_id: Uuid,
        username: String,
        #[source]
        source: RepositoryError,
    },
    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[from] RepositoryError),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    /// The account kept changing under a multi-step operation.
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error(transparent)]
    Invalid(#[from] EntryError),
    #[error(transparent)]
    InvalidAccount(#[from] AccountError),
}

impl JournalError {
    pub fn account_not_found(username: &str) -> Self {
        Self::NotFound {
            entity_type: "Account",
            id: username.to_string(),
        }
    }

    pub fn entry_not_found(id: Uuid) -> Self {
        Self::NotFound {
            entity_type: "JournalEntry",
            id: id.to_string(),
        }
    }

    /// Returns true when the stores may disagree and need reconciliation.
    pub fn is_inconsistent(&self) -> bool {
        matches!(self, Self::Inconsistent { .. })
    }
}

/// Maps a [`JournalError`] to an HTTP status code.
///
/// - `NotFound` -> 404
/// - `Forbidden` -> 403
/// - `Inconsistent`, `Conflict` -> 409
/// - `Invalid`, `InvalidAccount` -> 400
/// - `StoreUnavailable` -> whatever the wrapped repository error maps to
pub fn journal_error_to_status_code(error: &JournalError) -> u16 {
    match error {
        JournalError::NotFound { .. } => 404,
        JournalError::Forbidden(_) => 403,
        JournalError::Inconsistent { .. } | JournalError::Conflict(_) => 409,
        JournalError::Invalid(_) | JournalError::InvalidAccount(_) => 400,
        JournalError::StoreUnavailable(inner) => {
            crate::storage::repository_error_to_status_code(inner)
        }
    }
}
