use thiserror::Error;

/// Failures reported by the entry and account stores.
///
/// `entity_type` names what was looked up (`"Account"`, `"JournalEntry"`,
/// `"EntryReference"`) and `id` is the username or entry id.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("{entity_type} already exists: {id}")]
    AlreadyExists {
        entity_type: &'static str,
        id: String,
    },
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyed_errors_name_entity_and_id() {
        let missing = RepositoryError::NotFound {
            entity_type: "JournalEntry",
            id: "abc-123".to_string(),
        };
        let taken = RepositoryError::AlreadyExists {
            entity_type: "Account",
            id: "alice".to_string(),
        };

        assert_eq!(missing.to_string(), "JournalEntry not found: abc-123");
        assert_eq!(taken.to_string(), "Account already exists: alice");
    }

    #[test]
    fn test_backend_errors_carry_detail() {
        assert_eq!(
            RepositoryError::QueryFailed("no such table: entries".into()).to_string(),
            "Query failed: no such table: entries"
        );
        assert_eq!(
            RepositoryError::InvalidData("unknown role: OWNER".into()).to_string(),
            "Invalid data: unknown role: OWNER"
        );
    }
}
