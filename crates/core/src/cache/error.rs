use thiserror::Error;

/// Cache store failures. Callers treat every variant as a miss.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("Cache connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Cache operation failed: {0}")]
    OperationFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// The store did not answer within the configured deadline, in milliseconds.
    #[error("Cache operation timed out after {0}ms")]
    Timeout(u64),
}

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
