use thiserror::Error;

/// Errors raised by the configuration cache and its sources.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Config key not found: {0}")]
    NotFound(String),
    #[error("Config source failed: {0}")]
    SourceFailed(String),
}

/// Result type for configuration lookups.
pub type Result<T> = std::result::Result<T, ConfigError>;
