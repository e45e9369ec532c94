use thiserror::Error;

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StorageError>;

#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("short code already exists: {0}")]
    Conflict(String),
    #[error("storage operation failed: {0}")]
    Operation(String),
}

/// Errors surfaced by the mapping service to its callers.
///
/// All variants are expected conditions the boundary layer translates into
/// a response; none of them is fatal to the process.
#[derive(Debug, Clone, Error)]
pub enum ShortenerError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("invalid short code: {0}")]
    InvalidShortCode(String),
    #[error("invalid validity: {0}")]
    InvalidValidity(String),
    #[error("short code already exists: {0}")]
    Conflict(String),
    #[error("no live mapping for short code: {0}")]
    NotFound(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<StorageError> for ShortenerError {
    fn from(value: StorageError) -> Self {
        match value {
            StorageError::Conflict(code) => Self::Conflict(code),
            other => Self::Storage(other.to_string()),
        }
    }
}

/// Errors raised while parsing or validating a log event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    #[error("invalid stack: {0}. Allowed values: backend, frontend")]
    UnknownStack(String),
    #[error("invalid level: {0}. Allowed values: debug, info, warn, error, fatal")]
    UnknownLevel(String),
    #[error("invalid package: {0}")]
    UnknownPackage(String),
    #[error("package '{package}' cannot be used with {stack} stack")]
    PackageNotAllowed { package: String, stack: String },
}
