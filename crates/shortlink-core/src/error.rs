use thiserror::Error;

/// Errors related to the core functionality of the URL shortener service.
pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("invalid token format: {0}")]
    InvalidTokenFormat(String),
}

/// Failures reported by the persistence collaborator behind an
/// [`IndexedTable`][crate::IndexedTable].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("item already exists: {0}")]
    Conflict(String),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
}

/// Errors returned by a [`RecordStore`][crate::RecordStore].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("record rejected: {0}")]
    InvalidRecord(String),
    #[error("write failed: {0}")]
    WriteFailed(#[source] BackendError),
    #[error("lookup failed: {0}")]
    LookupFailed(#[source] BackendError),
}
