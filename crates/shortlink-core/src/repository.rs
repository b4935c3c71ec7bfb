use crate::error::StorageError;
use crate::record::ShortLinkRecord;
use async_trait::async_trait;

/// Result type for record store operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Persists short links and resolves tokens back to their original URL.
#[async_trait]
pub trait RecordStore: Send + Sync + 'static {
    /// Writes a new record keyed by its identifier.
    ///
    /// Fails with [`StorageError::WriteFailed`] if the write did not land.
    /// No retry is attempted.
    async fn insert(&self, record: ShortLinkRecord) -> Result<()>;

    /// Looks up the original URL for a token through the secondary index.
    ///
    /// Returns `Ok(None)` when no record carries the token.
    async fn lookup_by_token(&self, token: &str) -> Result<Option<String>>;
}
