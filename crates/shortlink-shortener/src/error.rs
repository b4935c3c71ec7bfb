use shortlink_core::StorageError;
use shortlink_generator::IdentifierError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShortenError {
    #[error("invalid url: {0}")]
    Validation(String),
    #[error(transparent)]
    Identifier(#[from] IdentifierError),
    #[error("write failed: {0}")]
    WriteFailed(String),
}

impl ShortenError {
    /// Whether the caller sent bad input, as opposed to an internal failure.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<StorageError> for ShortenError {
    fn from(value: StorageError) -> Self {
        Self::WriteFailed(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("token not found: {0}")]
    NotFound(String),
    #[error("lookup failed: {0}")]
    LookupFailed(String),
}

impl ResolveError {
    /// Whether the lookup completed and simply had no match.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<StorageError> for ResolveError {
    fn from(value: StorageError) -> Self {
        Self::LookupFailed(value.to_string())
    }
}
