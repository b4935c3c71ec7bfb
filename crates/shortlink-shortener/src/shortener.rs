use crate::error::{ResolveError, ShortenError};
use async_trait::async_trait;
use shortlink_core::ShortLinkRecord;

#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Shortens a URL and returns the persisted record.
    async fn shorten(&self, original_url: &str) -> Result<ShortLinkRecord, ShortenError>;

    /// Resolves a token to the original URL it was created for.
    async fn resolve(&self, token: &str) -> Result<String, ResolveError>;
}
