use crate::error::BackendError;
use crate::record::ShortLinkRecord;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Result type for backend table operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Position to resume an index query from.
///
/// Pages are ordered by identifier; the cursor holds the last identifier
/// returned by the previous page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCursor {
    pub last_identifier: u64,
}

/// One page of an index query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub items: Vec<ShortLinkRecord>,
    /// Where the next page starts, `None` once the query is exhausted.
    pub next: Option<PageCursor>,
}

/// The persistence collaborator: a key-value table keyed by identifier with
/// a secondary index on token.
///
/// Only two operations are required, a single-item put and a paginated
/// equality query on the token index.
#[async_trait]
pub trait IndexedTable: Send + Sync + 'static {
    /// Writes one item keyed by `record.identifier`.
    async fn put_item(&self, record: &ShortLinkRecord) -> Result<()>;

    /// Fetches up to `limit` items whose token equals `token`, starting
    /// after `start_after`.
    async fn query_token_page(
        &self,
        token: &str,
        start_after: Option<PageCursor>,
        limit: usize,
    ) -> Result<Page>;
}
