use async_trait::async_trait;
use shortlink_core::table::Result;
use shortlink_core::{BackendError, IndexedTable, Page, PageCursor, ShortLinkRecord};
use std::time::Duration;
use tracing::warn;

/// An [`IndexedTable`] decorator that bounds every underlying call.
///
/// The same deadline applies to each `put_item` and to each individual page
/// request, so a lookup spanning several pages gets the budget once per page.
/// An elapsed deadline becomes [`BackendError::Timeout`]; nothing is retried.
#[derive(Debug, Clone)]
pub struct TimeoutTable<T> {
    inner: T,
    timeout: Duration,
}

impl<T: IndexedTable> TimeoutTable<T> {
    pub fn new(inner: T, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    /// Returns a reference to the inner table.
    pub fn inner(&self) -> &T {
        &self.inner
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl<T: IndexedTable> IndexedTable for TimeoutTable<T> {
    async fn put_item(&self, record: &ShortLinkRecord) -> Result<()> {
        match tokio::time::timeout(self.timeout, self.inner.put_item(record)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(identifier = record.identifier, timeout = ?self.timeout, "put_item timed out");
                Err(BackendError::Timeout(format!(
                    "put_item for identifier {} exceeded {:?}",
                    record.identifier, self.timeout
                )))
            }
        }
    }

    async fn query_token_page(
        &self,
        token: &str,
        start_after: Option<PageCursor>,
        limit: usize,
    ) -> Result<Page> {
        let query = self.inner.query_token_page(token, start_after, limit);
        match tokio::time::timeout(self.timeout, query).await {
            Ok(result) => result,
            Err(_) => {
                warn!(token = %token, timeout = ?self.timeout, "query_token_page timed out");
                Err(BackendError::Timeout(format!(
                    "token query for '{token}' exceeded {:?}",
                    self.timeout
                )))
            }
        }
    }
}
