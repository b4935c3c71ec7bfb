use async_trait::async_trait;
use shortlink_core::repository::Result;
use shortlink_core::table::Result as BackendResult;
use shortlink_core::{
    BackendError, IndexedTable, Page, PageCursor, RecordStore, ShortLinkRecord, StorageError,
    TokenCodec,
};
use tracing::{debug, trace, warn};

/// Page size requested from the index when none is configured.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Progress of a single token lookup.
///
/// `Resolved`, `NotFound` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupState {
    Querying,
    Resolved,
    NotFound,
    Failed,
}

/// Walks the token index one page at a time.
///
/// The pager owns no buffered results: every page is handed to the caller
/// as soon as it arrives, so dropping the pager (or the future driving it)
/// discards whatever was fetched so far.
pub struct TokenPager<'a, T: ?Sized> {
    table: &'a T,
    token: &'a str,
    page_size: usize,
    cursor: Option<PageCursor>,
    state: LookupState,
    pages_fetched: usize,
}

impl<'a, T: IndexedTable + ?Sized> TokenPager<'a, T> {
    pub fn new(table: &'a T, token: &'a str, page_size: usize) -> Self {
        Self {
            table,
            token,
            page_size: page_size.max(1),
            cursor: None,
            state: LookupState::Querying,
            pages_fetched: 0,
        }
    }

    pub fn state(&self) -> LookupState {
        self.state
    }

    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// Fetches the next page, or `None` once the pager reached a terminal
    /// state.
    ///
    /// A page without a continuation cursor moves the pager to `NotFound`;
    /// the caller upgrades it to `Resolved` with [`TokenPager::resolve`] if
    /// that last page held the match.
    pub async fn next_page(&mut self) -> Option<BackendResult<Page>> {
        if self.state != LookupState::Querying {
            return None;
        }

        let result = self
            .table
            .query_token_page(self.token, self.cursor, self.page_size)
            .await;
        self.pages_fetched += 1;

        let page = match result {
            Ok(page) => page,
            Err(err) => {
                self.state = LookupState::Failed;
                return Some(Err(err));
            }
        };

        match page.next {
            None => self.state = LookupState::NotFound,
            Some(next) if Some(next) == self.cursor => {
                self.state = LookupState::Failed;
                return Some(Err(BackendError::InvalidData(format!(
                    "pagination cursor did not advance past identifier {}",
                    next.last_identifier
                ))));
            }
            Some(next) => self.cursor = Some(next),
        }

        Some(Ok(page))
    }

    /// Marks the lookup as resolved; no further pages are fetched.
    pub fn resolve(&mut self) {
        self.state = LookupState::Resolved;
    }
}

/// A [`RecordStore`] over any [`IndexedTable`].
///
/// Inserts are a single `put_item`. Lookups page through the token index
/// and stop at the first page containing a match. If a page request fails
/// the whole lookup fails, even if an earlier page already succeeded.
///
/// When the index yields more than one item for a token, the first one in
/// page order wins.
#[derive(Debug, Clone)]
pub struct PagedRecordStore<T, C> {
    table: T,
    codec: C,
    page_size: usize,
}

impl<T: IndexedTable, C: TokenCodec> PagedRecordStore<T, C> {
    pub fn new(table: T, codec: C) -> Self {
        Self {
            table,
            codec,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Sets how many items are requested per index page.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Returns a reference to the underlying table.
    pub fn table(&self) -> &T {
        &self.table
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    fn validate(&self, record: &ShortLinkRecord) -> Result<()> {
        if record.original_url.trim().is_empty() {
            return Err(StorageError::InvalidRecord(format!(
                "record {} has an empty original url",
                record.identifier
            )));
        }

        let expected = self.codec.encode(record.identifier);
        if record.token != expected {
            return Err(StorageError::InvalidRecord(format!(
                "token '{}' is not the encoding of identifier {} (expected '{}')",
                record.token, record.identifier, expected
            )));
        }

        Ok(())
    }
}

fn first_match(token: &str, page: Page) -> Option<ShortLinkRecord> {
    let mut matches = page
        .items
        .into_iter()
        .filter(|item| item.token.as_str() == token);
    let first = matches.next()?;

    let duplicates = matches.count();
    if duplicates > 0 {
        warn!(
            token = %token,
            identifier = first.identifier,
            duplicates,
            "token index returned several items, keeping the first"
        );
    }

    Some(first)
}

#[async_trait]
impl<T: IndexedTable, C: TokenCodec> RecordStore for PagedRecordStore<T, C> {
    async fn insert(&self, record: ShortLinkRecord) -> Result<()> {
        self.validate(&record)?;

        self.table.put_item(&record).await.map_err(|err| {
            warn!(identifier = record.identifier, token = %record.token, error = %err, "failed to write record");
            StorageError::WriteFailed(err)
        })?;

        debug!(identifier = record.identifier, token = %record.token, "stored record");
        Ok(())
    }

    async fn lookup_by_token(&self, token: &str) -> Result<Option<String>> {
        trace!(token = %token, "looking up token");
        let mut pager = TokenPager::new(&self.table, token, self.page_size);

        while let Some(page) = pager.next_page().await {
            let page = page.map_err(|err| {
                warn!(
                    token = %token,
                    page = pager.pages_fetched(),
                    error = %err,
                    "token index page failed, discarding partial results"
                );
                StorageError::LookupFailed(err)
            })?;

            if let Some(found) = first_match(token, page) {
                pager.resolve();
                debug!(
                    token = %token,
                    identifier = found.identifier,
                    pages = pager.pages_fetched(),
                    "token resolved"
                );
                return Ok(Some(found.original_url));
            }
        }

        debug!(token = %token, pages = pager.pages_fetched(), "token not found");
        Ok(None)
    }
}
