use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use shortlink_core::table::Result;
use shortlink_core::{BackendError, IndexedTable, Page, PageCursor, ShortLinkRecord};
use std::collections::BTreeSet;

/// In-memory implementation of [`IndexedTable`] using DashMap.
///
/// Items are keyed by identifier. A second map plays the role of the token
/// index, keeping the identifiers of each token ordered so that pages come
/// back in identifier order.
#[derive(Debug, Default)]
pub struct InMemoryTable {
    items: DashMap<u64, ShortLinkRecord>,
    token_index: DashMap<String, BTreeSet<u64>>,
    page_limit: Option<usize>,
}

impl InMemoryTable {
    /// Creates a new in-memory table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps every page at `page_limit` items regardless of the requested
    /// limit, the way hosted key-value stores cap response sizes.
    pub fn with_page_limit(page_limit: usize) -> Self {
        Self {
            page_limit: Some(page_limit.max(1)),
            ..Self::default()
        }
    }

    /// Number of stored items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Adds an identifier to the token index without touching the item.
    ///
    /// Lets tests reproduce an index that points one token at several items.
    pub fn index_token(&self, token: &str, identifier: u64) {
        self.token_index
            .entry(token.to_owned())
            .or_default()
            .insert(identifier);
    }
}

#[async_trait]
impl IndexedTable for InMemoryTable {
    async fn put_item(&self, record: &ShortLinkRecord) -> Result<()> {
        match self.items.entry(record.identifier) {
            Entry::Occupied(_) => {
                return Err(BackendError::Conflict(record.identifier.to_string()));
            }
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
            }
        }

        self.index_token(record.token.as_str(), record.identifier);
        Ok(())
    }

    async fn query_token_page(
        &self,
        token: &str,
        start_after: Option<PageCursor>,
        limit: usize,
    ) -> Result<Page> {
        let limit = self
            .page_limit
            .map_or(limit, |cap| limit.min(cap))
            .max(1);

        let Some(identifiers) = self.token_index.get(token) else {
            return Ok(Page::default());
        };

        let mut matching = identifiers.iter().copied().filter(|identifier| {
            start_after.map_or(true, |cursor| *identifier > cursor.last_identifier)
        });
        let selected: Vec<u64> = matching.by_ref().take(limit).collect();
        let has_more = matching.next().is_some();
        drop(identifiers);

        let mut items = Vec::with_capacity(selected.len());
        for identifier in &selected {
            let Some(item) = self.items.get(identifier) else {
                // index entry without an item: skip it like a lagging index would
                continue;
            };
            items.push(item.clone());
        }

        let next = match selected.last() {
            Some(&last_identifier) if has_more => Some(PageCursor { last_identifier }),
            _ => None,
        };

        Ok(Page { items, next })
    }
}
