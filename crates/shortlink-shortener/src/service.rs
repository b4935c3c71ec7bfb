use crate::error::{ResolveError, ShortenError};
use crate::shortener::Shortener;
use async_trait::async_trait;
use shortlink_core::{RecordStore, ShortLinkRecord, TokenCodec};
use shortlink_generator::IdentifierSource;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A concrete implementation of the `Shortener` trait.
///
/// This service wraps a `RecordStore`, an `IdentifierSource` and a
/// `TokenCodec` to handle:
/// - URL validation, before any identifier is allocated
/// - identifier allocation and token derivation
/// - persistence and token resolution
///
/// Note: the `IdentifierSource` is responsible for uniqueness. No collision
/// retry is performed, and failed writes are not retried either.
#[derive(Debug)]
pub struct ShortenerService<S, G, C> {
    store: Arc<S>,
    generator: Arc<G>,
    codec: Arc<C>,
}

impl<S, G, C> Clone for ShortenerService<S, G, C> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            generator: Arc::clone(&self.generator),
            codec: Arc::clone(&self.codec),
        }
    }
}

impl<S: RecordStore, G: IdentifierSource, C: TokenCodec> ShortenerService<S, G, C> {
    pub fn new(store: S, generator: G, codec: C) -> Self {
        Self {
            store: Arc::new(store),
            generator: Arc::new(generator),
            codec: Arc::new(codec),
        }
    }

    /// Returns a reference to the record store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validates that the URL is non-empty and has an http(s) scheme and a host.
    fn validate_url(url: &str) -> Result<(), ShortenError> {
        if url.trim().is_empty() {
            return Err(ShortenError::Validation("URL cannot be empty".to_string()));
        }

        let Some((scheme, rest)) = url.split_once("://") else {
            return Err(ShortenError::Validation(format!(
                "URL must have a valid scheme and host: {url}"
            )));
        };

        let scheme = scheme.to_ascii_lowercase();
        if scheme != "http" && scheme != "https" {
            return Err(ShortenError::Validation(format!(
                "URL scheme must be http or https: {scheme}"
            )));
        }

        let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
        if host.is_empty() || url.chars().any(char::is_whitespace) {
            return Err(ShortenError::Validation(format!(
                "URL must have a valid scheme and host: {url}"
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl<S: RecordStore, G: IdentifierSource, C: TokenCodec> Shortener for ShortenerService<S, G, C> {
    async fn shorten(&self, original_url: &str) -> Result<ShortLinkRecord, ShortenError> {
        Self::validate_url(original_url)?;

        let identifier = self.generator.next().map_err(|err| {
            warn!(error = %err, "identifier allocation failed");
            ShortenError::from(err)
        })?;
        let record = ShortLinkRecord::new(identifier, original_url, self.codec.as_ref());

        self.store.insert(record.clone()).await?;

        info!(identifier, token = %record.token, "shortened url");
        Ok(record)
    }

    async fn resolve(&self, token: &str) -> Result<String, ResolveError> {
        if token.is_empty() {
            return Err(ResolveError::NotFound(String::new()));
        }

        match self.store.lookup_by_token(token).await? {
            Some(original_url) => Ok(original_url),
            None => {
                debug!(token = %token, "no record for token");
                Err(ResolveError::NotFound(token.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shortlink_core::{Base62Codec, BackendError, IndexedTable, Page, PageCursor};
    use shortlink_generator::{IdentifierError, SeqGenerator};
    use shortlink_storage::{InMemoryTable, PagedRecordStore};
    use std::collections::HashSet;

    type MemoryService =
        ShortenerService<PagedRecordStore<InMemoryTable, Base62Codec>, SeqGenerator, Base62Codec>;

    fn test_service(first_id: u64) -> MemoryService {
        let store = PagedRecordStore::new(InMemoryTable::new(), Base62Codec);
        ShortenerService::new(store, SeqGenerator::starting_at(first_id), Base62Codec)
    }

    /// An identifier source that always fails.
    struct BrokenSource;

    impl IdentifierSource for BrokenSource {
        fn next(&self) -> Result<u64, IdentifierError> {
            Err(IdentifierError::ClockRegression("clock went back".into()))
        }
    }

    /// A table whose every call fails.
    struct DownTable;

    #[async_trait]
    impl IndexedTable for DownTable {
        async fn put_item(&self, _record: &ShortLinkRecord) -> shortlink_core::table::Result<()> {
            Err(BackendError::Unavailable("down".into()))
        }

        async fn query_token_page(
            &self,
            _token: &str,
            _start_after: Option<PageCursor>,
            _limit: usize,
        ) -> shortlink_core::table::Result<Page> {
            Err(BackendError::Unavailable("down".into()))
        }
    }

    #[tokio::test]
    async fn shorten_returns_identifier_token_and_url() {
        let service = test_service(550_726_476_329_124_100);

        let record = service.shorten("http://example.com").await.unwrap();
        assert_eq!(record.identifier, 550_726_476_329_124_100);
        assert_eq!(record.token.as_str(), "EEAA2fZJJ9A");
        assert_eq!(record.original_url, "http://example.com");
    }

    #[tokio::test]
    async fn shortened_url_resolves() {
        let service = test_service(1);

        let record = service.shorten("https://example.com/a?b=c").await.unwrap();
        let url = service.resolve(record.token.as_str()).await.unwrap();
        assert_eq!(url, "https://example.com/a?b=c");
    }

    #[tokio::test]
    async fn same_url_twice_gets_two_tokens() {
        let service = test_service(1);

        let first = service.shorten("https://example.com").await.unwrap();
        let second = service.shorten("https://example.com").await.unwrap();
        assert_ne!(first.token, second.token);
        assert!(second.identifier > first.identifier);
    }

    #[tokio::test]
    async fn empty_url_is_rejected_before_allocating() {
        let service = test_service(10);

        let err = service.shorten("").await.unwrap_err();
        assert!(matches!(err, ShortenError::Validation(_)));
        assert!(err.is_client_error());

        // the rejected request did not consume identifier 10
        let record = service.shorten("https://example.com").await.unwrap();
        assert_eq!(record.identifier, 10);
    }

    #[tokio::test]
    async fn malformed_urls_are_rejected() {
        let service = test_service(1);

        for url in ["   ", "not-a-valid-url", "ftp://example.com", "https://", "http://exa mple.com"] {
            let err = service.shorten(url).await.unwrap_err();
            assert!(matches!(err, ShortenError::Validation(_)), "{url}");
        }
        assert!(service.store().table().is_empty());
    }

    #[tokio::test]
    async fn identifier_failure_is_surfaced() {
        let store = PagedRecordStore::new(InMemoryTable::new(), Base62Codec);
        let service = ShortenerService::new(store, BrokenSource, Base62Codec);

        let err = service.shorten("https://example.com").await.unwrap_err();
        assert!(matches!(
            err,
            ShortenError::Identifier(IdentifierError::ClockRegression(_))
        ));
        assert!(service.store().table().is_empty());
    }

    #[tokio::test]
    async fn write_failure_is_write_failed() {
        let store = PagedRecordStore::new(DownTable, Base62Codec);
        let service = ShortenerService::new(store, SeqGenerator::default(), Base62Codec);

        let err = service.shorten("https://example.com").await.unwrap_err();
        assert!(matches!(err, ShortenError::WriteFailed(_)));
        assert!(!err.is_client_error());
    }

    #[tokio::test]
    async fn unknown_token_is_not_found() {
        let service = test_service(1);

        let err = service.resolve("doesNotExist").await.unwrap_err();
        assert_eq!(err, ResolveError::NotFound("doesNotExist".to_string()));
        assert!(matches!(
            service.resolve("").await,
            Err(ResolveError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn lookup_failure_is_lookup_failed() {
        let store = PagedRecordStore::new(DownTable, Base62Codec);
        let service = ShortenerService::new(store, SeqGenerator::default(), Base62Codec);

        let err = service.resolve("EEAA2fZJJ9A").await.unwrap_err();
        assert!(matches!(err, ResolveError::LookupFailed(_)));
        assert!(!err.is_client_error());
    }

    #[tokio::test]
    async fn concurrent_shorten_requests_get_distinct_tokens() {
        let service = test_service(1);
        let mut handles = vec![];

        for i in 0..50 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                service
                    .shorten(&format!("https://example.com/{i}"))
                    .await
                    .unwrap()
            }));
        }

        let mut tokens = HashSet::new();
        for handle in handles {
            let record = handle.await.unwrap();
            let url = service.resolve(record.token.as_str()).await.unwrap();
            assert_eq!(url, record.original_url);
            tokens.insert(record.token);
        }
        assert_eq!(tokens.len(), 50);
    }
}
