use std::time::Duration;

use shortlink_core::{Base62Codec, TokenCodec};
use shortlink_storage::{
    BackendError, IndexedTable, MySqlTable, PagedRecordStore, RecordStore, ShortLinkRecord,
    StorageError,
};
use shortlink_test_infra::mysql::{MySqlServer, MysqlConfig};
use sqlx::mysql::MySqlPoolOptions;

struct Fixture {
    _mysql: MySqlServer,
    table: MySqlTable,
}

impl Fixture {
    async fn start() -> Self {
        let mysql = MySqlServer::new(MysqlConfig::builder().build())
            .await
            .expect("start mysql");
        let url = mysql.database_url().await.expect("mysql url");
        let pool = connect_with_retry(&url).await;

        sqlx::query(include_str!("../ddl/mysql/short_links.sql"))
            .execute(&pool)
            .await
            .expect("create schema");

        Self {
            _mysql: mysql,
            table: MySqlTable::new(pool),
        }
    }

    fn store(&self, page_size: usize) -> PagedRecordStore<MySqlTable, Base62Codec> {
        PagedRecordStore::new(self.table.clone(), Base62Codec).with_page_size(page_size)
    }
}

async fn connect_with_retry(url: &str) -> sqlx::MySqlPool {
    let mut last_error = None;

    for _ in 0..20 {
        match MySqlPoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await
        {
            Ok(pool) => return pool,
            Err(err) => {
                last_error = Some(err);
                tokio::time::sleep(Duration::from_millis(500)).await;
            }
        }
    }

    panic!("failed to connect mysql: {last_error:?}");
}

fn record(identifier: u64, url: &str) -> ShortLinkRecord {
    ShortLinkRecord::new(identifier, url, &Base62Codec)
}

#[tokio::test]
async fn insert_and_lookup_by_token() {
    let fixture = Fixture::start().await;
    let store = fixture.store(100);

    store
        .insert(record(550_726_476_329_124_100, "http://example.com"))
        .await
        .unwrap();

    let url = store.lookup_by_token("EEAA2fZJJ9A").await.unwrap();
    assert_eq!(url.as_deref(), Some("http://example.com"));
}

#[tokio::test]
async fn lookup_unknown_token_returns_none() {
    let fixture = Fixture::start().await;
    let store = fixture.store(100);

    assert_eq!(store.lookup_by_token("doesNotExist").await.unwrap(), None);
}

#[tokio::test]
async fn insert_conflicts_when_identifier_already_exists() {
    let fixture = Fixture::start().await;
    let store = fixture.store(100);

    store.insert(record(42, "https://one.example")).await.unwrap();
    let err = store
        .insert(record(42, "https://two.example"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        StorageError::WriteFailed(BackendError::Conflict(_))
    ));
}

#[tokio::test]
async fn token_pages_use_keyset_pagination() {
    let fixture = Fixture::start().await;
    let token = Base62Codec.encode(10);

    // the index is non-unique, so several rows can share one token
    for identifier in [30_u64, 10, 20] {
        let item = ShortLinkRecord {
            identifier,
            token: token.clone(),
            original_url: format!("https://example.com/{identifier}"),
        };
        fixture.table.put_item(&item).await.unwrap();
    }

    let first = fixture
        .table
        .query_token_page(token.as_str(), None, 2)
        .await
        .unwrap();
    let ids: Vec<u64> = first.items.iter().map(|item| item.identifier).collect();
    assert_eq!(ids, vec![10, 20]);
    assert!(first.next.is_some());

    let second = fixture
        .table
        .query_token_page(token.as_str(), first.next, 2)
        .await
        .unwrap();
    let ids: Vec<u64> = second.items.iter().map(|item| item.identifier).collect();
    assert_eq!(ids, vec![30]);
    assert!(second.next.is_none());

    // first item in page order is authoritative
    let url = fixture.store(1).lookup_by_token(token.as_str()).await.unwrap();
    assert_eq!(url.as_deref(), Some("https://example.com/10"));
}
