use async_trait::async_trait;
use shortlink_core::table::Result;
use shortlink_core::{BackendError, IndexedTable, Page, PageCursor, ShortLinkRecord, Token};
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};

/// MySQL implementation of the indexed table contract.
///
/// Rows live in `short_links`, keyed by `id`, with a non-unique
/// `(token, id)` index serving token queries. Pages use keyset pagination on
/// `id`, so a page is stable even while new rows are inserted.
#[derive(Debug, Clone)]
pub struct MySqlTable {
    pool: MySqlPool,
}

impl MySqlTable {
    /// Creates a table from an existing MySQL connection pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Creates a table by opening a new MySQL connection pool.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = MySqlPool::connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
}

fn map_sqlx_error(err: sqlx::Error) -> BackendError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => BackendError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => BackendError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => BackendError::InvalidData(message),
        _ => BackendError::Query(message),
    }
}

fn row_to_record(row: &MySqlRow) -> Result<ShortLinkRecord> {
    let identifier: u64 = row.try_get("id").map_err(map_sqlx_error)?;
    let token: String = row.try_get("token").map_err(map_sqlx_error)?;
    let original_url: String = row.try_get("original_url").map_err(map_sqlx_error)?;

    Ok(ShortLinkRecord {
        identifier,
        token: Token::new_unchecked(token),
        original_url,
    })
}

#[async_trait]
impl IndexedTable for MySqlTable {
    async fn put_item(&self, record: &ShortLinkRecord) -> Result<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO short_links (id, token, original_url)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(record.identifier)
        .bind(record.token.as_str())
        .bind(record.original_url.as_str())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(err) if is_unique_violation(&err) => {
                Err(BackendError::Conflict(record.identifier.to_string()))
            }
            Err(err) => Err(map_sqlx_error(err)),
        }
    }

    async fn query_token_page(
        &self,
        token: &str,
        start_after: Option<PageCursor>,
        limit: usize,
    ) -> Result<Page> {
        let limit = limit.max(1);
        // one extra row tells us whether another page exists
        let fetch = (limit + 1) as u64;

        let rows = match start_after {
            None => {
                sqlx::query(
                    r#"
                    SELECT id, token, original_url
                    FROM short_links
                    WHERE token = ?
                    ORDER BY id
                    LIMIT ?
                    "#,
                )
                .bind(token)
                .bind(fetch)
                .fetch_all(&self.pool)
                .await
            }
            Some(cursor) => {
                sqlx::query(
                    r#"
                    SELECT id, token, original_url
                    FROM short_links
                    WHERE token = ?
                      AND id > ?
                    ORDER BY id
                    LIMIT ?
                    "#,
                )
                .bind(token)
                .bind(cursor.last_identifier)
                .bind(fetch)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(map_sqlx_error)?;

        let has_more = rows.len() > limit;
        let items = rows
            .iter()
            .take(limit)
            .map(row_to_record)
            .collect::<Result<Vec<_>>>()?;

        let next = match items.last() {
            Some(last) if has_more => Some(PageCursor {
                last_identifier: last.identifier,
            }),
            _ => None,
        };

        Ok(Page { items, next })
    }
}
