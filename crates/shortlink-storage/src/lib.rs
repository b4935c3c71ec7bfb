//! Storage backends and the paginated record store.

pub mod memory;
pub mod mysql;
pub mod paged;
pub mod timeout;

pub use memory::InMemoryTable;
pub use mysql::MySqlTable;
pub use paged::{LookupState, PagedRecordStore, TokenPager, DEFAULT_PAGE_SIZE};
pub use shortlink_core::{
    BackendError, IndexedTable, Page, PageCursor, RecordStore, ShortLinkRecord, StorageError,
};
pub use timeout::TimeoutTable;
