//! Core types and traits for the shortlink URL shortener.
//!
//! This crate holds the record model, the token codec and the storage trait
//! seams (record store, indexed table) shared by the storage and shortener
//! crates.

pub mod base62;
pub mod codec;
pub mod error;
pub mod record;
pub mod repository;
pub mod table;
pub mod token;

pub use base62::Base62Codec;
pub use codec::TokenCodec;
pub use error::{BackendError, CoreError, StorageError};
pub use record::ShortLinkRecord;
pub use repository::RecordStore;
pub use table::{IndexedTable, Page, PageCursor};
pub use token::Token;
