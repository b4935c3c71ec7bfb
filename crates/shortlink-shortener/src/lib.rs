//! URL shortener service implementation.
//!
//! Ties an identifier source, a token codec and a record store together
//! behind the [`Shortener`] trait.

pub mod error;
pub mod service;
pub mod shortener;

pub use error::{ResolveError, ShortenError};
pub use service::ShortenerService;
pub use shortener::Shortener;
