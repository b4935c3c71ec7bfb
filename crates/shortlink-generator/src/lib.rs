pub mod error;
pub mod seq;

use shortlink_flake::{Clock, Flake};

pub use error::IdentifierError;
pub use seq::SeqGenerator;

/// Trait for allocating record identifiers.
///
/// Implementations are pure generators that don't interact with storage.
/// Every value returned must be unique across all sources sharing a
/// deployment, and a single source must never go backwards.
pub trait IdentifierSource: Send + Sync + 'static {
    /// Allocates the next identifier.
    fn next(&self) -> Result<u64, IdentifierError>;
}

impl<C: Clock + 'static> IdentifierSource for Flake<C> {
    fn next(&self) -> Result<u64, IdentifierError> {
        self.next_id().map(u64::from).map_err(IdentifierError::from)
    }
}
