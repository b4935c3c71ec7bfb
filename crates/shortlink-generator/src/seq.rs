use crate::{IdentifierError, IdentifierSource};
use std::sync::atomic::{AtomicU64, Ordering};

/// A deterministic identifier source using a sequential counter.
///
/// Produces `offset, offset + 1, ...`. Intended for tests and single-process
/// tooling where a predictable identifier stream matters more than global
/// uniqueness.
#[derive(Debug)]
pub struct SeqGenerator {
    counter: AtomicU64,
}

impl SeqGenerator {
    /// Creates a generator whose first identifier is `offset`.
    pub fn starting_at(offset: u64) -> Self {
        Self {
            counter: AtomicU64::new(offset),
        }
    }
}

impl Default for SeqGenerator {
    fn default() -> Self {
        Self::starting_at(0)
    }
}

impl Clone for SeqGenerator {
    fn clone(&self) -> Self {
        Self::starting_at(self.counter.load(Ordering::SeqCst))
    }
}

impl IdentifierSource for SeqGenerator {
    fn next(&self) -> Result<u64, IdentifierError> {
        self.counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                current.checked_add(1)
            })
            .map_err(|_| IdentifierError::Generator("sequence exhausted".to_string()))
    }
}
