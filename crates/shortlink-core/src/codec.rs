use crate::error::Result;
use crate::token::Token;

/// A reversible mapping between identifiers and tokens.
///
/// Implementations must be deterministic: the token is stored as the
/// secondary-index key, so the same identifier has to encode to the same
/// token on every call and on every node.
pub trait TokenCodec: Send + Sync + 'static {
    /// Encodes an identifier into its token.
    fn encode(&self, identifier: u64) -> Token;

    /// Decodes a token back into the identifier it was produced from.
    ///
    /// Fails with [`CoreError::InvalidTokenFormat`][crate::CoreError] for any
    /// string `encode` could not have produced.
    fn decode(&self, token: &str) -> Result<u64>;
}
