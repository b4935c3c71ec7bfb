use crate::base62::Base62Codec;
use crate::codec::TokenCodec;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt::Display;

/// The public short-URL path segment derived from an identifier.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(SmolStr);

impl Token {
    /// Parses a token, accepting only canonical base62 tokens.
    pub fn parse(token: &str) -> Result<Self> {
        Base62Codec.decode(token)?;
        Ok(Self(SmolStr::new(token)))
    }

    /// Creates a `Token` without validation.
    ///
    /// Use this only for tokens produced by a [`TokenCodec`] or read back
    /// from trusted storage.
    pub fn new_unchecked(token: impl AsRef<str>) -> Self {
        Self(SmolStr::new(token))
    }

    /// Returns the token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Generates the full shortened URL based on the provided base URL.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self)
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Token").field(&self.0).finish()
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    #[test]
    fn parse_accepts_canonical_tokens() {
        let token = Token::parse("EEAA2fZJJ9A").unwrap();
        assert_eq!(token.as_str(), "EEAA2fZJJ9A");
    }

    #[test]
    fn parse_rejects_malformed_tokens() {
        assert!(matches!(
            Token::parse("!!!invalid!!!"),
            Err(CoreError::InvalidTokenFormat(_))
        ));
    }

    #[test]
    fn to_url_joins_base_and_token() {
        let token = Token::new_unchecked("EEAA2fZJJ9A");
        assert_eq!(token.to_url("https://sho.rt"), "https://sho.rt/EEAA2fZJJ9A");
        assert_eq!(token.to_url("https://sho.rt/"), "https://sho.rt/EEAA2fZJJ9A");
    }

    #[test]
    fn serializes_as_plain_string() {
        let token = Token::new_unchecked("EEAA2fZJJ9A");
        assert_eq!(serde_json::to_string(&token).unwrap(), "\"EEAA2fZJJ9A\"");
    }
}
