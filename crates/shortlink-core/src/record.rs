use crate::codec::TokenCodec;
use crate::token::Token;
use serde::{Deserialize, Serialize};

/// A persisted short link.
///
/// Records are created once and never mutated. `token` is always
/// `encode(identifier)`; stores refuse records where it is not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortLinkRecord {
    /// Globally unique identifier, the primary key.
    pub identifier: u64,
    /// Base62 encoding of `identifier`, the secondary-index key.
    pub token: Token,
    /// The original URL that was shortened.
    pub original_url: String,
}

impl ShortLinkRecord {
    /// Builds a record whose token is derived from `identifier`.
    pub fn new<C: TokenCodec + ?Sized>(
        identifier: u64,
        original_url: impl Into<String>,
        codec: &C,
    ) -> Self {
        Self {
            identifier,
            token: codec.encode(identifier),
            original_url: original_url.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base62::Base62Codec;

    #[test]
    fn new_derives_token_from_identifier() {
        let record = ShortLinkRecord::new(550_726_476_329_124_100, "http://example.com", &Base62Codec);
        assert_eq!(record.token.as_str(), "EEAA2fZJJ9A");
        assert_eq!(record.original_url, "http://example.com");
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let record = ShortLinkRecord::new(1, "http://example.com", &Base62Codec);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["identifier"], 1);
        assert_eq!(json["token"], "BAAAAAAAAAA");
        assert_eq!(json["originalUrl"], "http://example.com");
    }
}
