//! Base62 token encoding.
//!
//! The identifier is serialized as 8 big-endian bytes and that bit string is
//! consumed from its least significant end. Each step takes 6 bits; when the
//! low five bits of the group are `1111x` (values 30, 31, 62 and 63) only 5
//! bits are consumed and symbol 30 or 31 is emitted instead. Every 6-bit group
//! left after that rule fits in the 62-symbol alphabet, so the mapping is
//! bijective without a big-number division. Symbols are written in the order
//! they are consumed.
//!
//! ```text
//! 550726476329124100  <->  "EEAA2fZJJ9A"
//! ```

use crate::codec::TokenCodec;
use crate::error::{CoreError, Result};
use crate::token::Token;

/// Symbol table, indexed by symbol value.
pub const ALPHABET: &[u8; 62] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Longest token any identifier encodes to.
pub const MAX_TOKEN_LEN: usize = 13;

const PAYLOAD_BITS: u32 = u64::BITS;
const MASK_5BITS: u64 = 0x1F;
const MASK_6BITS: u64 = 0x3F;
const COMPACT_MASK: u64 = 0x1E;

const INVALID_SYMBOL: u8 = 0xFF;
const DECODE_TABLE: [u8; 256] = build_decode_table();

const fn build_decode_table() -> [u8; 256] {
    let mut table = [INVALID_SYMBOL; 256];
    let mut i = 0;
    while i < ALPHABET.len() {
        table[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    table
}

fn is_compact(symbol: u64) -> bool {
    symbol & COMPACT_MASK == COMPACT_MASK
}

/// Encodes 8 bytes into a token string.
pub fn encode(bytes: [u8; 8]) -> String {
    let mut value = u64::from_be_bytes(bytes);
    let mut remaining = PAYLOAD_BITS as i32;
    let mut out = String::with_capacity(MAX_TOKEN_LEN);

    while remaining > 0 {
        let mut symbol = value & MASK_6BITS;
        let width = if is_compact(symbol) {
            symbol &= MASK_5BITS;
            5
        } else {
            6
        };
        out.push(ALPHABET[symbol as usize] as char);
        value >>= width;
        remaining -= width as i32;
    }

    out
}

/// Decodes a token string back into the 8 bytes it was produced from.
pub fn decode(token: &str) -> Result<[u8; 8]> {
    if token.is_empty() {
        return Err(CoreError::InvalidTokenFormat("token is empty".to_string()));
    }

    let mut value: u128 = 0;
    let mut bits: u32 = 0;

    for (position, byte) in token.bytes().enumerate() {
        if bits >= PAYLOAD_BITS {
            return Err(CoreError::InvalidTokenFormat(format!(
                "token '{token}' decodes to more than 8 bytes"
            )));
        }

        let symbol = DECODE_TABLE[byte as usize];
        if symbol == INVALID_SYMBOL {
            return Err(CoreError::InvalidTokenFormat(format!(
                "unexpected character at position {position} in '{token}'"
            )));
        }

        value |= u128::from(symbol) << bits;
        bits += if is_compact(u64::from(symbol)) { 5 } else { 6 };
    }

    if bits < PAYLOAD_BITS {
        return Err(CoreError::InvalidTokenFormat(format!(
            "token '{token}' decodes to fewer than 8 bytes"
        )));
    }

    if value >> PAYLOAD_BITS != 0 {
        return Err(CoreError::InvalidTokenFormat(format!(
            "token '{token}' has non-zero padding bits"
        )));
    }

    Ok((value as u64).to_be_bytes())
}

/// The production [`TokenCodec`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Base62Codec;

impl TokenCodec for Base62Codec {
    fn encode(&self, identifier: u64) -> Token {
        Token::new_unchecked(encode(identifier.to_be_bytes()))
    }

    fn decode(&self, token: &str) -> Result<u64> {
        decode(token).map(u64::from_be_bytes)
    }
}
