//! Error types for decoding operations

use thiserror::Error;

/// Error type for decoding a [crate::BitArray] from text, JSON, or compact bytes.
#[derive(Error, Debug)]
pub enum Error {
    #[error("bit array must contain at least one bit")]
    Empty,
    #[error("invalid character {character:?} at index {index}")]
    InvalidCharacter { character: char, index: usize },
    #[error("invalid varint: n={n} is out of range of input length {len}")]
    InvalidVarintLength { n: isize, len: usize },
    #[error("invalid payload length: expected {expected} bytes, found {found}")]
    InvalidLength { expected: u64, found: usize },
    #[error("unsupported bit count: {0}")]
    UnsupportedSize(u64),
    #[error("bit count not in allowed range: {0}")]
    LengthExceeded(u64),
    #[error("unused bits in final byte are set")]
    TrailingBits,
    #[error("bit array json must be null or a quoted string")]
    NotQuoted,
    #[error("invalid utf-8: {0}")]
    Utf8(#[from] core::str::Utf8Error),
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
}
