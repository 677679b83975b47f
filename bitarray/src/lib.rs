//! Represent sets of indices as compact, fixed-size bit arrays.
//!
//! # Overview
//!
//! A [BitArray] packs a fixed number of boolean flags eight-per-byte (most-significant bit
//! first). It is built for values that travel over the wire, such as the set of signers that
//! contributed to a threshold signature:
//! - Construction never panics: invalid or oversized requests return `None`.
//! - Accessors never panic: out-of-range (including negative) indices are ignored.
//! - Two deterministic encodings: JSON (`"xx_x"`) and a compact binary form (varint bit count
//!   followed by the packed bytes). Both encode a missing array as `null`.
//! - Decoding untrusted input returns an [Error] rather than panicking.
//!
//! # Example
//!
//! ```
//! use compact_bitarray::{compact_marshal, compact_unmarshal, marshal_json, BitArray};
//!
//! let mut signers = BitArray::new(5).unwrap();
//! signers.set_index(0, true);
//! signers.set_index(1, true);
//! assert_eq!(signers.to_string(), "xx___");
//! assert_eq!(signers.num_true_bits_before(5), 2);
//!
//! assert_eq!(marshal_json(Some(&signers)).unwrap(), b"\"xx___\"");
//! let bz = compact_marshal(Some(&signers));
//! assert_eq!(bz, [5, 0b1100_0000]);
//! assert_eq!(compact_unmarshal(&bz).unwrap(), Some(signers));
//!
//! // There is no empty bit array
//! assert!(BitArray::new(0).is_none());
//! assert_eq!(compact_marshal(None), b"null");
//! ```

mod bitarray;
pub use bitarray::{BitArray, BitIterator, MAX_ELEMS};
mod compact;
pub use compact::{
    compact_encode_size, compact_marshal, compact_unmarshal, compact_unmarshal_cfg, NULL,
};
mod config;
pub use config::SizeLimit;
mod error;
pub use error::Error;
mod json;
pub use json::{marshal_json, unmarshal_json};
pub mod varint;
