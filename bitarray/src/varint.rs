//! Variable-length integer encoding and decoding
//!
//! Unsigned LEB128, as used by Protocol Buffers. Each byte uses:
//! - 7 bits for the value (least-significant group first)
//! - 1 "continuation" bit to indicate if more bytes follow

use bytes::BufMut;

const DATA_BITS_PER_BYTE: usize = 7;
const DATA_BITS_MASK: u8 = 0x7F;
const CONTINUATION_BIT_MASK: u8 = 0x80;

/// Maximum number of bytes needed to encode a `u64`.
pub const MAX_LEN_U64: usize = 10;

/// Appends `value` to `buf`, least-significant group first.
pub fn write(value: u64, buf: &mut impl BufMut) {
    let len = size(value);
    for group in 0..len {
        let bits = (value >> (group * DATA_BITS_PER_BYTE)) as u8 & DATA_BITS_MASK;
        if group + 1 < len {
            buf.put_u8(bits | CONTINUATION_BIT_MASK);
        } else {
            buf.put_u8(bits);
        }
    }
}

/// Returns the number of bytes [write] appends for `value`.
pub fn size(value: u64) -> usize {
    // Zero still occupies one byte
    let significant = (u64::BITS - (value | 1).leading_zeros()) as usize;
    significant.div_ceil(DATA_BITS_PER_BYTE)
}

/// Decodes a varint from the start of `buf`.
///
/// Returns the value and the number of bytes consumed, `n`:
/// - `n > 0`: the value was read from the first `n` bytes
/// - `n == 0`: `buf` ended before the varint did (the value is 0)
/// - `n < 0`: the value overflows a `u64` and `-n` bytes were inspected (the value is 0)
///
/// Callers must validate `n` before using it to index into `buf`.
pub fn decode(buf: &[u8]) -> (u64, isize) {
    let mut result: u64 = 0;
    let mut shift = 0;
    for (i, &byte) in buf.iter().enumerate() {
        // Every byte after the tenth is an overflow
        if i == MAX_LEN_U64 {
            return (0, -(i as isize + 1));
        }

        if byte & CONTINUATION_BIT_MASK == 0 {
            // The tenth byte may only contribute the 64th bit
            if i == MAX_LEN_U64 - 1 && byte > 1 {
                return (0, -(i as isize + 1));
            }
            return (result | (u64::from(byte) << shift), i as isize + 1);
        }

        result |= u64::from(byte & DATA_BITS_MASK) << shift;
        shift += DATA_BITS_PER_BYTE;
    }
    (0, 0)
}
