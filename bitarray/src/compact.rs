//! Compact binary encoding.
//!
//! A [BitArray] is encoded as its length in bits (a varint) followed by its packed storage,
//! verbatim. Absence is encoded as the four ASCII bytes `null`, mirroring the JSON encoding. Read
//! as a varint, the leading `n` announces 110 bits (14 bytes of payload) but only 3 bytes follow,
//! so the two encodings never collide.

use crate::{varint, BitArray, Error, SizeLimit};
use bytes::BufMut;
use tracing::debug;

/// Encoding of a missing [BitArray].
pub const NULL: &[u8] = b"null";

/// Returns the exact length of [compact_marshal]'s output.
pub fn compact_encode_size(array: Option<&BitArray>) -> usize {
    match array {
        Some(array) => varint::size(array.len() as u64) + array.elems.len(),
        None => NULL.len(),
    }
}

/// Encodes `array` in the compact binary format.
pub fn compact_marshal(array: Option<&BitArray>) -> Vec<u8> {
    let Some(array) = array else {
        return NULL.to_vec();
    };

    // Prefix with the number of bits, which is generally larger than the length of the storage
    let mut buf = Vec::with_capacity(compact_encode_size(Some(array)));
    varint::write(array.len() as u64, &mut buf);
    buf.put_slice(&array.elems);
    buf
}

/// Decodes the output of [compact_marshal], accepting any bit count.
pub fn compact_unmarshal(bz: &[u8]) -> Result<Option<BitArray>, Error> {
    compact_unmarshal_cfg(bz, &SizeLimit::UNBOUNDED)
}

/// Decodes the output of [compact_marshal], rejecting bit counts outside `limit`.
///
/// Besides malformed lengths, decoding fails with [Error::TrailingBits] if any bit after the last
/// bit of the array is set in the final byte. [compact_marshal] never sets them.
pub fn compact_unmarshal_cfg(bz: &[u8], limit: &SizeLimit) -> Result<Option<BitArray>, Error> {
    if bz == NULL {
        return Ok(None);
    }

    // Parse length, which must leave at least one byte of payload
    let (bits, n) = varint::decode(bz);
    let consumed = match usize::try_from(n) {
        Ok(consumed) if consumed > 0 && consumed < bz.len() => consumed,
        _ => {
            debug!(n, len = bz.len(), "varint length out of range");
            return Err(Error::InvalidVarintLength { n, len: bz.len() });
        }
    };

    // Parse storage
    let payload = &bz[consumed..];
    let expected = bits.div_ceil(u8::BITS as u64);
    if expected != payload.len() as u64 {
        debug!(bits, expected, found = payload.len(), "payload length mismatch");
        return Err(Error::InvalidLength {
            expected,
            found: payload.len(),
        });
    }
    if !limit.permits(bits) {
        debug!(bits, "bit count not in allowed range");
        return Err(Error::LengthExceeded(bits));
    }
    let mut array = isize::try_from(bits)
        .ok()
        .and_then(BitArray::new)
        .ok_or(Error::UnsupportedSize(bits))?;
    array.elems.copy_from_slice(payload);

    // Ensure there were no trailing bits
    if array.has_trailing_bits() {
        debug!(bits, "trailing bits set");
        return Err(Error::TrailingBits);
    }
    Ok(Some(array))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use test_case::test_case;

    fn build(bits: isize, set: &[isize]) -> Option<BitArray> {
        let mut array = BitArray::new(bits)?;
        for &i in set {
            assert!(array.set_index(i, true));
        }
        Some(array)
    }

    #[test_case(None, b"null"; "none")]
    #[test_case(build(0, &[]), b"null"; "zero bits")]
    #[test_case(build(1, &[]), &[1, 0]; "one clear")]
    #[test_case(build(1, &[0]), &[1, 128]; "one set")]
    #[test_case(build(5, &[0, 1]), &[5, 192]; "five")]
    #[test_case(build(9, &[0, 1, 8]), &[9, 192, 128]; "nine")]
    #[test_case(build(16, &[0, 1, 15]), &[16, 192, 1]; "sixteen")]
    #[test_case(
        build(128, &[127]),
        &[128, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1];
        "two byte varint"
    )]
    fn test_marshal_unmarshal(array: Option<BitArray>, expected: &[u8]) {
        let bz = compact_marshal(array.as_ref());
        assert_eq!(bz, expected);
        assert_eq!(compact_encode_size(array.as_ref()), bz.len());

        let decoded = compact_unmarshal(&bz).unwrap();
        assert_eq!(decoded, array);
        if let (Some(decoded), Some(array)) = (decoded, array) {
            assert_eq!(decoded.to_string(), array.to_string());
            assert_eq!(decoded.extra_bits_stored(), array.extra_bits_stored());
        }
    }

    #[test]
    fn test_round_trip_random() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let bits = rng.gen_range(1..2000);
            let mut array = BitArray::new(bits).unwrap();
            for i in 0..bits {
                array.set_index(i, rng.gen::<bool>());
            }
            let decoded = compact_unmarshal(&compact_marshal(Some(&array))).unwrap();
            assert_eq!(decoded, Some(array));
        }
    }

    #[test]
    fn test_overlong_varint() {
        let malicious = [
            0xd7, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x01, 0x24, 0x28,
        ];
        let err = compact_unmarshal(&malicious).unwrap_err();
        assert!(matches!(err, Error::InvalidVarintLength { n: -11, len: 13 }));
        assert!(err
            .to_string()
            .contains("n=-11 is out of range of input length 13"));
    }

    #[test_case(&[]; "empty")]
    #[test_case(&[0x80]; "truncated varint")]
    #[test_case(&[0x05]; "varint consumes everything")]
    #[test_case(&[0x00]; "zero bits without payload")]
    fn test_invalid_varint_length(bz: &[u8]) {
        assert!(matches!(
            compact_unmarshal(bz),
            Err(Error::InvalidVarintLength { .. })
        ));
    }

    #[test_case(&[0x00, 0x00]; "zero bits with payload")]
    #[test_case(&[0x05, 0xC0, 0x00]; "payload too long")]
    #[test_case(&[0x09, 0xC0]; "payload too short")]
    #[test_case(
        &[0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01, 0x00];
        "huge bit count"
    )]
    fn test_invalid_length(bz: &[u8]) {
        assert!(matches!(
            compact_unmarshal(bz),
            Err(Error::InvalidLength { .. })
        ));
    }

    #[test]
    fn test_trailing_bits() {
        assert!(matches!(
            compact_unmarshal(&[0x05, 0b1100_0100]),
            Err(Error::TrailingBits)
        ));
        assert!(matches!(
            compact_unmarshal(&[0x0F, 0xFF, 0b1111_1111]),
            Err(Error::TrailingBits)
        ));
        assert!(compact_unmarshal(&[0x0F, 0xFF, 0b1111_1110]).is_ok());
    }

    #[test]
    fn test_null_token_only_exact() {
        assert_eq!(compact_unmarshal(b"null").unwrap(), None);
        assert!(compact_unmarshal(b"null ").is_err());
        assert!(compact_unmarshal(b"nul").is_err());
    }

    #[test]
    fn test_size_limit() {
        let bz = compact_marshal(build(10, &[3]).as_ref());
        assert!(compact_unmarshal_cfg(&bz, &SizeLimit::exact(10)).unwrap().is_some());
        assert!(compact_unmarshal_cfg(&bz, &SizeLimit::new(1..=16)).unwrap().is_some());
        assert!(matches!(
            compact_unmarshal_cfg(&bz, &SizeLimit::at_most(9)),
            Err(Error::LengthExceeded(10))
        ));

        // Absence is accepted regardless of the limit
        assert_eq!(compact_unmarshal_cfg(NULL, &SizeLimit::exact(10)).unwrap(), None);
    }
}
