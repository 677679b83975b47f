//! Fixed-capacity bit array
//!
//! Bits are packed eight-per-byte, most-significant bit first: bit `i` lives in byte `i / 8` under
//! the mask `0x80 >> (i % 8)`. Only the top [BitArray::extra_bits_stored] bits of the final byte
//! belong to the array. An invariant of the implementation is that the remaining low bits of the
//! final byte are always 0, which keeps both encodings canonical.
//!
//! There is no zero-length [BitArray]. Every operation that could produce one (a non-positive
//! size, an oversized request, the `null` encoding) produces `None` instead, so "no bit array" is
//! always spelled `Option::<BitArray>::None`.

use crate::Error;
use core::{
    fmt::{self, Formatter, Write as _},
    str::FromStr,
};

/// Number of bits in a byte of storage.
const BITS_PER_BYTE: usize = u8::BITS as usize;

/// Byte with all bits set.
const FULL_BYTE: u8 = u8::MAX;

/// Largest number of storage bytes a [BitArray] may hold.
pub const MAX_ELEMS: usize = i32::MAX as usize;

/// Represents a fixed-size array of bits.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BitArray {
    /// Number of bits of the final byte that belong to the array, in `[1, 8]`.
    pub(crate) extra_bits_stored: u8,
    /// The packed bits. Never empty.
    pub(crate) elems: Vec<u8>,
}

// A concrete array always holds at least one bit.
#[allow(clippy::len_without_is_empty)]
impl BitArray {
    /// Creates a new `BitArray` with `bits` bits, all initialized to false.
    ///
    /// Returns `None` if `bits` is not positive or if storing it would need more than
    /// [MAX_ELEMS] bytes.
    pub fn new(bits: isize) -> Option<Self> {
        let bits = usize::try_from(bits).ok()?;
        let num_elems = Self::num_elems(bits)?;
        let extra_bits_stored = bits - BITS_PER_BYTE * (num_elems - 1);
        Some(Self {
            extra_bits_stored: extra_bits_stored as u8,
            elems: vec![0; num_elems],
        })
    }

    /// Returns the number of bits in the array.
    #[inline]
    pub fn len(&self) -> usize {
        BITS_PER_BYTE * (self.elems.len() - 1) + self.extra_bits_stored as usize
    }

    /// Returns the number of bits of the final byte that belong to the array.
    #[inline]
    pub fn extra_bits_stored(&self) -> u8 {
        self.extra_bits_stored
    }

    /// Returns the packed storage.
    #[inline]
    pub fn elems(&self) -> &[u8] {
        &self.elems
    }

    /// Gets the value of the bit at `index`.
    ///
    /// Returns false if `index` is negative or out of bounds.
    #[inline]
    pub fn get_index(&self, index: isize) -> bool {
        match self.checked_index(index) {
            Some(index) => self.get_bit_unchecked(index),
            None => false,
        }
    }

    /// Sets the bit at `index` to `value`.
    ///
    /// Returns false, leaving the array untouched, if `index` is negative or out of bounds.
    #[inline]
    pub fn set_index(&mut self, index: isize, value: bool) -> bool {
        let Some(index) = self.checked_index(index) else {
            return false;
        };
        let mask = Self::bit_mask(index);
        let elem = &mut self.elems[Self::elem_index(index)];
        if value {
            *elem |= mask;
        } else {
            *elem &= !mask;
        }
        true
    }

    /// Returns the number of true bits in `[0, index)`.
    ///
    /// `index` is clamped to the length of the array. A non-positive `index` yields 0.
    pub fn num_true_bits_before(&self, index: isize) -> usize {
        let Ok(index) = usize::try_from(index) else {
            return 0;
        };
        let index = index.min(self.len());

        // Count whole bytes before the boundary byte
        let boundary = Self::elem_index(index);
        let mut count: usize = self.elems[..boundary]
            .iter()
            .map(|elem| elem.count_ones() as usize)
            .sum();

        // Count the leading bits of the boundary byte
        let offset = Self::bit_offset(index);
        if offset > 0 {
            let mask = FULL_BYTE << (BITS_PER_BYTE - offset);
            count += (self.elems[boundary] & mask).count_ones() as usize;
        }
        count
    }

    /// Returns the number of true bits.
    #[inline]
    pub fn count_ones(&self) -> usize {
        self.elems
            .iter()
            .map(|elem| elem.count_ones() as usize)
            .sum()
    }

    /// Creates an iterator over the bits.
    pub fn iter(&self) -> BitIterator<'_> {
        BitIterator {
            array: self,
            pos: 0,
        }
    }

    /// Renders the array as `BA{<len>:<bits>}`.
    ///
    /// Within a line, `indent` follows every 10th bit and again every 50th bit. Lines hold 100
    /// bits and are separated by a newline followed by `indent`.
    pub fn string_indented(&self, indent: &str) -> String {
        let len = self.len();
        let mut lines = Vec::with_capacity(len.div_ceil(100));
        let mut line = String::new();
        for (i, bit) in self.iter().enumerate() {
            line.push(if bit { 'x' } else { '_' });
            let pos = i + 1;
            if pos % 100 == 0 || pos == len {
                lines.push(core::mem::take(&mut line));
                continue;
            }
            if pos % 10 == 0 {
                line.push_str(indent);
            }
            if pos % 50 == 0 {
                line.push_str(indent);
            }
        }
        let separator = format!("\n{indent}");
        format!("BA{{{len}:{}}}", lines.join(separator.as_str()))
    }

    // ---------- Helper Functions ----------

    /// Calculates the number of bytes needed to store `bits`, if allowed.
    #[inline]
    fn num_elems(bits: usize) -> Option<usize> {
        if bits == 0 {
            return None;
        }
        let num_elems = bits.checked_add(BITS_PER_BYTE - 1)? / BITS_PER_BYTE;
        (num_elems <= MAX_ELEMS).then_some(num_elems)
    }

    /// Converts a signed index into a position within the array.
    #[inline(always)]
    fn checked_index(&self, index: isize) -> Option<usize> {
        let index = usize::try_from(index).ok()?;
        (index < self.len()).then_some(index)
    }

    /// Calculates the byte index for a given bit index.
    #[inline(always)]
    fn elem_index(index: usize) -> usize {
        index / BITS_PER_BYTE
    }

    /// Calculates the bit offset within a byte, counted from the most-significant bit.
    #[inline(always)]
    fn bit_offset(index: usize) -> usize {
        index % BITS_PER_BYTE
    }

    /// Mask selecting the bit at `index` within its byte.
    #[inline(always)]
    fn bit_mask(index: usize) -> u8 {
        0x80 >> Self::bit_offset(index)
    }

    #[inline(always)]
    fn get_bit_unchecked(&self, index: usize) -> bool {
        self.elems[Self::elem_index(index)] & Self::bit_mask(index) != 0
    }

    /// Returns true if any bit after the end of the array is set in the final byte.
    pub(crate) fn has_trailing_bits(&self) -> bool {
        let unused = FULL_BYTE
            .checked_shr(u32::from(self.extra_bits_stored))
            .unwrap_or(0);
        self.elems
            .last()
            .is_some_and(|&last| last & unused != 0)
    }
}

// ---------- Text ----------

impl fmt::Display for BitArray {
    /// Writes one character per bit: `x` for true, `_` for false.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for bit in self.iter() {
            f.write_char(if bit { 'x' } else { '_' })?;
        }
        Ok(())
    }
}

impl fmt::Debug for BitArray {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.string_indented(""))
    }
}

impl FromStr for BitArray {
    type Err = Error;

    /// Parses the [fmt::Display] form of a `BitArray`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some((index, character)) = s.char_indices().find(|&(_, c)| c != 'x' && c != '_') {
            return Err(Error::InvalidCharacter { character, index });
        }

        // Every character is a single byte
        let bits = isize::try_from(s.len()).map_err(|_| Error::UnsupportedSize(s.len() as u64))?;
        let mut array = match Self::new(bits) {
            Some(array) => array,
            None if s.is_empty() => return Err(Error::Empty),
            None => return Err(Error::UnsupportedSize(s.len() as u64)),
        };
        for (i, c) in s.bytes().enumerate() {
            if c == b'x' {
                let mask = Self::bit_mask(i);
                array.elems[Self::elem_index(i)] |= mask;
            }
        }
        Ok(array)
    }
}

// ---------- Iterator ----------

/// Iterator over bits in a [BitArray]
pub struct BitIterator<'a> {
    /// Reference to the BitArray being iterated over
    array: &'a BitArray,

    /// Current position in the BitArray (0-indexed)
    pos: usize,
}

impl Iterator for BitIterator<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.array.len() {
            return None;
        }

        let bit = self.array.get_bit_unchecked(self.pos);
        self.pos += 1;
        Some(bit)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.array.len() - self.pos;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for BitIterator<'_> {}

impl<'a> IntoIterator for &'a BitArray {
    type Item = bool;
    type IntoIter = BitIterator<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
