//! Limits applied while decoding untrusted input.

use core::ops::{Bound, RangeBounds};

/// Inclusive bounds on the number of bits a compact decoder will accept.
///
/// The compact format prefixes the payload with its bit count, so a decoder can reject an
/// unexpected size before allocating for the payload. Callers that know how many participants a
/// bit array tracks should pass [SizeLimit::exact].
///
/// # Examples
///
/// ```
/// use compact_bitarray::SizeLimit;
///
/// let limit = SizeLimit::new(1..=1024);
/// assert!(limit.permits(500));
/// assert!(!limit.permits(2000));
///
/// let exact = SizeLimit::exact(100);
/// assert!(exact.permits(100));
/// assert!(!exact.permits(99));
///
/// // The default accepts any size that fits in memory
/// assert!(SizeLimit::default().permits(usize::MAX as u64));
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct SizeLimit {
    min: usize,
    max: usize,
}

impl SizeLimit {
    /// Accepts every bit count addressable on this platform.
    pub const UNBOUNDED: Self = Self {
        min: 0,
        max: usize::MAX,
    };

    /// Accepts nothing.
    const EMPTY: Self = Self { min: 1, max: 0 };

    /// Converts any range of bit counts into inclusive bounds.
    pub fn new(range: impl RangeBounds<usize>) -> Self {
        let min = match range.start_bound() {
            Bound::Included(&min) => Some(min),
            Bound::Excluded(&min) => min.checked_add(1),
            Bound::Unbounded => Some(0),
        };
        let max = match range.end_bound() {
            Bound::Included(&max) => Some(max),
            Bound::Excluded(&max) => max.checked_sub(1),
            Bound::Unbounded => Some(usize::MAX),
        };
        match (min, max) {
            (Some(min), Some(max)) => Self { min, max },
            _ => Self::EMPTY,
        }
    }

    /// Accepts exactly `bits`.
    pub const fn exact(bits: usize) -> Self {
        Self {
            min: bits,
            max: bits,
        }
    }

    /// Accepts any bit count up to and including `bits`.
    pub const fn at_most(bits: usize) -> Self {
        Self { min: 0, max: bits }
    }

    /// Returns whether a decoded bit count lies within the limit.
    ///
    /// Counts that do not fit in a `usize` are never permitted.
    pub fn permits(&self, bits: u64) -> bool {
        usize::try_from(bits).is_ok_and(|bits| self.min <= bits && bits <= self.max)
    }
}

impl Default for SizeLimit {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}
