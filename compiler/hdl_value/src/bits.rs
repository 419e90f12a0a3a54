//! Fixed-width bit vectors.
//!
//! Bit `0` is the least significant bit. Storage is little-endian 64-bit
//! words with every bit at or above `width` kept clear, so derived equality
//! and hashing are structural.

use std::fmt;

use smallvec::{smallvec, SmallVec};

const WORD_BITS: usize = 64;

/// Arbitrary-width bit vector with two's-complement helpers.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Bits {
    width: usize,
    words: SmallVec<[u64; 2]>,
}

#[inline]
fn word_count(width: usize) -> usize {
    width.div_ceil(WORD_BITS)
}

impl Bits {
    /// All-zero vector of `width` bits.
    pub fn zero(width: usize) -> Self {
        Bits {
            width,
            words: smallvec![0; word_count(width)],
        }
    }

    /// `value` truncated to `width` bits.
    pub fn from_u64(width: usize, value: u64) -> Self {
        let mut bits = Bits::zero(width);
        if let Some(low) = bits.words.first_mut() {
            *low = value;
        }
        bits.clear_unused();
        bits
    }

    /// Two's-complement encoding of `value` in `width` bits (sign-extended
    /// or truncated as needed).
    pub fn from_i64(width: usize, value: i64) -> Self {
        let fill = if value < 0 { u64::MAX } else { 0 };
        let mut bits = Bits {
            width,
            words: smallvec![fill; word_count(width)],
        };
        if let Some(low) = bits.words.first_mut() {
            *low = value.cast_unsigned();
        }
        bits.clear_unused();
        bits
    }

    /// Build from bits listed least significant first.
    pub fn from_lsb_bools(bits: impl IntoIterator<Item = bool>) -> Self {
        let mut words: SmallVec<[u64; 2]> = SmallVec::new();
        let mut width = 0;
        for bit in bits {
            if width % WORD_BITS == 0 {
                words.push(0);
            }
            if bit {
                if let Some(word) = words.last_mut() {
                    *word |= 1 << (width % WORD_BITS);
                }
            }
            width += 1;
        }
        Bits { width, words }
    }

    /// Parse a most-significant-first string of `0`/`1` digits; `_` is
    /// ignored as a separator.
    pub fn from_binary_str(text: &str) -> Option<Self> {
        let digits: Vec<bool> = text
            .chars()
            .filter(|c| *c != '_')
            .map(|c| match c {
                '0' => Some(false),
                '1' => Some(true),
                _ => None,
            })
            .collect::<Option<_>>()?;
        Some(Bits::from_lsb_bools(digits.into_iter().rev()))
    }

    #[inline]
    pub const fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0
    }

    /// Bit `index`; out-of-range indices read as zero.
    #[inline]
    pub fn get(&self, index: usize) -> bool {
        index < self.width && (self.words[index / WORD_BITS] >> (index % WORD_BITS)) & 1 == 1
    }

    pub fn msb(&self) -> bool {
        self.width > 0 && self.get(self.width - 1)
    }

    pub fn is_zero(&self) -> bool {
        self.words.iter().all(|w| *w == 0)
    }

    /// Bits least significant first.
    pub fn iter_lsb(&self) -> impl DoubleEndedIterator<Item = bool> + '_ {
        (0..self.width).map(|i| self.get(i))
    }

    /// `width` bits starting at bit `start`, or `None` if the window runs
    /// past the end.
    pub fn slice(&self, start: usize, width: usize) -> Option<Bits> {
        let end = start.checked_add(width)?;
        if end > self.width {
            return None;
        }
        Some(Bits::from_lsb_bools((start..end).map(|i| self.get(i))))
    }

    /// Bit-order reversal: bit `i` moves to `width - 1 - i`.
    #[must_use]
    pub fn reverse(&self) -> Bits {
        Bits::from_lsb_bools(self.iter_lsb().rev())
    }

    /// `self ++ low`: `self` supplies the high-order bits.
    #[must_use]
    pub fn concat(&self, low: &Bits) -> Bits {
        Bits::from_lsb_bools(low.iter_lsb().chain(self.iter_lsb()))
    }

    /// Truncate or extend to `width` bits, replicating the sign bit when
    /// `sign_extend` is set.
    #[must_use]
    pub fn resize(&self, width: usize, sign_extend: bool) -> Bits {
        let fill = sign_extend && self.msb();
        Bits::from_lsb_bools((0..width).map(|i| if i < self.width { self.get(i) } else { fill }))
    }

    /// Whether resizing to `width` bits keeps the value: narrowing drops
    /// only copies of the sign bit (`signed`) or zeros.
    pub fn fits_in(&self, width: usize, signed: bool) -> bool {
        width >= self.width || self.resize(width, signed).resize(self.width, signed) == *self
    }

    /// Unsigned value, if it fits in 64 bits.
    pub fn to_u64(&self) -> Option<u64> {
        if self.words.iter().skip(1).any(|w| *w != 0) {
            return None;
        }
        Some(self.words.first().copied().unwrap_or(0))
    }

    /// Two's-complement value, if it fits in 64 bits.
    pub fn to_i64(&self) -> Option<i64> {
        if self.width == 0 {
            return Some(0);
        }
        let negative = self.msb();
        if (WORD_BITS - 1..self.width).any(|i| self.get(i) != negative) {
            return None;
        }
        let low = self.words[0];
        if self.width >= WORD_BITS || !negative {
            Some(low.cast_signed())
        } else {
            Some((low | (u64::MAX << self.width)).cast_signed())
        }
    }

    /// Most-significant-first `0`/`1` digits.
    pub fn to_binary_string(&self) -> String {
        self.iter_lsb()
            .rev()
            .map(|bit| if bit { '1' } else { '0' })
            .collect()
    }

    fn clear_unused(&mut self) {
        let rem = self.width % WORD_BITS;
        if rem != 0 {
            if let Some(last) = self.words.last_mut() {
                *last &= (1u64 << rem) - 1;
            }
        }
    }
}

impl fmt::Debug for Bits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bits[{}](0b{})", self.width, self.to_binary_string())
    }
}

impl fmt::Display for Bits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0b{}", self.to_binary_string())
    }
}
