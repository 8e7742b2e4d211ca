//! Packed bit buffer backing the Elias-Fano stores.
//!
//! Bits are stored least-significant first in 64-bit words: bit `i` lives in
//! word `i / 64` at position `i % 64`.
//!
//! # Layout
//!
//! ```text
//! word 0: bits 63 ..  0
//! word 1: bits 127 .. 64
//! ...
//! ```
//!
//! Bits at positions `>= len` in the last word are always zero, so whole-word
//! scans (`count_ones`, `next_one`) never see garbage past the end.

use crate::error::{Error, Result};

const WORD_LEN: usize = 64;

/// Mask selecting the low `width` bits of a word.
#[inline]
pub(crate) fn low_mask(width: usize) -> u64 {
    if width >= WORD_LEN {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

/// An append-only packed bit buffer.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct BitVector {
    words: Vec<u64>,
    len: usize,
}

impl std::fmt::Debug for BitVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BitVector")
            .field("len", &self.len)
            .field("ones", &self.count_ones())
            .finish()
    }
}

impl BitVector {
    /// Create an empty bit vector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty bit vector with room for `bits` bits.
    pub fn with_capacity(bits: usize) -> Self {
        Self {
            words: Vec::with_capacity(bits.div_ceil(WORD_LEN)),
            len: 0,
        }
    }

    /// Rebuild a bit vector from raw words and a bit length.
    ///
    /// Fails if `words` is not exactly `ceil(len / 64)` long or if any bit past
    /// `len` is set.
    pub fn from_parts(words: Vec<u64>, len: usize) -> Result<Self> {
        if words.len() != len.div_ceil(WORD_LEN) {
            return Err(Error::InvalidEncoding(format!(
                "{} words cannot hold exactly {len} bits",
                words.len()
            )));
        }
        let tail = len % WORD_LEN;
        if tail != 0 {
            if let Some(&last) = words.last() {
                if last >> tail != 0 {
                    return Err(Error::InvalidEncoding(
                        "set bits past the end of the bit vector".to_string(),
                    ));
                }
            }
        }
        Ok(Self { words, len })
    }

    /// Append a single bit.
    pub fn push(&mut self, bit: bool) {
        let offset = self.len % WORD_LEN;
        if offset == 0 {
            self.words.push(0);
        }
        if bit {
            let last = self.words.len() - 1;
            self.words[last] |= 1u64 << offset;
        }
        self.len += 1;
    }

    /// Append the low `width` bits of `value`, least-significant bit first.
    ///
    /// `width` must be at most 64.
    pub fn push_bits(&mut self, value: u64, width: usize) {
        debug_assert!(width <= WORD_LEN);
        if width == 0 {
            return;
        }
        let value = value & low_mask(width);
        let offset = self.len % WORD_LEN;
        if offset == 0 {
            self.words.push(value);
        } else {
            let last = self.words.len() - 1;
            self.words[last] |= value << offset;
            if offset + width > WORD_LEN {
                // Split across words
                self.words.push(value >> (WORD_LEN - offset));
            }
        }
        self.len += width;
    }

    /// Return the number of bits.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Return true if the bit vector holds no bits.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The backing words.
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    /// Approximate heap memory usage in bytes.
    pub fn heap_bytes(&self) -> usize {
        self.words.capacity() * 8
    }

    /// Return true if the bit at index `i` is set. Out-of-range bits read as unset.
    pub fn get(&self, i: usize) -> bool {
        if i >= self.len {
            return false;
        }
        (self.words[i / WORD_LEN] & (1u64 << (i % WORD_LEN))) != 0
    }

    /// Read `width` bits starting at `pos` as an integer (first bit is the least significant).
    ///
    /// `width` must be at most 64. Bits past the end read as zero.
    pub fn get_bits(&self, pos: usize, width: usize) -> u64 {
        debug_assert!(width <= WORD_LEN);
        if width == 0 {
            return 0;
        }
        let word_idx = pos / WORD_LEN;
        let offset = pos % WORD_LEN;
        let Some(&first) = self.words.get(word_idx) else {
            return 0;
        };

        let mut bits = first >> offset;
        if offset + width > WORD_LEN {
            if let Some(&next) = self.words.get(word_idx + 1) {
                bits |= next << (WORD_LEN - offset);
            }
        }
        bits & low_mask(width)
    }

    /// Position of the first set bit at or after `pos`.
    pub fn next_one(&self, pos: usize) -> Option<usize> {
        if pos >= self.len {
            return None;
        }
        let mut word_idx = pos / WORD_LEN;
        let mut word = self.words[word_idx] & (u64::MAX << (pos % WORD_LEN));
        loop {
            if word != 0 {
                let found = word_idx * WORD_LEN + word.trailing_zeros() as usize;
                return (found < self.len).then_some(found);
            }
            word_idx += 1;
            word = *self.words.get(word_idx)?;
        }
    }

    /// Return the number of set bits.
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Append the little-endian encoding of this bit vector to `out`.
    ///
    /// Format: `len: u64`, `word_count: u64`, then `word_count` u64 words.
    pub(crate) fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&(self.len as u64).to_le_bytes());
        out.extend_from_slice(&(self.words.len() as u64).to_le_bytes());
        for &w in &self.words {
            out.extend_from_slice(&w.to_le_bytes());
        }
    }

    /// Read a bit vector written by [`BitVector::write_to`].
    pub(crate) fn read_from(reader: &mut ByteReader<'_>) -> Result<Self> {
        let len = reader.read_usize()?;
        let word_count = reader.read_usize()?;

        // Bound allocation against the remaining input to prevent allocation bombs.
        if word_count.saturating_mul(8) > reader.remaining() {
            return Err(Error::InvalidEncoding(format!(
                "word count ({word_count}) too large for input ({} bytes left)",
                reader.remaining()
            )));
        }

        let mut words = Vec::with_capacity(word_count);
        for _ in 0..word_count {
            words.push(reader.read_u64()?);
        }
        Self::from_parts(words, len)
    }
}

/// Forward-only reader over a byte slice with bounds-checked reads.
pub(crate) struct ByteReader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> ByteReader<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    pub(crate) fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self
            .offset
            .checked_add(n)
            .filter(|&end| end <= self.bytes.len())
            .ok_or_else(|| Error::InvalidEncoding("unexpected end of input".to_string()))?;
        let slice = &self.bytes[self.offset..end];
        self.offset = end;
        Ok(slice)
    }

    pub(crate) fn read_u64(&mut self) -> Result<u64> {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(self.take(8)?);
        Ok(u64::from_le_bytes(buf))
    }

    pub(crate) fn read_usize(&mut self) -> Result<usize> {
        let v = self.read_u64()?;
        usize::try_from(v)
            .map_err(|_| Error::InvalidEncoding(format!("length {v} does not fit in usize")))
    }

    pub(crate) fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    /// Fail if any input is left unread.
    pub(crate) fn finish(self) -> Result<()> {
        if self.remaining() != 0 {
            return Err(Error::InvalidEncoding(format!(
                "{} trailing bytes",
                self.remaining()
            )));
        }
        Ok(())
    }
}
