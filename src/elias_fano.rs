//! Elias-Fano encoding for monotone sequences.
//!
//! Stores a sorted (non-decreasing) sequence of `u64` values in near-optimal
//! space and answers `select` and `rank` straight from the encoded bits.
//!
//! # Theory
//!
//! For $n$ sorted integers with maximum $m$, every value is split at bit $w$:
//! - $w = \lceil \log_2(m/n) \rceil$, clamped at 0.
//! - The low $w$ bits of each value are packed back to back ($n \cdot w$ bits).
//! - The high parts $v_i \gg w$ are non-decreasing; their deltas are written in
//!   unary ($\lfloor m / 2^w \rfloor + n$ bits).
//!
//! With this choice of $w$ the high store is at most $2n$ bits, so the total
//! is $n \lceil \log_2(m/n) \rceil + 2n$ bits.
//!
//! # Queries
//!
//! Neither query builds an auxiliary index. `select(k)` walks the unary codes
//! until the $(k+1)$-th terminator, summing deltas into the high part, and
//! reads the low part at bit offset $k \cdot w$. `rank(p)` walks the same codes
//! and compares each element whose high part matches $p \gg w$ against the low
//! part of $p$.

use log::debug;

use crate::bitvec::{low_mask, BitVector, ByteReader};
use crate::error::{Error, Result};
use crate::unary::{self, Codes};

const MAGIC: &[u8; 8] = b"MONOEF01";

/// Smallest `w` with `n * 2^w >= max`.
fn bucket_width(max: u64, n: usize) -> usize {
    let n = n as u128;
    let max = u128::from(max);
    let mut width = 0;
    while n << width < max {
        width += 1;
    }
    width
}

/// Split `v` into `(high, low)` at bit `width`.
#[inline]
fn split(v: u64, width: usize) -> (u64, u64) {
    if width >= 64 {
        (0, v)
    } else {
        (v >> width, v & low_mask(width))
    }
}

#[inline]
fn join(high: u64, low: u64, width: usize) -> u64 {
    if width >= 64 {
        low
    } else {
        (high << width) | low
    }
}

/// Elias-Fano encoding of a non-decreasing `u64` sequence.
///
/// Immutable once built; share it freely across threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EliasFano {
    high_bits: BitVector,
    low_bits: BitVector,
    width: usize,
    len: usize,
}

impl EliasFano {
    /// Encode a sorted sequence.
    ///
    /// Fails with [`Error::InvalidInput`] if `values` is empty or not
    /// non-decreasing. Duplicates are allowed.
    ///
    /// ```
    /// use monofano::EliasFano;
    ///
    /// let ef = EliasFano::new(&[10, 20, 30, 100, 1000]).unwrap();
    /// assert_eq!(ef.select(3).unwrap(), 100);
    /// assert_eq!(ef.rank(30).unwrap(), 2);
    /// ```
    pub fn new(values: &[u64]) -> Result<Self> {
        let Some(&max) = values.last() else {
            return Err(Error::InvalidInput("empty sequence".to_string()));
        };
        if let Some(i) = values.windows(2).position(|w| w[0] > w[1]) {
            return Err(Error::InvalidInput(format!(
                "sequence is not sorted: {} at index {} is followed by {}",
                values[i],
                i,
                values[i + 1]
            )));
        }

        let n = values.len();
        let width = bucket_width(max, n);

        let mut low_bits = BitVector::with_capacity(n.saturating_mul(width));
        let mut high_bits =
            BitVector::with_capacity(n.saturating_add(split(max, width).0 as usize));

        let mut prev_high = 0;
        for &v in values {
            let (high, low) = split(v, width);
            low_bits.push_bits(low, width);
            unary::encode_into(&mut high_bits, high - prev_high);
            prev_high = high;
        }

        debug!(
            "built Elias-Fano sequence: len={n} width={width} low_bits={} high_bits={}",
            low_bits.len(),
            high_bits.len()
        );

        Ok(Self {
            high_bits,
            low_bits,
            width,
            len: n,
        })
    }

    /// Encode a sorted sequence of signed integers.
    ///
    /// Fails with [`Error::InvalidInput`] on a negative value, in addition to
    /// the conditions checked by [`EliasFano::new`].
    pub fn from_signed(values: &[i64]) -> Result<Self> {
        let values = values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                u64::try_from(v).map_err(|_| {
                    Error::InvalidInput(format!("negative value {v} at index {i}"))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(&values)
    }

    /// Return the number of elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Return true if the sequence holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of low bits kept per element.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Length of the unary high-part store in bits.
    pub fn high_bits_len(&self) -> usize {
        self.high_bits.len()
    }

    /// Length of the packed low-part store in bits.
    pub fn low_bits_len(&self) -> usize {
        self.low_bits.len()
    }

    /// Total encoded size in bits.
    pub fn num_bits(&self) -> usize {
        self.high_bits.len() + self.low_bits.len()
    }

    /// Approximate heap memory usage in bytes.
    pub fn heap_bytes(&self) -> usize {
        self.high_bits.heap_bytes() + self.low_bits.heap_bytes()
    }

    #[inline]
    fn low(&self, k: usize) -> u64 {
        self.low_bits.get_bits(k * self.width, self.width)
    }

    /// Return the value at index `k`.
    pub fn select(&self, k: usize) -> Result<u64> {
        if k >= self.len {
            return Err(Error::IndexOutOfRange {
                index: k,
                len: self.len,
            });
        }

        // Zeros before the (k+1)-th terminator sum to the high part of element k.
        let high: u64 = unary::codes(&self.high_bits, 0).take(k + 1).sum();
        Ok(join(high, self.low(k), self.width))
    }

    /// Return the index of `p`.
    ///
    /// If `p` occurs more than once, the smallest index holding it is returned.
    /// Fails with [`Error::ValueNotFound`] if `p` is absent.
    pub fn rank(&self, p: u64) -> Result<usize> {
        let (target_high, target_low) = split(p, self.width);

        let mut high = 0u64;
        for (k, delta) in unary::codes(&self.high_bits, 0).enumerate() {
            high += delta;
            if high > target_high {
                break;
            }
            if high == target_high && self.low(k) == target_low {
                return Ok(k);
            }
        }
        Err(Error::ValueNotFound(p))
    }

    /// Return true if `p` occurs in the sequence.
    pub fn contains(&self, p: u64) -> bool {
        self.rank(p).is_ok()
    }

    /// Iterate over the decoded values in order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            ef: self,
            codes: unary::codes(&self.high_bits, 0),
            index: 0,
            high: 0,
        }
    }

    /// Serialize to a stable binary encoding (little-endian).
    ///
    /// Format (versioned):
    /// - magic: 8 bytes (`MONOEF01`)
    /// - len: u64
    /// - width: u64
    /// - low store: bit_len u64, word_count u64, then `word_count` u64 words
    /// - high store: same layout as the low store
    pub fn to_bytes(&self) -> Vec<u8> {
        let words = self.low_bits.words().len() + self.high_bits.words().len();
        let mut out = Vec::with_capacity(8 + 16 + 32 + words * 8);
        out.extend_from_slice(MAGIC);
        out.extend_from_slice(&(self.len as u64).to_le_bytes());
        out.extend_from_slice(&(self.width as u64).to_le_bytes());
        self.low_bits.write_to(&mut out);
        self.high_bits.write_to(&mut out);
        out
    }

    /// Deserialize from `to_bytes()` output.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let decoded = Self::decode(bytes);
        if let Err(e) = &decoded {
            debug!("rejected Elias-Fano encoding ({} bytes): {e}", bytes.len());
        }
        decoded
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        let mut reader = ByteReader::new(bytes);
        if reader.take(8)? != MAGIC {
            return Err(Error::InvalidEncoding(
                "bad magic for EliasFano".to_string(),
            ));
        }

        let len = reader.read_usize()?;
        let width = reader.read_usize()?;
        if len == 0 {
            return Err(Error::InvalidEncoding("empty sequence".to_string()));
        }
        if width > 64 {
            return Err(Error::InvalidEncoding(format!(
                "width {width} exceeds 64 bits"
            )));
        }

        let low_bits = BitVector::read_from(&mut reader)?;
        let high_bits = BitVector::read_from(&mut reader)?;
        reader.finish()?;

        if len.checked_mul(width) != Some(low_bits.len()) {
            return Err(Error::InvalidEncoding(format!(
                "low store has {} bits, expected {len} x {width}",
                low_bits.len()
            )));
        }
        if high_bits.count_ones() != len {
            return Err(Error::InvalidEncoding(format!(
                "high store has {} terminators, expected {len}",
                high_bits.count_ones()
            )));
        }
        if !high_bits.get(high_bits.len() - 1) {
            return Err(Error::InvalidEncoding(
                "high store does not end with a terminator".to_string(),
            ));
        }


        // Zeros in the high store sum to the last high part.
        let last_high = (high_bits.len() - len) as u64;
        let max_high = if width >= 64 { 0 } else { u64::MAX >> width };
        if last_high > max_high {
            return Err(Error::InvalidEncoding(format!(
                "high part {last_high} does not fit above {width} low bits"
            )));
        }

        let ef = Self {
            high_bits,
            low_bits,
            width,
            len,
        };
        let mut prev = 0;
        for (i, v) in ef.iter().enumerate() {
            if v < prev {
                return Err(Error::InvalidEncoding(format!(
                    "decoded sequence is not sorted at index {i}"
                )));
            }
            prev = v;
        }
        Ok(ef)
    }
}

/// Iterator over the values of an [`EliasFano`], created by [`EliasFano::iter`].
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    ef: &'a EliasFano,
    codes: Codes<'a>,
    index: usize,
    high: u64,
}

impl Iterator for Iter<'_> {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.index >= self.ef.len {
            return None;
        }
        self.high += self.codes.next()?;
        let value = join(self.high, self.ef.low(self.index), self.ef.width);
        self.index += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.ef.len - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a EliasFano {
    type Item = u64;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}
