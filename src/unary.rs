//! Unary codes over a [`BitVector`].
//!
//! The value $n$ is written as $n$ zero bits followed by a single one bit.
//! Zeros carry the magnitude and the one terminates the code, so a stream of
//! codes can be cut apart without knowing any lengths up front:
//!
//! ```text
//! 0 -> 1
//! 1 -> 01
//! 3 -> 0001
//! ```
//!
//! Encoding and decoding are pure: every call takes the buffer it works on.

use crate::bitvec::BitVector;

/// Encode `n` into a fresh bit vector of length `n + 1`.
///
/// The code is materialized bit by bit, so `n + 1` bits must fit in memory.
pub fn encode(n: u64) -> BitVector {
    let mut bits = BitVector::new();
    encode_into(&mut bits, n);
    bits
}

/// Append the unary code of `n` to `bits`.
pub fn encode_into(bits: &mut BitVector, n: u64) {
    let mut remaining = n;
    while remaining >= 64 {
        bits.push_bits(0, 64);
        remaining -= 64;
    }
    bits.push_bits(0, remaining as usize);
    bits.push(true);
}

/// Decode the code starting at bit `pos`.
///
/// Returns `(value, bits consumed)`, or `None` if no terminator follows `pos`.
pub fn decode(bits: &BitVector, pos: usize) -> Option<(u64, usize)> {
    let end = bits.next_one(pos)?;
    let consumed = end - pos + 1;
    Some(((consumed - 1) as u64, consumed))
}

/// Iterate over the consecutive codes stored in `bits`, starting at `pos`.
pub fn codes(bits: &BitVector, pos: usize) -> Codes<'_> {
    Codes { bits, pos }
}

/// Iterator over consecutive unary codes, created by [`codes`].
#[derive(Debug, Clone)]
pub struct Codes<'a> {
    bits: &'a BitVector,
    pos: usize,
}

impl Codes<'_> {
    /// Bit position of the next code.
    pub fn position(&self) -> usize {
        self.pos
    }
}

impl Iterator for Codes<'_> {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        let (value, consumed) = decode(self.bits, self.pos)?;
        self.pos += consumed;
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_layout() {
        let bits = encode(3);
        assert_eq!(bits.len(), 4);
        assert!(!bits.get(0));
        assert!(!bits.get(1));
        assert!(!bits.get(2));
        assert!(bits.get(3));

        let zero = encode(0);
        assert_eq!(zero.len(), 1);
        assert!(zero.get(0));
    }

    #[test]
    fn test_length_is_n_plus_one() {
        for n in [0u64, 1, 2, 63, 64, 65, 127, 128, 300] {
            assert_eq!(encode(n).len() as u64, n + 1);
        }
    }

    #[test]
    fn test_decode_inverts_encode() {
        for n in [0u64, 1, 5, 64, 200] {
            assert_eq!(decode(&encode(n), 0), Some((n, n as usize + 1)));
        }
    }

    #[test]
    fn test_encode_grows_with_the_code() {
        assert!(encode(3).heap_bytes() <= 64);
        assert_eq!(encode(1_000).words().len(), 16);
    }

    #[test]
    fn test_decode_without_terminator() {
        let mut bits = BitVector::new();
        bits.push_bits(0, 10);
        assert_eq!(decode(&bits, 0), None);
        assert_eq!(decode(&bits, 10), None);
    }

    #[test]
    fn test_codes_stream() {
        let values = [2u64, 0, 0, 70, 1, 0];
        let mut bits = BitVector::new();
        for &v in &values {
            encode_into(&mut bits, v);
        }
        assert_eq!(bits.len() as u64, values.iter().sum::<u64>() + values.len() as u64);

        let decoded: Vec<u64> = codes(&bits, 0).collect();
        assert_eq!(decoded, values);

        let mut it = codes(&bits, 0);
        it.next();
        assert_eq!(it.position(), 3);
        assert_eq!(it.collect::<Vec<_>>(), &values[1..]);
    }
}
