//! # Elias-Fano Sequences
//!
//! *Sorted integers in near-minimal space, queried without decompression.*
//!
//! ## Intuition First
//!
//! Picture a long sorted list of page numbers. Writing each number in full wastes
//! space: consecutive entries share most of their leading digits. Elias-Fano
//! keeps only the last few binary digits of each number verbatim and, for the
//! leading digits, records just *how far they moved* since the previous entry.
//! Because the list is sorted, those moves are small and never negative.
//!
//! Both halves stay addressable, so the $k$-th number (`select`) or the position
//! of a given number (`rank`) can be read straight from the encoded bits.
//!
//! ## The Problem
//!
//! A sorted sequence of $n$ values up to $m$ carries about
//! $n \log_2(m/n) + O(n)$ bits of information. Plain arrays spend 64 bits per
//! value regardless; general-purpose compressors get close to the bound but
//! lose random access.
//!
//! ## Historical Context
//!
//! ```text
//! 1971  Fano        Associative memory: split keys into high and low parts
//! 1974  Elias       Static file storage for monotone sequences
//! 2007  Okanohara   Practical rank/select dictionaries built on Elias-Fano
//! 2013  Vigna       Quasi-succinct indices for posting lists
//! ```
//!
//! ## Mathematical Formulation
//!
//! With $w = \max(0, \lceil \log_2(m/n) \rceil)$, each value $v_i$ becomes
//! $v_i = h_i \cdot 2^w + \ell_i$ with $\ell_i < 2^w$:
//! - $\ell_i$ is stored in exactly $w$ bits.
//! - $h_0, h_1 - h_0, \dots, h_{n-1} - h_{n-2}$ are stored in unary.
//!
//! Total: $n \cdot w + h_{n-1} + n \le n \lceil \log_2(m/n) \rceil + 2n$ bits.
//!
//! ## What Could Go Wrong
//!
//! 1. **Unsorted input**: the deltas of the high parts would be negative. The
//!    constructor rejects any descent instead of building a corrupt structure.
//! 2. **Linear scans**: `select` and `rank` walk the unary store from the start,
//!    so they cost $O(n)$ word operations. Fine for short lists; long lists
//!    want a select index over the high bits.
//!
//! ## Implementation Notes
//!
//! This crate provides:
//! - **`EliasFano`**: construction, `select`, `rank`, iteration and a byte encoding.
//! - **`BitVector`**: the packed bit store behind both halves.
//! - **`unary`**: the pure unary encoder/decoder used for the high parts.
//!
//! ## References
//!
//! - Elias, P. (1974). "Efficient storage and retrieval by content and address of static files."
//! - Fano, R. (1971). "On the number of bits required to implement an associative memory."
//! - Vigna, S. (2013). "Quasi-succinct indices."

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bitvec;
pub mod elias_fano;
pub mod error;
pub mod unary;

pub use bitvec::BitVector;
pub use elias_fano::EliasFano;
pub use error::{Error, Result};
