//! Error types for Elias-Fano construction and queries.

use thiserror::Error;

/// Error variants for Elias-Fano operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The input sequence cannot be encoded (empty, negative, or not sorted).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A `select` index outside `[0, len)`.
    #[error("index out of range: {index} (len {len})")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of encoded elements.
        len: usize,
    },

    /// A `rank` query for a value that is not in the sequence.
    #[error("value not found: {0}")]
    ValueNotFound(u64),

    /// Malformed bytes passed to a decoder.
    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),
}

/// A specialized Result type for Elias-Fano operations.
pub type Result<T> = std::result::Result<T, Error>;
