//! Error types for the chunkbits engines.
//!
//! One enum per engine. The FFI layer maps each variant onto a stable
//! status code.

use std::error::Error;
use std::fmt;

/// Errors from [`BitSet`](crate::BitSet) operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BitSetError {
    /// A position outside `[0, len)` was passed to a non-growing operation
    /// (`get`, `set`, `set_many`, `clear`).
    OutOfRange {
        /// The offending position.
        index: usize,
        /// Length of the bit set at the time of the call.
        len: usize,
    },
    /// A `[start, end)` range with `start > end`.
    InvalidRange {
        /// Inclusive start of the range.
        start: usize,
        /// Exclusive end of the range.
        end: usize,
    },
    /// Growing the bit set would exceed its configured `max_len`.
    LengthLimitExceeded {
        /// Length the operation needed.
        requested: usize,
        /// The configured limit.
        limit: usize,
    },
}

impl fmt::Display for BitSetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { index, len } => {
                write!(f, "bit index {index} out of range for length {len}")
            }
            Self::InvalidRange { start, end } => {
                write!(f, "invalid bit range: start {start} > end {end}")
            }
            Self::LengthLimitExceeded { requested, limit } => {
                write!(
                    f,
                    "bit set length {requested} exceeds configured limit {limit}"
                )
            }
        }
    }
}

impl Error for BitSetError {}

/// Errors from [`ChunkedBuffer`](crate::ChunkedBuffer) operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BufferError {
    /// The flatten destination does not have exactly `len()` slots.
    CapacityMismatch {
        /// Number of buffered elements.
        expected: usize,
        /// Length of the destination provided by the caller.
        actual: usize,
    },
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityMismatch { expected, actual } => {
                write!(
                    f,
                    "flatten destination holds {actual} elements, buffer holds {expected}"
                )
            }
        }
    }
}

impl Error for BufferError {}
