//! C-compatible status codes.
//!
//! [`ChunkbitsStatus`] is a `repr(i32)` enum covering every error the
//! boundary can report. Conversions from the core error types are provided.

use chunkbits_core::{BitSetError, BufferError};

/// C-compatible status code returned by all FFI functions.
///
/// `Ok` = 0, all errors are negative. Values are ABI-stable.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChunkbitsStatus {
    /// Success.
    Ok = 0,
    /// Handle was never issued, was already destroyed, or belongs to a
    /// different engine kind.
    InvalidHandle = -1,
    /// Bit position outside `[0, size)` for a non-growing operation.
    OutOfRange = -2,
    /// Flatten destination length differs from the buffer size.
    CapacityMismatch = -3,
    /// Null pointer, negative length or position, or `start > end`.
    InvalidArgument = -4,
    /// Growing a bit set would exceed its configured maximum length.
    LengthLimitExceeded = -5,
    /// Internal error (e.g. poisoned mutex after a prior panic).
    InternalError = -20,
    /// A Rust panic was caught at the FFI boundary.
    Panicked = -128,
}

impl From<&BitSetError> for ChunkbitsStatus {
    fn from(e: &BitSetError) -> Self {
        match e {
            BitSetError::OutOfRange { .. } => ChunkbitsStatus::OutOfRange,
            BitSetError::InvalidRange { .. } => ChunkbitsStatus::InvalidArgument,
            BitSetError::LengthLimitExceeded { .. } => ChunkbitsStatus::LengthLimitExceeded,
        }
    }
}

impl From<&BufferError> for ChunkbitsStatus {
    fn from(e: &BufferError) -> Self {
        match e {
            BufferError::CapacityMismatch { .. } => ChunkbitsStatus::CapacityMismatch,
        }
    }
}

impl From<BitSetError> for ChunkbitsStatus {
    fn from(e: BitSetError) -> Self {
        ChunkbitsStatus::from(&e)
    }
}

impl From<BufferError> for ChunkbitsStatus {
    fn from(e: BufferError) -> Self {
        ChunkbitsStatus::from(&e)
    }
}

/// Collapse a core result into a status code.
pub(crate) fn status_of<E>(result: Result<(), E>) -> i32
where
    for<'a> ChunkbitsStatus: From<&'a E>,
{
    match result {
        Ok(()) => ChunkbitsStatus::Ok as i32,
        Err(e) => ChunkbitsStatus::from(&e) as i32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_code_values_are_stable() {
        assert_eq!(ChunkbitsStatus::Ok as i32, 0);
        assert_eq!(ChunkbitsStatus::InvalidHandle as i32, -1);
        assert_eq!(ChunkbitsStatus::OutOfRange as i32, -2);
        assert_eq!(ChunkbitsStatus::CapacityMismatch as i32, -3);
        assert_eq!(ChunkbitsStatus::InvalidArgument as i32, -4);
        assert_eq!(ChunkbitsStatus::LengthLimitExceeded as i32, -5);
        assert_eq!(ChunkbitsStatus::InternalError as i32, -20);
        assert_eq!(ChunkbitsStatus::Panicked as i32, -128);
    }

    #[test]
    fn bitset_error_to_status() {
        assert_eq!(
            ChunkbitsStatus::from(&BitSetError::OutOfRange { index: 3, len: 2 }),
            ChunkbitsStatus::OutOfRange
        );
        assert_eq!(
            ChunkbitsStatus::from(&BitSetError::InvalidRange { start: 3, end: 2 }),
            ChunkbitsStatus::InvalidArgument
        );
        assert_eq!(
            ChunkbitsStatus::from(&BitSetError::LengthLimitExceeded {
                requested: 9,
                limit: 8
            }),
            ChunkbitsStatus::LengthLimitExceeded
        );
    }

    #[test]
    fn buffer_error_to_status() {
        assert_eq!(
            ChunkbitsStatus::from(&BufferError::CapacityMismatch {
                expected: 1,
                actual: 0
            }),
            ChunkbitsStatus::CapacityMismatch
        );
    }

    #[test]
    fn core_errors_convert_through_question_mark() {
        fn flatten_short() -> Result<(), ChunkbitsStatus> {
            let r: Result<(), BufferError> = Err(BufferError::CapacityMismatch {
                expected: 2,
                actual: 1,
            });
            r?;
            Ok(())
        }
        assert_eq!(flatten_short(), Err(ChunkbitsStatus::CapacityMismatch));
    }

    #[test]
    fn status_of_maps_ok_and_err() {
        assert_eq!(status_of::<BufferError>(Ok(())), 0);
        assert_eq!(
            status_of(Err(BitSetError::OutOfRange { index: 0, len: 0 })),
            ChunkbitsStatus::OutOfRange as i32
        );
    }
}
