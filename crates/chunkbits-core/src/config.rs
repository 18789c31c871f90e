//! Bit set configuration parameters.

/// Configuration for a [`BitSet`](crate::BitSet).
///
/// Carried by every bit set and copied on clone. All growth paths (create,
/// `flip` past the end, AND/OR against a longer operand) are checked against
/// `max_len`, so an oversized request from the caller becomes
/// [`BitSetError::LengthLimitExceeded`](crate::BitSetError::LengthLimitExceeded)
/// rather than an allocation abort.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitSetConfig {
    /// Maximum number of bits the set may ever hold.
    ///
    /// Default: `u32::MAX` bits (512MB of backing words).
    pub max_len: usize,
}

impl BitSetConfig {
    /// Default maximum length in bits.
    pub const DEFAULT_MAX_LEN: usize = u32::MAX as usize;

    /// Create a config with the given length limit.
    pub fn new(max_len: usize) -> Self {
        Self { max_len }
    }

    /// Size in bytes of the backing storage at `max_len`.
    pub fn max_bytes(&self) -> usize {
        self.max_len.div_ceil(64) * std::mem::size_of::<u64>()
    }
}

impl Default for BitSetConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_LEN)
    }
}
