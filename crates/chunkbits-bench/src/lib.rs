//! Benchmark profiles for chunkbits.
//!
//! - [`sparse_bitset`]: a bit set with a fixed number of seeded positions
//! - [`burst_profile`]: seeded append bursts for chunked buffer runs

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use chunkbits_core::BitSet;
use chunkbits_test_utils::{bursts, random_positions};

/// Build a `len`-bit set with `count` pseudo-random positions set.
///
/// # Panics
///
/// Panics if `len` is zero or exceeds the default length limit.
pub fn sparse_bitset(seed: u64, len: usize, count: usize) -> BitSet {
    let mut bits = BitSet::new(len).expect("benchmark length within default limit");
    bits.set_many(random_positions(seed, count, len))
        .expect("positions drawn below len");
    bits
}

/// `total` elements split into bursts of at most `max_burst`.
pub fn burst_profile(seed: u64, total: usize, max_burst: usize) -> Vec<Vec<i32>> {
    bursts(seed, total, max_burst)
}
