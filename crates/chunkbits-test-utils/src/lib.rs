//! Reference models and seeded fixtures for chunkbits development.
//!
//! [`ModelBitSet`] is a deliberately naive `Vec<bool>` implementation of the
//! bit set semantics, used as the oracle in property tests. The fixture
//! functions produce deterministic pseudo-random data from a seed so that
//! tests and benchmarks are reproducible.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// One `bool` per bit. Mirrors the growth and zero-extension rules of
/// `chunkbits_core::BitSet`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModelBitSet {
    bits: Vec<bool>,
}

impl ModelBitSet {
    pub fn new(len: usize) -> Self {
        Self {
            bits: vec![false; len],
        }
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<bool> {
        self.bits.get(index).copied()
    }

    /// Returns `false` (and changes nothing) if `index` is out of range.
    pub fn set(&mut self, index: usize) -> bool {
        match self.bits.get_mut(index) {
            Some(b) => {
                *b = true;
                true
            }
            None => false,
        }
    }

    /// Returns `false` (and changes nothing) if `index` is out of range.
    pub fn clear(&mut self, index: usize) -> bool {
        match self.bits.get_mut(index) {
            Some(b) => {
                *b = false;
                true
            }
            None => false,
        }
    }

    /// Grows to `end` first if needed. Panics if `start > end`.
    pub fn flip(&mut self, start: usize, end: usize) {
        assert!(start <= end, "model flip with start > end");
        if end > self.bits.len() {
            self.bits.resize(end, false);
        }
        for b in &mut self.bits[start..end] {
            *b = !*b;
        }
    }

    pub fn and(&mut self, other: &ModelBitSet) {
        let len = self.len().max(other.len());
        self.bits.resize(len, false);
        for (i, b) in self.bits.iter_mut().enumerate() {
            *b = *b && other.get(i).unwrap_or(false);
        }
    }

    pub fn or(&mut self, other: &ModelBitSet) {
        let len = self.len().max(other.len());
        self.bits.resize(len, false);
        for (b, theirs) in self.bits.iter_mut().zip(&other.bits) {
            *b = *b || *theirs;
        }
    }

    pub fn cardinality(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    pub fn next_set_bit(&self, from: usize) -> Option<usize> {
        (from..self.bits.len()).find(|&i| self.bits[i])
    }

    pub fn ones(&self) -> Vec<usize> {
        (0..self.bits.len()).filter(|&i| self.bits[i]).collect()
    }
}

/// `count` positions drawn uniformly from `[0, bound)`. Duplicates allowed.
pub fn random_positions(seed: u64, count: usize, bound: usize) -> Vec<usize> {
    assert!(bound > 0, "bound must be non-zero");
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| (rng.next_u64() % bound as u64) as usize)
        .collect()
}

pub fn random_i32s(seed: u64, count: usize) -> Vec<i32> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count).map(|_| rng.next_u32() as i32).collect()
}

/// Values in `[0, 1)`.
pub fn random_f32s(seed: u64, count: usize) -> Vec<f32> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| (rng.next_u32() >> 8) as f32 / (1u32 << 24) as f32)
        .collect()
}

/// Split `total` pseudo-random `i32`s into bursts of 1..=`max_burst`
/// elements, the way a producer feeds a chunked buffer.
pub fn bursts(seed: u64, total: usize, max_burst: usize) -> Vec<Vec<i32>> {
    assert!(max_burst > 0, "max_burst must be non-zero");
    let data = random_i32s(seed, total);
    let mut rng = ChaCha8Rng::seed_from_u64(seed ^ 0x9e37_79b9_7f4a_7c15);
    let mut out = Vec::new();
    let mut rest = &data[..];
    while !rest.is_empty() {
        let n = 1 + (rng.next_u32() as usize % max_burst);
        let (head, tail) = rest.split_at(n.min(rest.len()));
        out.push(head.to_vec());
        rest = tail;
    }
    out
}
