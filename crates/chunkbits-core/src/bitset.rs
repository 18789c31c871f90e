//! Growable word-packed bit set.
//!
//! A [`BitSet`] stores `len` booleans in `u64` words, least significant bit
//! first. Bits at or beyond `len` inside the last word are always zero, which
//! lets [`cardinality`](BitSet::cardinality) and
//! [`next_set_bit`](BitSet::next_set_bit) work on whole words without
//! masking the tail.
//!
//! The length only ever grows: explicitly at construction, implicitly when
//! [`flip`](BitSet::flip) reaches past the end, or when AND/OR meets a longer
//! operand.

use crate::config::BitSetConfig;
use crate::error::BitSetError;

const WORD_BITS: usize = u64::BITS as usize;

fn words_for(len: usize) -> usize {
    len.div_ceil(WORD_BITS)
}

fn bit_mask(index: usize) -> u64 {
    1u64 << (index % WORD_BITS)
}

/// A growable sequence of booleans supporting set algebra and scanning.
#[derive(Clone, Debug)]
pub struct BitSet {
    words: Vec<u64>,
    len: usize,
    config: BitSetConfig,
}

impl BitSet {
    /// Create a bit set of `len` bits, all false, with the default config.
    pub fn new(len: usize) -> Result<Self, BitSetError> {
        Self::with_config(len, BitSetConfig::default())
    }

    /// Create a bit set of `len` bits, all false.
    ///
    /// Fails with [`BitSetError::LengthLimitExceeded`] if `len` exceeds
    /// `config.max_len`.
    pub fn with_config(len: usize, config: BitSetConfig) -> Result<Self, BitSetError> {
        if len > config.max_len {
            return Err(BitSetError::LengthLimitExceeded {
                requested: len,
                limit: config.max_len,
            });
        }
        Ok(Self {
            words: vec![0; words_for(len)],
            len,
            config,
        })
    }

    /// Number of bits in the set.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the set holds zero bits.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The configuration this set was created with.
    pub fn config(&self) -> &BitSetConfig {
        &self.config
    }

    fn check_index(&self, index: usize) -> Result<(), BitSetError> {
        if index >= self.len {
            return Err(BitSetError::OutOfRange {
                index,
                len: self.len,
            });
        }
        Ok(())
    }

    /// Value of the bit at `index`.
    pub fn get(&self, index: usize) -> Result<bool, BitSetError> {
        self.check_index(index)?;
        Ok(self.words[index / WORD_BITS] & bit_mask(index) != 0)
    }

    /// Set the bit at `index` to true. Does not grow.
    pub fn set(&mut self, index: usize) -> Result<(), BitSetError> {
        self.check_index(index)?;
        self.words[index / WORD_BITS] |= bit_mask(index);
        Ok(())
    }

    /// Set every listed position to true.
    ///
    /// All positions are validated before any bit changes: on
    /// [`BitSetError::OutOfRange`] the set is left untouched.
    pub fn set_many<I>(&mut self, positions: I) -> Result<(), BitSetError>
    where
        I: IntoIterator<Item = usize>,
        I::IntoIter: Clone,
    {
        let positions = positions.into_iter();
        for index in positions.clone() {
            self.check_index(index)?;
        }
        for index in positions {
            self.words[index / WORD_BITS] |= bit_mask(index);
        }
        Ok(())
    }

    /// Reset the bit at `index` to false. Does not grow.
    pub fn clear(&mut self, index: usize) -> Result<(), BitSetError> {
        self.check_index(index)?;
        self.words[index / WORD_BITS] &= !bit_mask(index);
        Ok(())
    }

    /// Number of true bits.
    pub fn cardinality(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Toggle every bit in `[start, end)`.
    ///
    /// If `end > len()` the set first grows to exactly `end` bits, the new
    /// bits starting false. This happens even when `start == end`.
    pub fn flip(&mut self, start: usize, end: usize) -> Result<(), BitSetError> {
        if start > end {
            return Err(BitSetError::InvalidRange { start, end });
        }
        if end > self.len {
            log::trace!("flip [{start}, {end}) grows bit set from {} bits", self.len);
            self.grow(end)?;
        }
        if start == end {
            return Ok(());
        }

        let first = start / WORD_BITS;
        let last = (end - 1) / WORD_BITS;
        let head = u64::MAX << (start % WORD_BITS);
        let tail = u64::MAX >> (WORD_BITS - 1 - (end - 1) % WORD_BITS);
        if first == last {
            self.words[first] ^= head & tail;
        } else {
            self.words[first] ^= head;
            for word in &mut self.words[first + 1..last] {
                *word = !*word;
            }
            self.words[last] ^= tail;
        }
        Ok(())
    }

    /// In-place AND against `other`.
    ///
    /// The shorter operand is zero-extended; afterwards
    /// `len() == max(len(), other.len())`. Every bit of `self` at or beyond
    /// `other.len()` ends up false.
    pub fn and(&mut self, other: &BitSet) -> Result<(), BitSetError> {
        if other.len > self.len {
            self.grow(other.len)?;
        }
        for (i, word) in self.words.iter_mut().enumerate() {
            *word &= other.words.get(i).copied().unwrap_or(0);
        }
        Ok(())
    }

    /// In-place OR against `other`.
    ///
    /// The shorter operand is zero-extended; afterwards
    /// `len() == max(len(), other.len())`.
    pub fn or(&mut self, other: &BitSet) -> Result<(), BitSetError> {
        if other.len > self.len {
            self.grow(other.len)?;
        }
        for (word, theirs) in self.words.iter_mut().zip(&other.words) {
            *word |= *theirs;
        }
        Ok(())
    }

    /// Lowest position `>= from` holding a true bit, or `None`.
    pub fn next_set_bit(&self, from: usize) -> Option<usize> {
        if from >= self.len {
            return None;
        }
        let mut word_idx = from / WORD_BITS;
        let mut word = self.words[word_idx] & (u64::MAX << (from % WORD_BITS));
        loop {
            if word != 0 {
                return Some(word_idx * WORD_BITS + word.trailing_zeros() as usize);
            }
            word_idx += 1;
            word = *self.words.get(word_idx)?;
        }
    }

    /// Iterate over the positions of all true bits in ascending order.
    pub fn ones(&self) -> Ones<'_> {
        Ones {
            words: &self.words,
            word_idx: 0,
            current: self.words.first().copied().unwrap_or(0),
        }
    }

    fn grow(&mut self, new_len: usize) -> Result<(), BitSetError> {
        if new_len > self.config.max_len {
            return Err(BitSetError::LengthLimitExceeded {
                requested: new_len,
                limit: self.config.max_len,
            });
        }
        // Tail bits past the old length are already zero.
        self.words.resize(words_for(new_len), 0);
        self.len = new_len;
        Ok(())
    }
}

impl PartialEq for BitSet {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.words == other.words
    }
}

impl Eq for BitSet {}

/// Iterator over set positions, returned by [`BitSet::ones`].
pub struct Ones<'a> {
    words: &'a [u64],
    word_idx: usize,
    current: u64,
}

impl Iterator for Ones<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        while self.current == 0 {
            self.word_idx += 1;
            self.current = *self.words.get(self.word_idx)?;
        }
        let bit = self.current.trailing_zeros() as usize;
        // Clear lowest set bit.
        self.current &= self.current - 1;
        Some(self.word_idx * WORD_BITS + bit)
    }
}
