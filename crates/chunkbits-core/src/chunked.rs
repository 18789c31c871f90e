//! Append-only chunked buffers.
//!
//! A [`ChunkedBuffer`] captures each appended burst verbatim in its own
//! boxed chunk. Nothing already appended is ever moved or re-copied; the
//! final contiguous layout is produced only by
//! [`flatten_into`](ChunkedBuffer::flatten_into), in one pass over the chain.
//!
//! Two instantiations are exposed across the C boundary: [`IntBuffer`] and
//! [`FloatBuffer`].

use crate::error::BufferError;

/// Chunked buffer of `i32` elements.
pub type IntBuffer = ChunkedBuffer<i32>;

/// Chunked buffer of `f32` elements.
pub type FloatBuffer = ChunkedBuffer<f32>;

/// An ordered chain of immutable chunks with an incrementally tracked length.
#[derive(Clone, Debug)]
pub struct ChunkedBuffer<T> {
    chunks: Vec<Box<[T]>>,
    len: usize,
}

impl<T: Copy> ChunkedBuffer<T> {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self {
            chunks: Vec::new(),
            len: 0,
        }
    }

    /// Copy `elements` into a new chunk at the end of the chain.
    ///
    /// An empty slice appends nothing.
    pub fn add(&mut self, elements: &[T]) {
        if elements.is_empty() {
            return;
        }
        self.chunks.push(Box::from(elements));
        self.len += elements.len();
    }

    /// Total number of buffered elements across all chunks.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if nothing has been appended.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of chunks in the chain.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Iterate over chunks in append order.
    pub fn chunks(&self) -> impl Iterator<Item = &[T]> + '_ {
        self.chunks.iter().map(|c| &c[..])
    }

    /// Copy every chunk, in append order, into `out`.
    ///
    /// `out` must have exactly [`len`](Self::len) slots; otherwise
    /// [`BufferError::CapacityMismatch`] is returned and `out` is untouched.
    /// The chain is left intact, so flattening can be repeated.
    pub fn flatten_into(&self, out: &mut [T]) -> Result<(), BufferError> {
        if out.len() != self.len {
            return Err(BufferError::CapacityMismatch {
                expected: self.len,
                actual: out.len(),
            });
        }
        let mut offset = 0;
        for chunk in &self.chunks {
            out[offset..offset + chunk.len()].copy_from_slice(chunk);
            offset += chunk.len();
        }
        debug_assert_eq!(offset, self.len);
        Ok(())
    }

    /// Allocate a `Vec` of exactly [`len`](Self::len) elements and flatten
    /// into it.
    pub fn to_vec(&self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.len);
        for chunk in &self.chunks {
            out.extend_from_slice(chunk);
        }
        out
    }
}

impl<T: Copy> Default for ChunkedBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}
