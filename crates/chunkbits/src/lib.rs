//! chunkbits: growable bit sets and chunked append buffers.
//!
//! This is the top-level facade crate that re-exports the public API of the
//! chunkbits sub-crates. Rust callers use the engines directly; managed
//! callers go through the C functions in [`ffi`].
//!
//! # Quick start
//!
//! ```rust
//! use chunkbits::prelude::*;
//!
//! let mut bits = BitSet::new(10).unwrap();
//! bits.set_many([2, 5, 7]).unwrap();
//! assert_eq!(bits.cardinality(), 3);
//! assert_eq!(bits.next_set_bit(3), Some(5));
//!
//! // Flipping past the end grows the set.
//! bits.flip(8, 16).unwrap();
//! assert_eq!(bits.len(), 16);
//!
//! let mut buf = IntBuffer::new();
//! buf.add(&[1, 2, 3]);
//! buf.add(&[4, 5]);
//! let mut out = [0; 5];
//! buf.flatten_into(&mut out).unwrap();
//! assert_eq!(out, [1, 2, 3, 4, 5]);
//! ```
//!
//! # Modules
//!
//! | Module | Crate | Contents |
//! |---|---|---|
//! | [`bitset`] | `chunkbits-core` | [`BitSet`](bitset::BitSet), set-bit iterator |
//! | [`chunked`] | `chunkbits-core` | [`ChunkedBuffer`](chunked::ChunkedBuffer) and its aliases |
//! | [`config`] | `chunkbits-core` | [`BitSetConfig`](config::BitSetConfig) |
//! | [`error`] | `chunkbits-core` | engine error enums |
//! | [`ffi`] | `chunkbits-ffi` | C ABI, status codes |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub use chunkbits_core::bitset;
pub use chunkbits_core::chunked;
pub use chunkbits_core::config;
pub use chunkbits_core::error;

/// C ABI over handle tables.
pub mod ffi {
    pub use chunkbits_ffi::bitset::*;
    pub use chunkbits_ffi::buffer::*;
    pub use chunkbits_ffi::{
        chunkbits_last_panic_message, ChunkbitsBitSetConfig, ChunkbitsStatus,
    };
}

/// Common imports for Rust callers.
pub mod prelude {
    pub use chunkbits_core::{
        BitSet, BitSetConfig, BitSetError, BufferError, ChunkedBuffer, FloatBuffer, IntBuffer,
    };
}
