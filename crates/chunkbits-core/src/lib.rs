//! Core engines for the chunkbits workspace.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! two in-memory engines exposed across the C boundary by `chunkbits-ffi`:
//!
//! - [`BitSet`]: a growable, word-packed boolean sequence with AND/OR/flip
//!   algebra and forward scanning.
//! - [`ChunkedBuffer`]: an append-only chain of owned chunks that is
//!   flattened into one contiguous array on demand.
//!
//! Neither engine performs I/O or internal synchronization.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod bitset;
pub mod chunked;
pub mod config;
pub mod error;

pub use bitset::{BitSet, Ones};
pub use chunked::{ChunkedBuffer, FloatBuffer, IntBuffer};
pub use config::BitSetConfig;
pub use error::{BitSetError, BufferError};
