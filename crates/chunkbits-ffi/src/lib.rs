//! C FFI bindings for chunkbits.
//!
//! Exposes the bit set and the two chunked buffer instantiations through
//! `u64` handles backed by generation-checked tables. Every function
//! returns an `i32` status ([`ChunkbitsStatus`]) and writes results through
//! out-pointers. This is the only crate in the workspace that contains
//! `unsafe` code.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

use std::any::Any;
use std::cell::RefCell;
use std::ffi::c_char;

/// Run an FFI body, turning a caught panic into `ChunkbitsStatus::Panicked`.
///
/// The panic message is kept for [`chunkbits_last_panic_message`]. The body is a closure returning `i32`, so `return` inside it yields the
/// status for the whole call.
macro_rules! ffi_guard {
    ($body:block) => {
        match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| -> i32 { $body })) {
            Ok(status) => status,
            Err(payload) => {
                $crate::record_panic(payload.as_ref());
                $crate::status::ChunkbitsStatus::Panicked as i32
            }
        }
    };
}

/// Lock a handle table, returning `InternalError` from the enclosing
/// closure if the mutex is poisoned.
macro_rules! ffi_lock {
    ($mutex:expr) => {
        match $mutex.lock() {
            Ok(guard) => guard,
            Err(_) => return $crate::status::ChunkbitsStatus::InternalError as i32,
        }
    };
}

pub mod bitset;
pub mod buffer;
mod handle;
mod slice;
pub mod status;

pub use bitset::ChunkbitsBitSetConfig;
pub use status::ChunkbitsStatus;

thread_local! {
    /// Message of the most recent panic caught by `ffi_guard!` on this thread.
    static LAST_PANIC: RefCell<String> = const { RefCell::new(String::new()) };
}

fn record_panic(payload: &(dyn Any + Send)) {
    let msg = if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        String::from("non-string panic payload")
    };
    log::error!("panic caught at the chunkbits FFI boundary: {msg}");
    LAST_PANIC.with(|cell| *cell.borrow_mut() = msg);
}

/// Copy the message of the last panic caught on this thread into `buf`.
///
/// Returns the full message length in bytes, excluding the terminator, or 0
/// if no panic has been caught. At most `cap - 1` bytes are copied and the
/// result is always null-terminated. A null `buf` or `cap == 0` only
/// queries the length.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn chunkbits_last_panic_message(buf: *mut c_char, cap: usize) -> i32 {
    LAST_PANIC.with(|cell| {
        let msg = cell.borrow();
        let bytes = msg.as_bytes();
        if !buf.is_null() && cap > 0 {
            let copy_len = bytes.len().min(cap - 1);
            // SAFETY: buf points to cap writable bytes per caller contract.
            unsafe {
                std::ptr::copy_nonoverlapping(bytes.as_ptr(), buf as *mut u8, copy_len);
                *buf.add(copy_len) = 0;
            }
        }
        i32::try_from(bytes.len()).unwrap_or(i32::MAX)
    })
}
