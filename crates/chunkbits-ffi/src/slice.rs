//! Scoped borrowing of caller-owned arrays.
//!
//! A caller array is viewed as a slice only for the duration of one FFI
//! call; the borrow ends on every return path, including errors. The length
//! always comes from the explicit argument, never from the pointer.

#![deny(unsafe_op_in_unsafe_fn)]

use crate::status::ChunkbitsStatus;

/// View `len` elements at `ptr` as a shared slice.
///
/// A null `ptr` is accepted only when `len == 0`.
///
/// # Safety
///
/// If `len > 0`, `ptr` must be valid for `len` reads of `T` and must not be
/// mutated for the lifetime `'a`.
#[allow(unsafe_code)]
pub(crate) unsafe fn borrow<'a, T>(ptr: *const T, len: usize) -> Result<&'a [T], ChunkbitsStatus> {
    if len == 0 {
        return Ok(Default::default());
    }
    if ptr.is_null() {
        return Err(ChunkbitsStatus::InvalidArgument);
    }
    // SAFETY: non-null and valid for `len` reads per caller contract.
    Ok(unsafe { std::slice::from_raw_parts(ptr, len) })
}

/// View `len` elements at `ptr` as an exclusive slice.
///
/// # Safety
///
/// If `len > 0`, `ptr` must be valid for `len` writes of `T` and not aliased
/// for the lifetime `'a`.
#[allow(unsafe_code)]
pub(crate) unsafe fn borrow_mut<'a, T>(
    ptr: *mut T,
    len: usize,
) -> Result<&'a mut [T], ChunkbitsStatus> {
    if len == 0 {
        return Ok(Default::default());
    }
    if ptr.is_null() {
        return Err(ChunkbitsStatus::InvalidArgument);
    }
    // SAFETY: non-null, valid and unaliased for `len` writes per caller contract.
    Ok(unsafe { std::slice::from_raw_parts_mut(ptr, len) })
}

/// Store `value` through an out-pointer.
///
/// # Safety
///
/// `out` must be null or valid for one write of `T`.
#[allow(unsafe_code)]
pub(crate) unsafe fn write_out<T>(out: *mut T, value: T) -> Result<(), ChunkbitsStatus> {
    if out.is_null() {
        return Err(ChunkbitsStatus::InvalidArgument);
    }
    // SAFETY: non-null and valid per caller contract.
    unsafe { out.write(value) };
    Ok(())
}
