//! Chunked buffer FFI for `i32` and `f32` elements.
//!
//! Both element types share one generic implementation; the extern
//! functions are thin per-type wrappers around it. Each type has its own
//! handle table, so an int buffer handle is never valid as a float buffer
//! handle.

use std::sync::Mutex;

use chunkbits_core::{ChunkedBuffer, FloatBuffer, IntBuffer};

use crate::handle::{HandleTable, FLOAT_BUFFER_TAG, INT_BUFFER_TAG};
use crate::slice::{borrow, borrow_mut, write_out};
use crate::status::{status_of, ChunkbitsStatus};

type Table<T> = Mutex<HandleTable<ChunkedBuffer<T>>>;

static INT_BUFFERS: Mutex<HandleTable<IntBuffer>> =
    Mutex::new(HandleTable::new("int buffer", INT_BUFFER_TAG));
static FLOAT_BUFFERS: Mutex<HandleTable<FloatBuffer>> =
    Mutex::new(HandleTable::new("float buffer", FLOAT_BUFFER_TAG));

#[allow(unsafe_code)]
fn create<T: Copy>(table: &Table<T>, handle_out: *mut u64) -> i32 {
    if handle_out.is_null() {
        return ChunkbitsStatus::InvalidArgument as i32;
    }
    let Some(handle) = ffi_lock!(table).insert(ChunkedBuffer::new()) else {
        return ChunkbitsStatus::InternalError as i32;
    };
    // SAFETY: handle_out is non-null and valid per caller contract.
    unsafe { *handle_out = handle };
    ChunkbitsStatus::Ok as i32
}

fn destroy<T>(table: &Table<T>, handle: u64) -> i32 {
    match ffi_lock!(table).remove(handle) {
        Some(_) => ChunkbitsStatus::Ok as i32,
        None => ChunkbitsStatus::InvalidHandle as i32,
    }
}

#[allow(unsafe_code)]
fn add<T: Copy>(table: &Table<T>, handle: u64, elements: *const T, len: usize) -> i32 {
    // SAFETY: elements points to len valid values per caller contract.
    let elements = match unsafe { borrow(elements, len) } {
        Ok(s) => s,
        Err(status) => return status as i32,
    };
    match ffi_lock!(table).get_mut(handle) {
        Some(buf) => {
            buf.add(elements);
            ChunkbitsStatus::Ok as i32
        }
        None => ChunkbitsStatus::InvalidHandle as i32,
    }
}

#[allow(unsafe_code)]
fn size<T: Copy>(table: &Table<T>, handle: u64, size_out: *mut u64) -> i32 {
    let len = match ffi_lock!(table).get(handle) {
        Some(buf) => buf.len() as u64,
        None => return ChunkbitsStatus::InvalidHandle as i32,
    };
    // SAFETY: size_out is null or valid for one write per caller contract.
    match unsafe { write_out(size_out, len) } {
        Ok(()) => ChunkbitsStatus::Ok as i32,
        Err(status) => status as i32,
    }
}

#[allow(unsafe_code)]
fn flatten<T: Copy>(table: &Table<T>, handle: u64, out: *mut T, len: usize) -> i32 {
    // SAFETY: out points to len writable values per caller contract.
    let out = match unsafe { borrow_mut(out, len) } {
        Ok(s) => s,
        Err(status) => return status as i32,
    };
    match ffi_lock!(table).get(handle) {
        Some(buf) => status_of(buf.flatten_into(out)),
        None => ChunkbitsStatus::InvalidHandle as i32,
    }
}

/// Create an empty `i32` chunked buffer.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn chunkbits_int_buffer_create(handle_out: *mut u64) -> i32 {
    ffi_guard!({ create::<i32>(&INT_BUFFERS, handle_out) })
}

/// Destroy an `i32` chunked buffer and every chunk it owns.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn chunkbits_int_buffer_destroy(handle: u64) -> i32 {
    ffi_guard!({ destroy(&INT_BUFFERS, handle) })
}

/// Append `elements[0..len]` as one new chunk.
///
/// `elements` may be null when `len == 0`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn chunkbits_int_buffer_add(handle: u64, elements: *const i32, len: usize) -> i32 {
    ffi_guard!({ add(&INT_BUFFERS, handle, elements, len) })
}

/// Write the total number of buffered elements to `size_out`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn chunkbits_int_buffer_size(handle: u64, size_out: *mut u64) -> i32 {
    ffi_guard!({ size(&INT_BUFFERS, handle, size_out) })
}

/// Copy every chunk in append order into `out[0..len]`.
///
/// `len` must equal the buffer size, otherwise `CapacityMismatch` is
/// returned and `out` is untouched.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn chunkbits_int_buffer_flatten(handle: u64, out: *mut i32, len: usize) -> i32 {
    ffi_guard!({ flatten(&INT_BUFFERS, handle, out, len) })
}

/// Create an empty `f32` chunked buffer.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn chunkbits_float_buffer_create(handle_out: *mut u64) -> i32 {
    ffi_guard!({ create::<f32>(&FLOAT_BUFFERS, handle_out) })
}

/// Destroy an `f32` chunked buffer and every chunk it owns.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn chunkbits_float_buffer_destroy(handle: u64) -> i32 {
    ffi_guard!({ destroy(&FLOAT_BUFFERS, handle) })
}

/// Append `elements[0..len]` as one new chunk.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn chunkbits_float_buffer_add(handle: u64, elements: *const f32, len: usize) -> i32 {
    ffi_guard!({ add(&FLOAT_BUFFERS, handle, elements, len) })
}

/// Write the total number of buffered elements to `size_out`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn chunkbits_float_buffer_size(handle: u64, size_out: *mut u64) -> i32 {
    ffi_guard!({ size(&FLOAT_BUFFERS, handle, size_out) })
}

/// Copy every chunk in append order into `out[0..len]`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn chunkbits_float_buffer_flatten(handle: u64, out: *mut f32, len: usize) -> i32 {
    ffi_guard!({ flatten(&FLOAT_BUFFERS, handle, out, len) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chunkbits_test_utils::{bursts, random_f32s};

    const OK: i32 = ChunkbitsStatus::Ok as i32;

    fn int_buffer() -> u64 {
        let mut h = 0u64;
        assert_eq!(chunkbits_int_buffer_create(&mut h), OK);
        h
    }

    fn int_size(h: u64) -> u64 {
        let mut n = 0u64;
        assert_eq!(chunkbits_int_buffer_size(h, &mut n), OK);
        n
    }

    #[test]
    fn append_and_flatten_scenario() {
        let h = int_buffer();
        assert_eq!(chunkbits_int_buffer_add(h, [1, 2, 3].as_ptr(), 3), OK);
        assert_eq!(chunkbits_int_buffer_add(h, [4, 5].as_ptr(), 2), OK);
        assert_eq!(int_size(h), 5);
        let mut out = [0i32; 5];
        assert_eq!(chunkbits_int_buffer_flatten(h, out.as_mut_ptr(), 5), OK);
        assert_eq!(out, [1, 2, 3, 4, 5]);
        assert_eq!(chunkbits_int_buffer_destroy(h), OK);
    }

    #[test]
    fn add_uses_explicit_length() {
        let h = int_buffer();
        let src = [9, 8, 7, 6];
        assert_eq!(chunkbits_int_buffer_add(h, src.as_ptr(), 2), OK);
        let mut out = [0i32; 2];
        assert_eq!(chunkbits_int_buffer_flatten(h, out.as_mut_ptr(), 2), OK);
        assert_eq!(out, [9, 8]);
        chunkbits_int_buffer_destroy(h);
    }

    #[test]
    fn flatten_capacity_mismatch() {
        let h = int_buffer();
        chunkbits_int_buffer_add(h, [1, 2, 3].as_ptr(), 3);
        let mut out = [-1i32; 4];
        assert_eq!(
            chunkbits_int_buffer_flatten(h, out.as_mut_ptr(), 4),
            ChunkbitsStatus::CapacityMismatch as i32
        );
        assert_eq!(
            chunkbits_int_buffer_flatten(h, out.as_mut_ptr(), 2),
            ChunkbitsStatus::CapacityMismatch as i32
        );
        assert_eq!(out, [-1; 4]);
        chunkbits_int_buffer_destroy(h);
    }

    #[test]
    fn empty_buffer_flattens_into_nothing() {
        let h = int_buffer();
        assert_eq!(chunkbits_int_buffer_add(h, std::ptr::null(), 0), OK);
        assert_eq!(int_size(h), 0);
        assert_eq!(
            chunkbits_int_buffer_flatten(h, std::ptr::null_mut(), 0),
            OK
        );
        chunkbits_int_buffer_destroy(h);
    }

    #[test]
    fn null_arguments_are_rejected() {
        let h = int_buffer();
        assert_eq!(
            chunkbits_int_buffer_add(h, std::ptr::null(), 2),
            ChunkbitsStatus::InvalidArgument as i32
        );
        assert_eq!(
            chunkbits_int_buffer_size(h, std::ptr::null_mut()),
            ChunkbitsStatus::InvalidArgument as i32
        );
        assert_eq!(
            chunkbits_int_buffer_create(std::ptr::null_mut()),
            ChunkbitsStatus::InvalidArgument as i32
        );
        chunkbits_int_buffer_destroy(h);
    }

    #[test]
    fn float_buffer_round_trip() {
        let mut h = 0u64;
        assert_eq!(chunkbits_float_buffer_create(&mut h), OK);
        let data = random_f32s(3, 100);
        for part in data.chunks(30) {
            assert_eq!(
                chunkbits_float_buffer_add(h, part.as_ptr(), part.len()),
                OK
            );
        }
        let mut n = 0u64;
        assert_eq!(chunkbits_float_buffer_size(h, &mut n), OK);
        assert_eq!(n, 100);
        let mut out = vec![0.0f32; 100];
        assert_eq!(
            chunkbits_float_buffer_flatten(h, out.as_mut_ptr(), out.len()),
            OK
        );
        assert_eq!(out, data);
        assert_eq!(chunkbits_float_buffer_destroy(h), OK);
    }

    #[test]
    fn destroyed_handle_is_rejected() {
        let h = int_buffer();
        assert_eq!(chunkbits_int_buffer_destroy(h), OK);
        let invalid = ChunkbitsStatus::InvalidHandle as i32;
        let mut n = 0u64;
        assert_eq!(chunkbits_int_buffer_destroy(h), invalid);
        assert_eq!(chunkbits_int_buffer_add(h, [1].as_ptr(), 1), invalid);
        assert_eq!(chunkbits_int_buffer_size(h, &mut n), invalid);
        assert_eq!(chunkbits_int_buffer_flatten(h, std::ptr::null_mut(), 0), invalid);
    }

    #[test]
    fn float_destroy_leaves_int_buffers_alone() {
        let ih = int_buffer();
        let mut fh = 0u64;
        chunkbits_float_buffer_create(&mut fh);
        chunkbits_float_buffer_destroy(fh);
        let mut n = 0u64;
        assert_eq!(
            chunkbits_float_buffer_size(fh, &mut n),
            ChunkbitsStatus::InvalidHandle as i32
        );
        assert_eq!(int_size(ih), 0);
        chunkbits_int_buffer_destroy(ih);
    }

    #[test]
    fn handles_do_not_cross_engine_kinds() {
        use crate::bitset::{
            chunkbits_bitset_and, chunkbits_bitset_clone, chunkbits_bitset_create,
            chunkbits_bitset_destroy, chunkbits_bitset_flip, chunkbits_bitset_get,
            chunkbits_bitset_or, chunkbits_bitset_set, chunkbits_bitset_size,
        };

        let invalid = ChunkbitsStatus::InvalidHandle as i32;
        let ih = int_buffer();
        assert_eq!(chunkbits_int_buffer_add(ih, [7, 8, 9].as_ptr(), 3), OK);
        let mut fh = 0u64;
        assert_eq!(chunkbits_float_buffer_create(&mut fh), OK);
        assert_eq!(chunkbits_float_buffer_add(fh, [0.5f32].as_ptr(), 1), OK);
        let mut bh = 0u64;
        assert_eq!(chunkbits_bitset_create(10, &mut bh), OK);

        let mut n = 0u64;
        let mut ints = [0i32; 3];
        let mut floats = [0f32; 1];
        for foreign in [bh, fh] {
            assert_eq!(chunkbits_int_buffer_size(foreign, &mut n), invalid);
            assert_eq!(chunkbits_int_buffer_add(foreign, [1].as_ptr(), 1), invalid);
            assert_eq!(
                chunkbits_int_buffer_flatten(foreign, ints.as_mut_ptr(), 3),
                invalid
            );
            assert_eq!(chunkbits_int_buffer_destroy(foreign), invalid);
        }
        for foreign in [bh, ih] {
            assert_eq!(chunkbits_float_buffer_size(foreign, &mut n), invalid);
            assert_eq!(
                chunkbits_float_buffer_add(foreign, [1.0f32].as_ptr(), 1),
                invalid
            );
            assert_eq!(
                chunkbits_float_buffer_flatten(foreign, floats.as_mut_ptr(), 1),
                invalid
            );
            assert_eq!(chunkbits_float_buffer_destroy(foreign), invalid);
        }
        let mut v = 0u8;
        let mut copy = 0u64;
        for foreign in [ih, fh] {
            assert_eq!(chunkbits_bitset_size(foreign, &mut n), invalid);
            assert_eq!(chunkbits_bitset_get(foreign, 0, &mut v), invalid);
            assert_eq!(chunkbits_bitset_set(foreign, 0), invalid);
            assert_eq!(chunkbits_bitset_flip(foreign, 0, 4), invalid);
            assert_eq!(chunkbits_bitset_and(bh, foreign), invalid);
            assert_eq!(chunkbits_bitset_or(foreign, bh), invalid);
            assert_eq!(chunkbits_bitset_clone(foreign, &mut copy), invalid);
            assert_eq!(chunkbits_bitset_destroy(foreign), invalid);
        }

        assert_eq!(int_size(ih), 3);
        assert_eq!(chunkbits_int_buffer_flatten(ih, ints.as_mut_ptr(), 3), OK);
        assert_eq!(ints, [7, 8, 9]);
        assert_eq!(chunkbits_float_buffer_flatten(fh, floats.as_mut_ptr(), 1), OK);
        assert_eq!(floats, [0.5]);
        assert_eq!(chunkbits_bitset_size(bh, &mut n), OK);
        assert_eq!(n, 10);

        assert_eq!(chunkbits_int_buffer_destroy(ih), OK);
        assert_eq!(chunkbits_float_buffer_destroy(fh), OK);
        assert_eq!(chunkbits_bitset_destroy(bh), OK);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn flatten_preserves_append_order(seed in any::<u64>(), total in 0usize..400) {
                let h = int_buffer();
                let parts = bursts(seed, total, 37);
                for part in &parts {
                    prop_assert_eq!(
                        chunkbits_int_buffer_add(h, part.as_ptr(), part.len()),
                        OK
                    );
                }
                prop_assert_eq!(int_size(h), total as u64);
                let mut out = vec![0i32; total];
                prop_assert_eq!(chunkbits_int_buffer_flatten(h, out.as_mut_ptr(), total), OK);
                prop_assert_eq!(out, parts.concat());
                chunkbits_int_buffer_destroy(h);
            }
        }
    }
}
