//! Bit set FFI: create, destroy, query, mutate, combine, scan.
//!
//! All bit sets live in one process-wide table. The table lock is held for
//! the duration of each call, so calls on the same handle from several
//! threads are serialized rather than racing.
//!
//! Null out-pointers are rejected first. After that the handle is resolved
//! before any position or range is checked, so a stale handle always
//! reports `InvalidHandle`.

use std::sync::Mutex;

use chunkbits_core::{BitSet, BitSetConfig, BitSetError};

use crate::handle::{HandleTable, BITSET_TAG};
use crate::slice::{borrow, write_out};
use crate::status::{status_of, ChunkbitsStatus};

static BITSETS: Mutex<HandleTable<BitSet>> = Mutex::new(HandleTable::new("bitset", BITSET_TAG));

/// C-compatible bit set configuration.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkbitsBitSetConfig {
    /// Maximum number of bits the set may grow to.
    pub max_len: u64,
}

impl Default for ChunkbitsBitSetConfig {
    fn default() -> Self {
        Self {
            max_len: BitSetConfig::DEFAULT_MAX_LEN as u64,
        }
    }
}

impl From<&ChunkbitsBitSetConfig> for BitSetConfig {
    fn from(c: &ChunkbitsBitSetConfig) -> Self {
        BitSetConfig::new(usize::try_from(c.max_len).unwrap_or(usize::MAX))
    }
}

/// Non-negative position, or `OutOfRange`.
fn position(pos: i64) -> Result<usize, ChunkbitsStatus> {
    usize::try_from(pos).map_err(|_| ChunkbitsStatus::OutOfRange)
}

/// Non-negative range bound, or `InvalidArgument`.
fn bound(pos: i64) -> Result<usize, ChunkbitsStatus> {
    usize::try_from(pos).map_err(|_| ChunkbitsStatus::InvalidArgument)
}

fn code(result: Result<(), ChunkbitsStatus>) -> i32 {
    match result {
        Ok(()) => ChunkbitsStatus::Ok as i32,
        Err(status) => status as i32,
    }
}

/// Register `bits` and store its handle.
#[allow(unsafe_code)]
fn register(table: &mut HandleTable<BitSet>, bits: BitSet, handle_out: *mut u64) -> i32 {
    let Some(handle) = table.insert(bits) else {
        return ChunkbitsStatus::InternalError as i32;
    };
    // SAFETY: handle_out is non-null and valid per caller contract.
    unsafe { *handle_out = handle };
    ChunkbitsStatus::Ok as i32
}

fn create_with(size: u64, config: BitSetConfig, handle_out: *mut u64) -> i32 {
    if handle_out.is_null() {
        return ChunkbitsStatus::InvalidArgument as i32;
    }
    let Ok(len) = usize::try_from(size) else {
        return ChunkbitsStatus::LengthLimitExceeded as i32;
    };
    let bits = match BitSet::with_config(len, config) {
        Ok(b) => b,
        Err(e) => return ChunkbitsStatus::from(&e) as i32,
    };
    register(&mut *ffi_lock!(BITSETS), bits, handle_out)
}

fn with_bits<R>(
    handle: u64,
    f: impl FnOnce(&BitSet) -> Result<R, ChunkbitsStatus>,
) -> Result<R, ChunkbitsStatus> {
    let table = BITSETS
        .lock()
        .map_err(|_| ChunkbitsStatus::InternalError)?;
    let bits = table.get(handle).ok_or(ChunkbitsStatus::InvalidHandle)?;
    f(bits)
}

fn with_bits_mut(handle: u64, f: impl FnOnce(&mut BitSet) -> Result<(), ChunkbitsStatus>) -> i32 {
    let mut table = ffi_lock!(BITSETS);
    code(match table.get_mut(handle) {
        Some(bits) => f(bits),
        None => Err(ChunkbitsStatus::InvalidHandle),
    })
}

/// Store a query result, or pass an earlier failure through.
#[allow(unsafe_code)]
fn answer<T>(result: Result<T, ChunkbitsStatus>, out: *mut T) -> i32 {
    if out.is_null() {
        return ChunkbitsStatus::InvalidArgument as i32;
    }
    // SAFETY: out is non-null and valid for one write per caller contract.
    code(result.and_then(|v| unsafe { write_out(out, v) }))
}

fn set_positions<P: Copy>(handle: u64, positions: &[P]) -> i32
where
    usize: TryFrom<P>,
{
    with_bits_mut(handle, |bits| {
        if positions.iter().any(|&p| usize::try_from(p).is_err()) {
            return Err(ChunkbitsStatus::OutOfRange);
        }
        Ok(bits.set_many(positions.iter().filter_map(|&p| usize::try_from(p).ok()))?)
    })
}

fn combine(
    handle: u64,
    other: u64,
    op: fn(&mut BitSet, &BitSet) -> Result<(), BitSetError>,
) -> i32 {
    let mut table = ffi_lock!(BITSETS);
    if handle == other {
        // x AND x == x OR x == x.
        return match table.get(handle) {
            Some(_) => ChunkbitsStatus::Ok as i32,
            None => ChunkbitsStatus::InvalidHandle as i32,
        };
    }
    match table.get_pair(handle, other) {
        Some((target, source)) => status_of(op(target, source)),
        None => ChunkbitsStatus::InvalidHandle as i32,
    }
}

/// Create a bit set of `size` bits, all false, with the default config.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn chunkbits_bitset_create(size: u64, handle_out: *mut u64) -> i32 {
    ffi_guard!({ create_with(size, BitSetConfig::default(), handle_out) })
}

/// Create a bit set of `size` bits with an explicit growth limit.
///
/// `config` may be null to use the defaults.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn chunkbits_bitset_create_with_config(
    size: u64,
    config: *const ChunkbitsBitSetConfig,
    handle_out: *mut u64,
) -> i32 {
    ffi_guard!({
        let config = if config.is_null() {
            BitSetConfig::default()
        } else {
            // SAFETY: config is non-null and points to a valid struct.
            BitSetConfig::from(unsafe { &*config })
        };
        create_with(size, config, handle_out)
    })
}

/// Destroy a bit set. The handle is invalid afterwards.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn chunkbits_bitset_destroy(handle: u64) -> i32 {
    ffi_guard!({
        match ffi_lock!(BITSETS).remove(handle) {
            Some(_) => ChunkbitsStatus::Ok as i32,
            None => ChunkbitsStatus::InvalidHandle as i32,
        }
    })
}

/// Write the current length in bits to `size_out`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn chunkbits_bitset_size(handle: u64, size_out: *mut u64) -> i32 {
    ffi_guard!({ answer(with_bits(handle, |b| Ok(b.len() as u64)), size_out) })
}

/// Write the bit at `pos` (1 or 0) to `value_out`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn chunkbits_bitset_get(handle: u64, pos: i64, value_out: *mut u8) -> i32 {
    ffi_guard!({
        let result = with_bits(handle, |b| Ok(u8::from(b.get(position(pos)?)?)));
        answer(result, value_out)
    })
}

/// Deep-copy a bit set, including its growth limit, into a new handle.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn chunkbits_bitset_clone(handle: u64, handle_out: *mut u64) -> i32 {
    ffi_guard!({
        if handle_out.is_null() {
            return ChunkbitsStatus::InvalidArgument as i32;
        }
        let mut table = ffi_lock!(BITSETS);
        let copy = match table.get(handle) {
            Some(bits) => bits.clone(),
            None => return ChunkbitsStatus::InvalidHandle as i32,
        };
        register(&mut table, copy, handle_out)
    })
}

/// Set a single bit. Does not grow the set.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn chunkbits_bitset_set(handle: u64, pos: i64) -> i32 {
    ffi_guard!({ with_bits_mut(handle, |bits| Ok(bits.set(position(pos)?)?)) })
}

/// Set every position in `positions[0..len]`. Does not grow the set.
///
/// All positions are checked first; on `OutOfRange` no bit is changed.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn chunkbits_bitset_set_many_i32(
    handle: u64,
    positions: *const i32,
    len: usize,
) -> i32 {
    ffi_guard!({
        // SAFETY: positions points to len valid i32 values.
        match unsafe { borrow(positions, len) } {
            Ok(positions) => set_positions(handle, positions),
            Err(status) => status as i32,
        }
    })
}

/// Set every position in `positions[0..len]`. Does not grow the set.
///
/// All positions are checked first; on `OutOfRange` no bit is changed.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn chunkbits_bitset_set_many_i64(
    handle: u64,
    positions: *const i64,
    len: usize,
) -> i32 {
    ffi_guard!({
        // SAFETY: positions points to len valid i64 values.
        match unsafe { borrow(positions, len) } {
            Ok(positions) => set_positions(handle, positions),
            Err(status) => status as i32,
        }
    })
}

/// Write the number of true bits to `count_out`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn chunkbits_bitset_cardinality(handle: u64, count_out: *mut u64) -> i32 {
    ffi_guard!({ answer(with_bits(handle, |b| Ok(b.cardinality() as u64)), count_out) })
}

/// Toggle every bit in `[start, end)`, growing the set to `end` first if
/// needed.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn chunkbits_bitset_flip(handle: u64, start: i64, end: i64) -> i32 {
    ffi_guard!({
        with_bits_mut(handle, |bits| Ok(bits.flip(bound(start)?, bound(end)?)?))
    })
}

/// In-place AND of `handle` with `other` (shorter operand zero-extended).
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn chunkbits_bitset_and(handle: u64, other: u64) -> i32 {
    ffi_guard!({ combine(handle, other, BitSet::and) })
}

/// In-place OR of `handle` with `other` (shorter operand zero-extended).
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn chunkbits_bitset_or(handle: u64, other: u64) -> i32 {
    ffi_guard!({ combine(handle, other, BitSet::or) })
}

/// Reset a single bit to false. Does not grow the set.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn chunkbits_bitset_clear(handle: u64, pos: i64) -> i32 {
    ffi_guard!({ with_bits_mut(handle, |bits| Ok(bits.clear(position(pos)?)?)) })
}

/// Write the lowest true position `>= from` to `pos_out`, or -1 if none.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn chunkbits_bitset_next_set_bit(handle: u64, from: i64, pos_out: *mut i64) -> i32 {
    ffi_guard!({
        let result = with_bits(handle, |b| {
            Ok(b.next_set_bit(bound(from)?).map_or(-1, |p| p as i64))
        });
        answer(result, pos_out)
    })
}
