/*******************************************************************************
 *
 *    Copyright (c) 2025.
 *    3-Prism Co. Ltd.
 *
 *    All rights reserved.
 *
 ******************************************************************************/

//! # Checked Double-Word Operations
//!
//! Generic entry points over any [`DoubleWord`] value and any
//! [`DoubleWordBackend`]. They validate the location before touching it:
//!
//! - the `try_*` functions return an [`AtomicError`];
//! - the plain functions fault, i.e. log the error and panic, so the
//!   failure reaches the caller's `catch_unwind` boundary.
//!
//! The value is converted to and from its raw bit pattern with
//! [`DoubleWord::into_bits`] / [`DoubleWord::from_bits`]; no other work is
//! done on top of the backend.
//!
//! # Author
//!
//! Haixing Hu

use crate::atomic128::backend::DoubleWordBackend;
use crate::atomic128::error::{fault, AtomicError, Operation};
use crate::atomic128::traits::{DoubleWord, DOUBLE_WORD_ALIGN};

/// Validates `addr` and returns it as a raw `u128` location.
#[inline]
fn locate<T>(addr: *mut T, operation: Operation) -> Result<*mut u128, AtomicError> {
    if addr.is_null() {
        return Err(AtomicError::NullLocation { operation });
    }
    let address = addr as usize;
    if address % DOUBLE_WORD_ALIGN != 0 {
        return Err(AtomicError::Misaligned {
            operation,
            address,
            required: DOUBLE_WORD_ALIGN,
        });
    }
    Ok(addr.cast::<u128>())
}

/// Atomically stores `new` into `*addr` and returns the previous value.
///
/// # Safety
///
/// A non-null, aligned `addr` must be valid for reads and writes of `T`
/// and must only be accessed concurrently through backend `B`.
#[inline]
pub unsafe fn try_swap<B, T>(addr: *mut T, new: T) -> Result<T, AtomicError>
where
    B: DoubleWordBackend,
    T: DoubleWord,
{
    let raw = locate(addr, Operation::Swap)?;
    Ok(T::from_bits(unsafe { B::swap_raw(raw, new.into_bits()) }))
}

/// Atomically replaces `*addr` with `new` if it equals `old`.
///
/// Returns `Ok(true)` if the exchange happened and `Ok(false)` if the
/// current value did not match.
///
/// # Safety
///
/// Same as [`try_swap`].
#[inline]
pub unsafe fn try_compare_and_swap<B, T>(addr: *mut T, old: T, new: T) -> Result<bool, AtomicError>
where
    B: DoubleWordBackend,
    T: DoubleWord,
{
    let raw = locate(addr, Operation::CompareAndSwap)?;
    Ok(unsafe { B::compare_and_swap_raw(raw, old.into_bits(), new.into_bits()) })
}

/// Atomically loads `*addr`.
///
/// # Safety
///
/// Same as [`try_swap`]. The location must be writable even though it is
/// only read: some targets implement a double-word load with a
/// compare-and-swap.
#[inline]
pub unsafe fn try_load<B, T>(addr: *mut T) -> Result<T, AtomicError>
where
    B: DoubleWordBackend,
    T: DoubleWord,
{
    let raw = locate(addr, Operation::Load)?;
    Ok(T::from_bits(unsafe { B::load_raw(raw) }))
}

/// Atomically stores `val` into `*addr`.
///
/// # Safety
///
/// Same as [`try_swap`].
#[inline]
pub unsafe fn try_store<B, T>(addr: *mut T, val: T) -> Result<(), AtomicError>
where
    B: DoubleWordBackend,
    T: DoubleWord,
{
    let raw = locate(addr, Operation::Store)?;
    unsafe { B::store_raw(raw, val.into_bits()) };
    Ok(())
}

/// Faulting version of [`try_swap`].
///
/// # Panics
///
/// Panics if `addr` is null or misaligned.
///
/// # Safety
///
/// Same as [`try_swap`].
#[inline]
#[track_caller]
pub unsafe fn swap<B, T>(addr: *mut T, new: T) -> T
where
    B: DoubleWordBackend,
    T: DoubleWord,
{
    match unsafe { try_swap::<B, T>(addr, new) } {
        Ok(old) => old,
        Err(err) => fault(err),
    }
}

/// Faulting version of [`try_compare_and_swap`].
///
/// # Panics
///
/// Panics if `addr` is null or misaligned.
///
/// # Safety
///
/// Same as [`try_swap`].
#[inline]
#[track_caller]
pub unsafe fn compare_and_swap<B, T>(addr: *mut T, old: T, new: T) -> bool
where
    B: DoubleWordBackend,
    T: DoubleWord,
{
    match unsafe { try_compare_and_swap::<B, T>(addr, old, new) } {
        Ok(swapped) => swapped,
        Err(err) => fault(err),
    }
}

/// Faulting version of [`try_load`].
///
/// # Panics
///
/// Panics if `addr` is null or misaligned.
///
/// # Safety
///
/// Same as [`try_load`].
#[inline]
#[track_caller]
pub unsafe fn load<B, T>(addr: *mut T) -> T
where
    B: DoubleWordBackend,
    T: DoubleWord,
{
    match unsafe { try_load::<B, T>(addr) } {
        Ok(val) => val,
        Err(err) => fault(err),
    }
}

/// Faulting version of [`try_store`].
///
/// # Panics
///
/// Panics if `addr` is null or misaligned.
///
/// # Safety
///
/// Same as [`try_swap`].
#[inline]
#[track_caller]
pub unsafe fn store<B, T>(addr: *mut T, val: T)
where
    B: DoubleWordBackend,
    T: DoubleWord,
{
    if let Err(err) = unsafe { try_store::<B, T>(addr, val) } {
        fault(err);
    }
}
