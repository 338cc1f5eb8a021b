/*******************************************************************************
 *
 *    Copyright (c) 2025.
 *    3-Prism Co. Ltd.
 *
 *    All rights reserved.
 *
 ******************************************************************************/

//! # Double-Word Backends
//!
//! The leaf of the crate: four raw operations over a 16-byte aligned `u128`
//! location. Everything else is expressed in terms of a
//! [`DoubleWordBackend`].
//!
//! Two backends are provided:
//!
//! - [`NativeBackend`] views the location as a
//!   `portable_atomic::AtomicU128`, which compiles to the hardware
//!   double-width instruction where the target has one and to
//!   portable-atomic's own fallback elsewhere.
//! - [`LockTableBackend`] serializes every operation on an address through
//!   one shard of a static lock table. It presents the same linearizable
//!   contract, but a holder of a shard can delay unrelated addresses that
//!   hash to the same shard.
//!
//! A location must be accessed through one backend only. Mixing backends on
//! the same address voids the atomicity guarantee.
//!
//! # Author
//!
//! Haixing Hu

use std::ptr;
use std::sync::atomic::Ordering;

use crossbeam_utils::CachePadded;
use parking_lot::Mutex;
use portable_atomic::AtomicU128;

/// Raw double-word atomic operations.
///
/// All four operations on one address are mutually linearizable with
/// sequentially consistent ordering. None of them allocates, and
/// `compare_and_swap_raw` never retries internally.
///
/// The raw functions perform no precondition checks; use the functions in
/// [`ops`](crate::atomic128::ops) for null and alignment validation.
///
/// # Safety
///
/// For every method, `addr` must be non-null, aligned to 16 bytes, valid
/// for reads and writes of a `u128`, and accessed concurrently only
/// through this same backend.
///
/// # Author
///
/// Haixing Hu
pub trait DoubleWordBackend {
    /// Short human-readable name of the backend.
    fn name() -> &'static str;

    /// Returns `true` if operations never take a lock on this target.
    fn is_lock_free() -> bool;

    /// Atomically writes `new` to `*addr` and returns the previous value.
    ///
    /// # Safety
    ///
    /// See the trait documentation.
    unsafe fn swap_raw(addr: *mut u128, new: u128) -> u128;

    /// Atomically writes `new` to `*addr` if it currently equals `old`.
    ///
    /// # Safety
    ///
    /// See the trait documentation.
    unsafe fn compare_and_swap_raw(addr: *mut u128, old: u128, new: u128) -> bool;

    /// Atomically reads `*addr`.
    ///
    /// # Safety
    ///
    /// See the trait documentation.
    unsafe fn load_raw(addr: *mut u128) -> u128;

    /// Atomically writes `val` to `*addr`.
    ///
    /// # Safety
    ///
    /// See the trait documentation.
    unsafe fn store_raw(addr: *mut u128, val: u128);
}

/// Backend built on `portable_atomic::AtomicU128`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeBackend;

impl NativeBackend {
    #[inline]
    unsafe fn cell<'a>(addr: *mut u128) -> &'a AtomicU128 {
        // SAFETY: caller guarantees a live, 16-byte aligned u128 that is
        // only accessed atomically for the lifetime of the borrow.
        unsafe { AtomicU128::from_ptr(addr) }
    }
}

impl DoubleWordBackend for NativeBackend {
    #[inline]
    fn name() -> &'static str {
        "native"
    }

    #[inline]
    fn is_lock_free() -> bool {
        AtomicU128::is_lock_free()
    }

    #[inline]
    unsafe fn swap_raw(addr: *mut u128, new: u128) -> u128 {
        unsafe { Self::cell(addr) }.swap(new, Ordering::SeqCst)
    }

    #[inline]
    unsafe fn compare_and_swap_raw(addr: *mut u128, old: u128, new: u128) -> bool {
        unsafe { Self::cell(addr) }
            .compare_exchange(old, new, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    #[inline]
    unsafe fn load_raw(addr: *mut u128) -> u128 {
        unsafe { Self::cell(addr) }.load(Ordering::SeqCst)
    }

    #[inline]
    unsafe fn store_raw(addr: *mut u128, val: u128) {
        unsafe { Self::cell(addr) }.store(val, Ordering::SeqCst);
    }
}

/// Number of shards in the lock table. Must be a power of two.
const SHARD_COUNT: usize = 64;

#[allow(clippy::declare_interior_mutable_const)]
const UNLOCKED: CachePadded<Mutex<()>> = CachePadded::new(parking_lot::const_mutex(()));

static SHARDS: [CachePadded<Mutex<()>>; SHARD_COUNT] = [UNLOCKED; SHARD_COUNT];

/// Backend that emulates double-word atomics with a sharded lock table.
///
/// Each address maps to exactly one shard, so every operation on that
/// address is serialized by the same lock. The lock is held only for a
/// single read, compare or write of the target and never across caller
/// code.
#[derive(Debug, Clone, Copy, Default)]
pub struct LockTableBackend;

impl LockTableBackend {
    #[inline]
    fn shard_for(addr: *mut u128) -> &'static Mutex<()> {
        let word = (addr as usize) >> 4;
        let index = (word ^ (word >> 6) ^ (word >> 12)) & (SHARD_COUNT - 1);
        &SHARDS[index]
    }
}

impl DoubleWordBackend for LockTableBackend {
    #[inline]
    fn name() -> &'static str {
        "lock-table"
    }

    #[inline]
    fn is_lock_free() -> bool {
        false
    }

    #[inline]
    unsafe fn swap_raw(addr: *mut u128, new: u128) -> u128 {
        let _guard = Self::shard_for(addr).lock();
        // SAFETY: the shard lock excludes every other access to `addr`.
        unsafe { ptr::replace(addr, new) }
    }

    #[inline]
    unsafe fn compare_and_swap_raw(addr: *mut u128, old: u128, new: u128) -> bool {
        let _guard = Self::shard_for(addr).lock();
        unsafe {
            if ptr::read(addr) != old {
                return false;
            }
            ptr::write(addr, new);
        }
        true
    }

    #[inline]
    unsafe fn load_raw(addr: *mut u128) -> u128 {
        let _guard = Self::shard_for(addr).lock();
        unsafe { ptr::read(addr) }
    }

    #[inline]
    unsafe fn store_raw(addr: *mut u128, val: u128) {
        let _guard = Self::shard_for(addr).lock();
        unsafe { ptr::write(addr, val) }
    }
}

/// The backend used by the named free functions and by default for every
/// cell type.
#[cfg(not(feature = "lock-table"))]
pub type DefaultBackend = NativeBackend;

/// The backend used by the named free functions and by default for every
/// cell type.
#[cfg(feature = "lock-table")]
pub type DefaultBackend = LockTableBackend;

/// Returns `true` if the default backend is lock-free on this target.
#[inline]
pub fn is_lock_free() -> bool {
    DefaultBackend::is_lock_free()
}
