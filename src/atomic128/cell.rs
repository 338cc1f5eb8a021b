/*******************************************************************************
 *
 *    Copyright (c) 2025.
 *    3-Prism Co. Ltd.
 *
 *    All rights reserved.
 *
 ******************************************************************************/

//! # Atomic Double-Word Cell
//!
//! Provides an owned, correctly aligned storage cell for any
//! [`DoubleWord`] value, with safe atomic operations.
//!
//! # Author
//!
//! Haixing Hu

use std::cell::UnsafeCell;
use std::fmt;
use std::marker::PhantomData;

use crossbeam_utils::Backoff;

use crate::atomic128::backend::{DefaultBackend, DoubleWordBackend};
use crate::atomic128::ops;
use crate::atomic128::traits::{Atomic, DoubleWord};

/// Atomic double-word cell.
///
/// Owns a 16-byte aligned `T` and performs every access through backend
/// `B`. Because the storage is owned and aligned by construction, none of
/// the safe methods can hit the null or alignment faults of the raw
/// functions.
///
/// # Memory Ordering Strategy
///
/// Every operation is sequentially consistent. Unlike the word-sized
/// atomics, no weaker default is offered: the point of a double-word cell
/// is that all operations on it, from every thread, fall into a single
/// total order.
///
/// # Example
///
/// ```rust
/// use prism3_atomic128::{AtomicUint128, Uint128};
///
/// let atomic: AtomicUint128 = AtomicUint128::new(Uint128::new(1, 2));
/// let old = atomic.swap(Uint128::new(3, 4));
/// assert_eq!(old, Uint128::new(1, 2));
/// assert!(atomic.compare_and_swap(Uint128::new(3, 4), Uint128::splat(9)));
/// assert_eq!(atomic.load(), Uint128::splat(9));
/// ```
///
/// # Author
///
/// Haixing Hu
#[repr(transparent)]
pub struct AtomicDoubleWord<T: DoubleWord, B: DoubleWordBackend = DefaultBackend> {
    value: UnsafeCell<T>,
    _backend: PhantomData<fn() -> B>,
}

impl<T: DoubleWord, B: DoubleWordBackend> AtomicDoubleWord<T, B> {
    /// Creates a new cell holding `value`.
    #[inline]
    pub const fn new(value: T) -> Self {
        Self {
            value: UnsafeCell::new(value),
            _backend: PhantomData,
        }
    }

    /// Loads the current value.
    #[inline]
    pub fn load(&self) -> T {
        // SAFETY: owned storage, aligned by `T`'s layout, only ever
        // accessed through `B` while shared.
        unsafe { ops::load::<B, T>(self.value.get()) }
    }

    /// Stores a new value.
    #[inline]
    pub fn store(&self, value: T) {
        unsafe { ops::store::<B, T>(self.value.get(), value) }
    }

    /// Swaps the current value with `value`, returning the old value.
    #[inline]
    pub fn swap(&self, value: T) -> T {
        unsafe { ops::swap::<B, T>(self.value.get(), value) }
    }

    /// Replaces the value with `new` if its bits equal those of `current`.
    ///
    /// Returns `true` on success. A mismatch is reported, never retried.
    #[inline]
    pub fn compare_and_swap(&self, current: T, new: T) -> bool {
        unsafe { ops::compare_and_swap::<B, T>(self.value.get(), current, new) }
    }

    /// Updates the value using a function, returning the old value.
    ///
    /// Retries with a load/compare-and-swap loop. Failed attempts back off,
    /// first spinning and then yielding the thread, so that contending
    /// threads are not starved.
    #[inline]
    pub fn fetch_update<F>(&self, mut f: F) -> T
    where
        F: FnMut(T) -> T,
    {
        let backoff = Backoff::new();
        let mut current = self.load();
        loop {
            let new = f(current);
            if self.compare_and_swap(current, new) {
                return current;
            }
            backoff.snooze();
            current = self.load();
        }
    }

    /// Returns a raw pointer to the underlying storage.
    ///
    /// The pointer is non-null and 16-byte aligned, so it can be passed to
    /// the raw free functions. Concurrent accesses through it must use the
    /// same backend `B`.
    #[inline]
    pub const fn as_ptr(&self) -> *mut T {
        self.value.get()
    }

    /// Returns a mutable reference to the value.
    ///
    /// Safe because the mutable borrow guarantees no concurrent access.
    #[inline]
    pub fn get_mut(&mut self) -> &mut T {
        self.value.get_mut()
    }

    /// Consumes the cell and returns the value.
    #[inline]
    pub fn into_inner(self) -> T {
        self.value.into_inner()
    }
}

impl<T: DoubleWord, B: DoubleWordBackend> Atomic for AtomicDoubleWord<T, B> {
    type Value = T;

    #[inline]
    fn load(&self) -> T {
        self.load()
    }

    #[inline]
    fn store(&self, value: T) {
        self.store(value);
    }

    #[inline]
    fn swap(&self, value: T) -> T {
        self.swap(value)
    }

    #[inline]
    fn compare_and_swap(&self, current: T, new: T) -> bool {
        self.compare_and_swap(current, new)
    }

    #[inline]
    fn fetch_update<F>(&self, f: F) -> T
    where
        F: FnMut(T) -> T,
    {
        self.fetch_update(f)
    }
}

// SAFETY: `DoubleWord` values are plain data, and all shared access goes
// through the backend's atomic operations.
unsafe impl<T: DoubleWord, B: DoubleWordBackend> Send for AtomicDoubleWord<T, B> {}
unsafe impl<T: DoubleWord, B: DoubleWordBackend> Sync for AtomicDoubleWord<T, B> {}

impl<T: DoubleWord + Default, B: DoubleWordBackend> Default for AtomicDoubleWord<T, B> {
    #[inline]
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: DoubleWord, B: DoubleWordBackend> From<T> for AtomicDoubleWord<T, B> {
    #[inline]
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: DoubleWord + fmt::Debug, B: DoubleWordBackend> fmt::Debug for AtomicDoubleWord<T, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AtomicDoubleWord")
            .field("value", &self.load())
            .field("backend", &B::name())
            .finish()
    }
}
