/*******************************************************************************
 *
 *    Copyright (c) 2025.
 *    3-Prism Co. Ltd.
 *
 *    All rights reserved.
 *
 ******************************************************************************/

//! # Atomic Value
//!
//! A single slot holding one [`DynamicValue`], loaded and stored atomically
//! through a [`DynamicValueDescriptor`].
//!
//! # Author
//!
//! Haixing Hu

use std::fmt;

use crossbeam_epoch::{self as epoch, Guard};

use crate::atomic128::backend::{DefaultBackend, DoubleWordBackend};
use crate::atomic128::cell::AtomicDoubleWord;
use crate::atomic128::dynamic::{DynamicValue, DynamicValueDescriptor};

/// Atomic box for a dynamically-typed value.
///
/// A fresh box is empty and [`load`](Self::load) returns `None`. Stored
/// values may be of different types.
///
/// # Reclamation
///
/// A loader reads the descriptor and then takes a new reference to the
/// payload, both while pinned to the current epoch. A value replaced by a
/// store is released through [`Guard::defer`], so its reference is dropped
/// only once every thread that could still be between those two steps has
/// unpinned. No `&mut` access is needed: a box held in a `static` or an
/// `Arc` releases its replaced values as the global epoch advances.
/// [`reclaim`](Self::reclaim) pushes the calling thread's pending releases
/// towards collection.
///
/// # Copying
///
/// `AtomicValue` is neither `Copy` nor `Clone`: its identity, not its bits,
/// is what threads synchronize on, so duplicating it is rejected at compile
/// time. Moving it requires unique ownership, which the borrow checker
/// denies while any thread holds a reference.
///
/// # Example
///
/// ```rust
/// use prism3_atomic128::{AtomicValue, DynamicValue};
///
/// let boxed: AtomicValue = AtomicValue::new();
/// assert!(boxed.load().is_none());
///
/// boxed.store(DynamicValue::new(42_u32));
/// let value = boxed.load().unwrap();
/// assert_eq!(value.downcast_ref::<u32>(), Some(&42));
/// ```
///
/// # Author
///
/// Haixing Hu
pub struct AtomicValue<B: DoubleWordBackend = DefaultBackend> {
    slot: AtomicDoubleWord<DynamicValueDescriptor, B>,
}

impl<B: DoubleWordBackend> AtomicValue<B> {
    /// Creates an empty box.
    #[inline]
    pub const fn new() -> Self {
        Self {
            slot: AtomicDoubleWord::new(DynamicValueDescriptor::EMPTY),
        }
    }

    /// Creates a box holding `value`.
    #[inline]
    pub fn with_value(value: DynamicValue) -> Self {
        Self {
            slot: AtomicDoubleWord::new(value.into_descriptor()),
        }
    }

    /// Returns the value set by the most recent store, or `None` if no
    /// value has been stored.
    #[inline]
    pub fn load(&self) -> Option<DynamicValue> {
        let guard = epoch::pin();
        let desc = self.slot.load();
        // SAFETY: a descriptor read while pinned is released no earlier than
        // the deferred drop scheduled by whoever replaced it, which waits for
        // `guard` to unpin.
        let value = unsafe { DynamicValue::clone_from_descriptor(desc) };
        drop(guard);
        value
    }

    /// Replaces the contents with `value`.
    #[inline]
    pub fn store(&self, value: DynamicValue) {
        let guard = epoch::pin();
        let old = self.slot.swap(value.into_descriptor());
        Self::retire(old, &guard);
    }

    /// Replaces the contents with `value`, returning the previous value.
    #[inline]
    pub fn swap(&self, value: DynamicValue) -> Option<DynamicValue> {
        let guard = epoch::pin();
        let old = self.slot.swap(value.into_descriptor());
        // The slot's own reference may still be in use by a pinned loader,
        // so the caller gets a fresh one and the slot's is deferred.
        let previous = unsafe { DynamicValue::clone_from_descriptor(old) };
        Self::retire(old, &guard);
        previous
    }

    /// Replaces the contents with `new` if they are currently `current`.
    ///
    /// `None` matches an empty box. The comparison is by identity: both the
    /// type descriptor address and the payload address must match, which is
    /// always the case for a value obtained from [`load`](Self::load).
    /// On a mismatch `new` is dropped and `false` is returned.
    #[inline]
    pub fn compare_and_swap(&self, current: Option<&DynamicValue>, new: DynamicValue) -> bool {
        let expected = current.map_or(DynamicValueDescriptor::EMPTY, DynamicValue::as_descriptor);
        let guard = epoch::pin();
        if self.slot.compare_and_swap(expected, new.as_descriptor()) {
            // The slot now owns `new`'s reference; ours of `expected` is
            // released once the epoch moves on.
            std::mem::forget(new);
            Self::retire(expected, &guard);
            true
        } else {
            false
        }
    }

    /// Hands the calling thread's deferred releases to the global collector
    /// and attempts a collection pass.
    ///
    /// Releases are also collected without this call as threads pin and
    /// unpin; it only speeds that up for the current thread.
    pub fn reclaim(&self) {
        let guard = epoch::pin();
        guard.flush();
        tracing::debug!("flushed deferred dynamic value releases");
    }

    /// Consumes the box and returns its current value.
    pub fn into_inner(mut self) -> Option<DynamicValue> {
        let desc = std::mem::take(self.slot.get_mut());
        unsafe { DynamicValue::from_descriptor(desc) }
    }

    fn retire(desc: DynamicValueDescriptor, guard: &Guard) {
        // SAFETY: `desc` left the slot, so its reference now belongs to us.
        let Some(value) = (unsafe { DynamicValue::from_descriptor(desc) }) else {
            return;
        };
        tracing::trace!(type_name = value.type_name(), "retiring replaced dynamic value");
        guard.defer(move || drop(value));
    }
}

impl<B: DoubleWordBackend> Drop for AtomicValue<B> {
    fn drop(&mut self) {
        // Unique access: no loader can be reading the slot.
        let desc = std::mem::take(self.slot.get_mut());
        drop(unsafe { DynamicValue::from_descriptor(desc) });
    }
}

impl<B: DoubleWordBackend> Default for AtomicValue<B> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<B: DoubleWordBackend> From<DynamicValue> for AtomicValue<B> {
    #[inline]
    fn from(value: DynamicValue) -> Self {
        Self::with_value(value)
    }
}

impl<B: DoubleWordBackend> fmt::Debug for AtomicValue<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AtomicValue")
            .field("value", &self.load())
            .finish()
    }
}
