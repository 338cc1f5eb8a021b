/*******************************************************************************
 *
 *    Copyright (c) 2025.
 *    3-Prism Co. Ltd.
 *
 *    All rights reserved.
 *
 ******************************************************************************/

//! # Double Pointer
//!
//! Two machine addresses swapped as a unit, e.g. a pointer paired with a
//! version tag or two links of a node updated together.
//!
//! # Author
//!
//! Haixing Hu

use std::ptr;

use crate::atomic128::backend::DefaultBackend;
use crate::atomic128::cell::AtomicDoubleWord;
use crate::atomic128::traits::{pack_halves, unpack_halves, DoubleWord};

/// Two untyped addresses.
///
/// Records a relation between two locations and owns neither. `first` is
/// stored at the lower address.
///
/// # Author
///
/// Haixing Hu
#[repr(C, align(16))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DoublePointer {
    /// The lower-addressed pointer.
    pub first: *mut (),
    /// The higher-addressed pointer.
    pub second: *mut (),
}

impl DoublePointer {
    /// Creates a double pointer from two typed pointers.
    #[inline]
    pub fn new<A, B>(first: *mut A, second: *mut B) -> Self {
        Self {
            first: first.cast(),
            second: second.cast(),
        }
    }

    /// Both pointers null.
    #[inline]
    pub const fn null() -> Self {
        Self {
            first: ptr::null_mut(),
            second: ptr::null_mut(),
        }
    }

    /// Returns `true` if both pointers are null.
    #[inline]
    pub fn is_null(&self) -> bool {
        self.first.is_null() && self.second.is_null()
    }

    /// Returns the first pointer cast to `*mut A`.
    #[inline]
    pub fn first<A>(&self) -> *mut A {
        self.first.cast()
    }

    /// Returns the second pointer cast to `*mut B`.
    #[inline]
    pub fn second<B>(&self) -> *mut B {
        self.second.cast()
    }
}

impl Default for DoublePointer {
    #[inline]
    fn default() -> Self {
        Self::null()
    }
}

unsafe impl DoubleWord for DoublePointer {
    #[inline]
    fn into_bits(self) -> u128 {
        pack_halves(self.first as usize as u64, self.second as usize as u64)
    }

    #[inline]
    fn from_bits(bits: u128) -> Self {
        let (first, second) = unpack_halves(bits);
        Self {
            first: first as usize as *mut (),
            second: second as usize as *mut (),
        }
    }
}

/// Atomic pair of pointers.
pub type AtomicDoublePointer<B = DefaultBackend> = AtomicDoubleWord<DoublePointer, B>;

impl_facade_ops!(
    DoublePointer,
    "`DoublePointer`",
    swap: swap_double_pointer,
    compare_and_swap: compare_and_swap_double_pointer,
    load: load_double_pointer,
    store: store_double_pointer,
    try_swap: try_swap_double_pointer,
    try_compare_and_swap: try_compare_and_swap_double_pointer,
    try_load: try_load_double_pointer,
    try_store: try_store_double_pointer,
);
