/*******************************************************************************
 *
 *    Copyright (c) 2025.
 *    3-Prism Co. Ltd.
 *
 *    All rights reserved.
 *
 ******************************************************************************/

//! # Facade Operations Macro
//!
//! Provides a macro to generate the named free functions of a double-word
//! facade type. Every generated function delegates to
//! [`ops`](crate::atomic128::ops) with the default backend.
//!
//! # Author
//!
//! Haixing Hu

/// Macro to generate the named free functions of a facade.
///
/// # Parameters
///
/// * `$ty` - The facade type, which must implement `DoubleWord`.
/// * `$doc_type` - The type name used in documentation.
/// * the eight function names, in the order swap, compare-and-swap, load,
///   store, followed by their `try_` twins.
macro_rules! impl_facade_ops {
    (
        $ty:ty,
        $doc_type:expr,
        swap: $swap:ident,
        compare_and_swap: $cas:ident,
        load: $load:ident,
        store: $store:ident,
        try_swap: $try_swap:ident,
        try_compare_and_swap: $try_cas:ident,
        try_load: $try_load:ident,
        try_store: $try_store:ident $(,)?
    ) => {
        #[doc = concat!("Atomically stores `new` into `*addr` and returns the previous ", $doc_type, ".")]
        ///
        /// # Panics
        ///
        /// Panics if `addr` is null or not 16-byte aligned.
        ///
        /// # Safety
        ///
        /// `addr` must be valid for reads and writes and must only be
        /// accessed concurrently through the default backend.
        #[inline]
        #[track_caller]
        pub unsafe fn $swap(addr: *mut $ty, new: $ty) -> $ty {
            unsafe { $crate::atomic128::ops::swap::<$crate::atomic128::DefaultBackend, $ty>(addr, new) }
        }

        #[doc = concat!("Executes the compare-and-swap operation for a ", $doc_type, " value.")]
        ///
        /// Returns `true` if `*addr` equalled `old` and was replaced with
        /// `new`. A mismatch is reported, never retried.
        ///
        /// # Panics
        ///
        /// Panics if `addr` is null or not 16-byte aligned.
        ///
        /// # Safety
        ///
        /// Same as the swap function of this facade.
        #[inline]
        #[track_caller]
        pub unsafe fn $cas(addr: *mut $ty, old: $ty, new: $ty) -> bool {
            unsafe {
                $crate::atomic128::ops::compare_and_swap::<$crate::atomic128::DefaultBackend, $ty>(
                    addr, old, new,
                )
            }
        }

        #[doc = concat!("Atomically loads a ", $doc_type, " from `*addr`.")]
        ///
        /// # Panics
        ///
        /// Panics if `addr` is null or not 16-byte aligned.
        ///
        /// # Safety
        ///
        /// Same as the swap function of this facade.
        #[inline]
        #[track_caller]
        pub unsafe fn $load(addr: *mut $ty) -> $ty {
            unsafe { $crate::atomic128::ops::load::<$crate::atomic128::DefaultBackend, $ty>(addr) }
        }

        #[doc = concat!("Atomically stores a ", $doc_type, " into `*addr`.")]
        ///
        /// # Panics
        ///
        /// Panics if `addr` is null or not 16-byte aligned.
        ///
        /// # Safety
        ///
        /// Same as the swap function of this facade.
        #[inline]
        #[track_caller]
        pub unsafe fn $store(addr: *mut $ty, val: $ty) {
            unsafe { $crate::atomic128::ops::store::<$crate::atomic128::DefaultBackend, $ty>(addr, val) }
        }

        #[doc = concat!("Non-panicking version of [`", stringify!($swap), "`].")]
        ///
        /// # Safety
        ///
        /// Same as the swap function of this facade.
        #[inline]
        pub unsafe fn $try_swap(
            addr: *mut $ty,
            new: $ty,
        ) -> Result<$ty, $crate::atomic128::AtomicError> {
            unsafe { $crate::atomic128::ops::try_swap::<$crate::atomic128::DefaultBackend, $ty>(addr, new) }
        }

        #[doc = concat!("Non-panicking version of [`", stringify!($cas), "`].")]
        ///
        /// # Safety
        ///
        /// Same as the swap function of this facade.
        #[inline]
        pub unsafe fn $try_cas(
            addr: *mut $ty,
            old: $ty,
            new: $ty,
        ) -> Result<bool, $crate::atomic128::AtomicError> {
            unsafe {
                $crate::atomic128::ops::try_compare_and_swap::<$crate::atomic128::DefaultBackend, $ty>(
                    addr, old, new,
                )
            }
        }

        #[doc = concat!("Non-panicking version of [`", stringify!($load), "`].")]
        ///
        /// # Safety
        ///
        /// Same as the swap function of this facade.
        #[inline]
        pub unsafe fn $try_load(addr: *mut $ty) -> Result<$ty, $crate::atomic128::AtomicError> {
            unsafe { $crate::atomic128::ops::try_load::<$crate::atomic128::DefaultBackend, $ty>(addr) }
        }

        #[doc = concat!("Non-panicking version of [`", stringify!($store), "`].")]
        ///
        /// # Safety
        ///
        /// Same as the swap function of this facade.
        #[inline]
        pub unsafe fn $try_store(
            addr: *mut $ty,
            val: $ty,
        ) -> Result<(), $crate::atomic128::AtomicError> {
            unsafe { $crate::atomic128::ops::try_store::<$crate::atomic128::DefaultBackend, $ty>(addr, val) }
        }
    };
}
