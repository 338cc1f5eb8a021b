/*******************************************************************************
 *
 *    Copyright (c) 2025.
 *    3-Prism Co. Ltd.
 *
 *    All rights reserved.
 *
 ******************************************************************************/

//! # Buffer Descriptor
//!
//! A data pointer paired with a length, swapped as a unit so that a reader
//! never observes the pointer of one update with the length of another.
//! The safe cells [`AtomicSlice`] and [`AtomicStr`] hold borrowed slices
//! and strings on top of it.
//!
//! # Author
//!
//! Haixing Hu

use std::fmt;
use std::marker::PhantomData;
use std::ptr;
use std::slice;
use std::str;

use crate::atomic128::backend::{DefaultBackend, DoubleWordBackend};
use crate::atomic128::cell::AtomicDoubleWord;
use crate::atomic128::traits::{pack_halves, unpack_halves, Atomic, DoubleWord};

/// Pointer and element count of a contiguous buffer.
///
/// This is the layout of a Rust slice or `str` reference, spelled out so
/// that it does not depend on the unspecified layout of fat pointers.
///
/// # Author
///
/// Haixing Hu
#[repr(C, align(16))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferDescriptor {
    /// Address of the first element, or null for the empty descriptor.
    pub data: *const u8,
    /// Number of elements.
    pub len: usize,
}

impl BufferDescriptor {
    /// The empty descriptor: null data, zero length.
    pub const EMPTY: Self = Self {
        data: ptr::null(),
        len: 0,
    };

    /// Describes a slice.
    #[inline]
    pub fn of_slice<T>(slice: &[T]) -> Self {
        Self {
            data: slice.as_ptr().cast(),
            len: slice.len(),
        }
    }

    /// Describes a string.
    #[inline]
    pub fn of_str(s: &str) -> Self {
        Self::of_slice(s.as_bytes())
    }

    /// Returns `true` if the described buffer has no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Reconstructs the described slice.
    ///
    /// # Safety
    ///
    /// The descriptor must be empty or have been produced by
    /// [`of_slice`](Self::of_slice) from a `&'a [T]` that is still live.
    #[inline]
    pub unsafe fn as_slice<'a, T>(self) -> &'a [T] {
        if self.data.is_null() {
            return &[];
        }
        unsafe { slice::from_raw_parts(self.data.cast::<T>(), self.len) }
    }

    /// Reconstructs the described string.
    ///
    /// # Safety
    ///
    /// The descriptor must be empty or have been produced by
    /// [`of_str`](Self::of_str) from a `&'a str` that is still live.
    #[inline]
    pub unsafe fn as_str<'a>(self) -> &'a str {
        unsafe { str::from_utf8_unchecked(self.as_slice::<u8>()) }
    }
}

impl Default for BufferDescriptor {
    #[inline]
    fn default() -> Self {
        Self::EMPTY
    }
}

unsafe impl DoubleWord for BufferDescriptor {
    #[inline]
    fn into_bits(self) -> u128 {
        pack_halves(self.data as usize as u64, self.len as u64)
    }

    #[inline]
    fn from_bits(bits: u128) -> Self {
        let (data, len) = unpack_halves(bits);
        Self {
            data: data as usize as *const u8,
            len: len as usize,
        }
    }
}

impl_facade_ops!(
    BufferDescriptor,
    "`BufferDescriptor`",
    swap: swap_buffer,
    compare_and_swap: compare_and_swap_buffer,
    load: load_buffer,
    store: store_buffer,
    try_swap: try_swap_buffer,
    try_compare_and_swap: try_compare_and_swap_buffer,
    try_load: try_load_buffer,
    try_store: try_store_buffer,
);

/// Atomic borrowed slice.
///
/// Holds a `&'a [T]` whose address and length change together. Comparison
/// in [`compare_and_swap`](Self::compare_and_swap) is by identity (same
/// address and same length), never by contents.
///
/// # Example
///
/// ```rust
/// use prism3_atomic128::AtomicSlice;
///
/// static SHORT: [u32; 2] = [1, 2];
/// static LONG: [u32; 4] = [1, 2, 3, 4];
///
/// let atomic: AtomicSlice<u32> = AtomicSlice::new(&SHORT[..]);
/// let old = atomic.swap(&LONG[..]);
/// assert_eq!(old, &[1, 2]);
/// assert_eq!(atomic.load().len(), 4);
/// ```
///
/// # Author
///
/// Haixing Hu
pub struct AtomicSlice<'a, T, B: DoubleWordBackend = DefaultBackend> {
    inner: AtomicDoubleWord<BufferDescriptor, B>,
    _marker: PhantomData<&'a [T]>,
}

impl<'a, T, B: DoubleWordBackend> AtomicSlice<'a, T, B> {
    /// Creates a new atomic slice.
    #[inline]
    pub fn new(value: &'a [T]) -> Self {
        Self {
            inner: AtomicDoubleWord::new(BufferDescriptor::of_slice(value)),
            _marker: PhantomData,
        }
    }

    /// Loads the current slice.
    #[inline]
    pub fn load(&self) -> &'a [T] {
        // SAFETY: only descriptors of `&'a [T]` are ever stored.
        unsafe { self.inner.load().as_slice() }
    }

    /// Stores a new slice.
    #[inline]
    pub fn store(&self, value: &'a [T]) {
        self.inner.store(BufferDescriptor::of_slice(value));
    }

    /// Swaps the current slice with `value`, returning the old slice.
    #[inline]
    pub fn swap(&self, value: &'a [T]) -> &'a [T] {
        unsafe { self.inner.swap(BufferDescriptor::of_slice(value)).as_slice() }
    }

    /// Replaces the slice with `new` if the current one is `current`.
    ///
    /// Identity comparison: two distinct buffers with equal contents do not
    /// match.
    #[inline]
    pub fn compare_and_swap(&self, current: &'a [T], new: &'a [T]) -> bool {
        self.inner.compare_and_swap(
            BufferDescriptor::of_slice(current),
            BufferDescriptor::of_slice(new),
        )
    }

    /// Updates the slice using a function, returning the old slice.
    #[inline]
    pub fn fetch_update<F>(&self, mut f: F) -> &'a [T]
    where
        F: FnMut(&'a [T]) -> &'a [T],
    {
        let old = self.inner.fetch_update(|desc| {
            BufferDescriptor::of_slice(f(unsafe { desc.as_slice::<T>() }))
        });
        unsafe { old.as_slice() }
    }

    /// Gets a reference to the underlying descriptor cell.
    #[inline]
    pub fn inner(&self) -> &AtomicDoubleWord<BufferDescriptor, B> {
        &self.inner
    }
}

impl<'a, T, B: DoubleWordBackend> Atomic for AtomicSlice<'a, T, B> {
    type Value = &'a [T];

    #[inline]
    fn load(&self) -> &'a [T] {
        self.load()
    }

    #[inline]
    fn store(&self, value: &'a [T]) {
        self.store(value);
    }

    #[inline]
    fn swap(&self, value: &'a [T]) -> &'a [T] {
        self.swap(value)
    }

    #[inline]
    fn compare_and_swap(&self, current: &'a [T], new: &'a [T]) -> bool {
        self.compare_and_swap(current, new)
    }

    #[inline]
    fn fetch_update<F>(&self, f: F) -> &'a [T]
    where
        F: FnMut(&'a [T]) -> &'a [T],
    {
        self.fetch_update(f)
    }
}

impl<'a, T, B: DoubleWordBackend> Default for AtomicSlice<'a, T, B> {
    #[inline]
    fn default() -> Self {
        Self::new(&[])
    }
}

impl<'a, T: fmt::Debug, B: DoubleWordBackend> fmt::Debug for AtomicSlice<'a, T, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AtomicSlice")
            .field("value", &self.load())
            .finish()
    }
}

/// Atomic borrowed string.
///
/// The string counterpart of [`AtomicSlice`]; comparison is by identity.
///
/// # Author
///
/// Haixing Hu
pub struct AtomicStr<'a, B: DoubleWordBackend = DefaultBackend> {
    inner: AtomicSlice<'a, u8, B>,
}

impl<'a, B: DoubleWordBackend> AtomicStr<'a, B> {
    /// Creates a new atomic string.
    #[inline]
    pub fn new(value: &'a str) -> Self {
        Self {
            inner: AtomicSlice::new(value.as_bytes()),
        }
    }

    /// Loads the current string.
    #[inline]
    pub fn load(&self) -> &'a str {
        // SAFETY: only the bytes of a `&'a str` are ever stored.
        unsafe { str::from_utf8_unchecked(self.inner.load()) }
    }

    /// Stores a new string.
    #[inline]
    pub fn store(&self, value: &'a str) {
        self.inner.store(value.as_bytes());
    }

    /// Swaps the current string with `value`, returning the old string.
    #[inline]
    pub fn swap(&self, value: &'a str) -> &'a str {
        unsafe { str::from_utf8_unchecked(self.inner.swap(value.as_bytes())) }
    }

    /// Replaces the string with `new` if the current one is `current`.
    #[inline]
    pub fn compare_and_swap(&self, current: &'a str, new: &'a str) -> bool {
        self.inner
            .compare_and_swap(current.as_bytes(), new.as_bytes())
    }

    /// Updates the string using a function, returning the old string.
    #[inline]
    pub fn fetch_update<F>(&self, mut f: F) -> &'a str
    where
        F: FnMut(&'a str) -> &'a str,
    {
        let old = self.inner.fetch_update(|bytes| {
            f(unsafe { str::from_utf8_unchecked(bytes) }).as_bytes()
        });
        unsafe { str::from_utf8_unchecked(old) }
    }
}

impl<'a, B: DoubleWordBackend> Atomic for AtomicStr<'a, B> {
    type Value = &'a str;

    #[inline]
    fn load(&self) -> &'a str {
        self.load()
    }

    #[inline]
    fn store(&self, value: &'a str) {
        self.store(value);
    }

    #[inline]
    fn swap(&self, value: &'a str) -> &'a str {
        self.swap(value)
    }

    #[inline]
    fn compare_and_swap(&self, current: &'a str, new: &'a str) -> bool {
        self.compare_and_swap(current, new)
    }

    #[inline]
    fn fetch_update<F>(&self, f: F) -> &'a str
    where
        F: FnMut(&'a str) -> &'a str,
    {
        self.fetch_update(f)
    }
}

impl<'a, B: DoubleWordBackend> Default for AtomicStr<'a, B> {
    #[inline]
    fn default() -> Self {
        Self::new("")
    }
}

impl<'a, B: DoubleWordBackend> fmt::Debug for AtomicStr<'a, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AtomicStr")
            .field("value", &self.load())
            .finish()
    }
}

impl<'a, B: DoubleWordBackend> fmt::Display for AtomicStr<'a, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.load())
    }
}
