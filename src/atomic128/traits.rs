/*******************************************************************************
 *
 *    Copyright (c) 2025.
 *    3-Prism Co. Ltd.
 *
 *    All rights reserved.
 *
 ******************************************************************************/

//! # Double-Word Traits
//!
//! Defines the reinterpretation contract shared by every two-word value and
//! the common interface of the owned atomic cells.
//!
//! # Author
//!
//! Haixing Hu

/// Width in bytes of every double-word value.
pub const DOUBLE_WORD_SIZE: usize = 16;

/// Required alignment in bytes of every double-word location.
pub const DOUBLE_WORD_ALIGN: usize = 16;

/// A value that occupies exactly two machine words and can be viewed as a
/// raw `u128` bit pattern.
///
/// The conversion is a projection, not an encoding: `into_bits` must
/// produce the same bits the value occupies in memory (read as a
/// native-endian `u128`), and `from_bits` must invert it. The backend reads
/// and writes the storage as `u128`, so any other mapping would change what
/// is observed through a pointer.
///
/// # Safety
///
/// Implementors must be `#[repr(C)]` with size and alignment of exactly
/// [`DOUBLE_WORD_SIZE`] and [`DOUBLE_WORD_ALIGN`], must contain no padding,
/// and must be plain data: every bit pattern produced by `into_bits` of
/// some value must be accepted by `from_bits`, and moving that pattern
/// between threads must not transfer ownership of anything.
///
/// # Author
///
/// Haixing Hu
pub unsafe trait DoubleWord: Copy {
    /// Returns the in-memory bit pattern of this value.
    fn into_bits(self) -> u128;

    /// Rebuilds a value from its in-memory bit pattern.
    fn from_bits(bits: u128) -> Self;
}

/// Packs two 64-bit halves in memory order into a native-endian `u128`.
///
/// `first` is the half stored at the lower address.
#[inline]
pub(crate) const fn pack_halves(first: u64, second: u64) -> u128 {
    if cfg!(target_endian = "little") {
        (first as u128) | ((second as u128) << 64)
    } else {
        ((first as u128) << 64) | (second as u128)
    }
}

/// Inverse of [`pack_halves`]: returns `(first, second)` in memory order.
#[inline]
pub(crate) const fn unpack_halves(bits: u128) -> (u64, u64) {
    if cfg!(target_endian = "little") {
        (bits as u64, (bits >> 64) as u64)
    } else {
        ((bits >> 64) as u64, bits as u64)
    }
}

/// Common trait for the owned double-word atomic cells.
///
/// Every operation is sequentially consistent: all operations on one cell
/// are totally ordered and each load observes the latest write in that
/// order.
///
/// # Author
///
/// Haixing Hu
pub trait Atomic {
    /// The value type stored in the atomic.
    type Value;

    /// Loads the current value.
    fn load(&self) -> Self::Value;

    /// Stores a new value.
    fn store(&self, value: Self::Value);

    /// Swaps the current value with a new value, returning the old value.
    fn swap(&self, value: Self::Value) -> Self::Value;

    /// Replaces the value with `new` if it currently equals `current`.
    ///
    /// Returns `true` if the exchange happened. A mismatch leaves the value
    /// untouched and is not retried.
    fn compare_and_swap(&self, current: Self::Value, new: Self::Value) -> bool;

    /// Updates the value using a function, returning the old value.
    ///
    /// Internally uses a load/compare-and-swap loop until the update
    /// succeeds. `f` may be called more than once.
    fn fetch_update<F>(&self, f: F) -> Self::Value
    where
        F: FnMut(Self::Value) -> Self::Value;
}
