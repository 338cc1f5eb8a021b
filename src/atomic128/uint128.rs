/*******************************************************************************
 *
 *    Copyright (c) 2025.
 *    3-Prism Co. Ltd.
 *
 *    All rights reserved.
 *
 ******************************************************************************/

//! # 128-bit Unsigned Integer
//!
//! The raw double-word value: two 64-bit halves stored side by side and
//! manipulated as one indivisible unit.
//!
//! # Author
//!
//! Haixing Hu

use std::fmt;

use crate::atomic128::backend::DefaultBackend;
use crate::atomic128::cell::AtomicDoubleWord;
use crate::atomic128::traits::{pack_halves, unpack_halves, DoubleWord};

/// A 128-bit unsigned integer made of two 64-bit halves.
///
/// `lo` is stored at the lower address. Numeric conversions to and from
/// `u128` treat `lo` as the low 64 bits regardless of target endianness.
///
/// # Author
///
/// Haixing Hu
#[repr(C, align(16))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Uint128 {
    /// The lower-addressed half.
    pub lo: u64,
    /// The higher-addressed half.
    pub hi: u64,
}

impl Uint128 {
    /// Both halves zero.
    pub const ZERO: Self = Self::new(0, 0);

    /// Both halves all ones.
    pub const MAX: Self = Self::new(u64::MAX, u64::MAX);

    /// Creates a value from its two halves.
    #[inline]
    pub const fn new(lo: u64, hi: u64) -> Self {
        Self { lo, hi }
    }

    /// Creates a value whose two halves are both `half`.
    #[inline]
    pub const fn splat(half: u64) -> Self {
        Self::new(half, half)
    }

    /// Returns `true` if both halves are equal.
    ///
    /// A value written as a splat and observed with unequal halves was torn.
    #[inline]
    pub const fn is_splat(&self) -> bool {
        self.lo == self.hi
    }

    /// Adds `delta` to `lo` and subtracts it from `hi`, both wrapping.
    #[inline]
    pub const fn wrapping_add_lo_sub_hi(self, delta: u64) -> Self {
        Self::new(self.lo.wrapping_add(delta), self.hi.wrapping_sub(delta))
    }
}

unsafe impl DoubleWord for Uint128 {
    #[inline]
    fn into_bits(self) -> u128 {
        pack_halves(self.lo, self.hi)
    }

    #[inline]
    fn from_bits(bits: u128) -> Self {
        let (lo, hi) = unpack_halves(bits);
        Self { lo, hi }
    }
}

impl From<u128> for Uint128 {
    #[inline]
    fn from(value: u128) -> Self {
        Self::new(value as u64, (value >> 64) as u64)
    }
}

impl From<Uint128> for u128 {
    #[inline]
    fn from(value: Uint128) -> Self {
        (value.lo as u128) | ((value.hi as u128) << 64)
    }
}

impl From<(u64, u64)> for Uint128 {
    #[inline]
    fn from((lo, hi): (u64, u64)) -> Self {
        Self::new(lo, hi)
    }
}

impl fmt::LowerHex for Uint128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&u128::from(*self), f)
    }
}

impl fmt::Display for Uint128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:#x}, {:#x}]", self.lo, self.hi)
    }
}

/// Atomic 128-bit unsigned integer.
pub type AtomicUint128<B = DefaultBackend> = AtomicDoubleWord<Uint128, B>;

impl_facade_ops!(
    Uint128,
    "`Uint128`",
    swap: swap_uint128,
    compare_and_swap: compare_and_swap_uint128,
    load: load_uint128,
    store: store_uint128,
    try_swap: try_swap_uint128,
    try_compare_and_swap: try_compare_and_swap_uint128,
    try_load: try_load_uint128,
    try_store: try_store_uint128,
);
