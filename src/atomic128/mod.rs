/*******************************************************************************
 *
 *    Copyright (c) 2025.
 *    3-Prism Co. Ltd.
 *
 *    All rights reserved.
 *
 ******************************************************************************/

//! # Double-Word Atomic Types
//!
//! Provides atomic operations on values two machine words wide.
//!
//! # Layers
//!
//! - [`backend`]: the four raw operations over a `u128` location
//! - [`ops`]: checked generic operations over any [`DoubleWord`] value
//! - facades: [`Uint128`], [`DoublePointer`], [`BufferDescriptor`],
//!   [`DynamicValueDescriptor`], each with named free functions
//! - owned cells: [`AtomicDoubleWord`] and its aliases, [`AtomicSlice`],
//!   [`AtomicStr`], [`AtomicValue`]
//!
//! # Author
//!
//! Haixing Hu

#[macro_use]
mod facade_ops_macro;

pub mod backend;
mod buffer;
mod cell;
mod double_pointer;
mod dynamic;
mod error;
pub mod ops;
mod traits;
mod uint128;
mod value;

pub use backend::{
    is_lock_free,
    DefaultBackend,
    DoubleWordBackend,
    LockTableBackend,
    NativeBackend,
};
pub use buffer::{
    compare_and_swap_buffer,
    load_buffer,
    store_buffer,
    swap_buffer,
    try_compare_and_swap_buffer,
    try_load_buffer,
    try_store_buffer,
    try_swap_buffer,
    AtomicSlice,
    AtomicStr,
    BufferDescriptor,
};
pub use cell::AtomicDoubleWord;
pub use double_pointer::{
    compare_and_swap_double_pointer,
    load_double_pointer,
    store_double_pointer,
    swap_double_pointer,
    try_compare_and_swap_double_pointer,
    try_load_double_pointer,
    try_store_double_pointer,
    try_swap_double_pointer,
    AtomicDoublePointer,
    DoublePointer,
};
pub use dynamic::{
    compare_and_swap_dynamic,
    load_dynamic,
    store_dynamic,
    swap_dynamic,
    try_compare_and_swap_dynamic,
    try_load_dynamic,
    try_store_dynamic,
    try_swap_dynamic,
    DynamicValue,
    DynamicValueDescriptor,
    TypeDescriptor,
};
pub use error::{
    AtomicError,
    Operation,
};
pub use traits::{
    Atomic,
    DoubleWord,
    DOUBLE_WORD_ALIGN,
    DOUBLE_WORD_SIZE,
};
pub use uint128::{
    compare_and_swap_uint128,
    load_uint128,
    store_uint128,
    swap_uint128,
    try_compare_and_swap_uint128,
    try_load_uint128,
    try_store_uint128,
    try_swap_uint128,
    AtomicUint128,
    Uint128,
};
pub use value::AtomicValue;
