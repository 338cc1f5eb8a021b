/*******************************************************************************
 *
 *    Copyright (c) 2025.
 *    3-Prism Co. Ltd.
 *
 *    All rights reserved.
 *
 ******************************************************************************/
//! # prism3-rust-atomic128
//!
//! Lock-free atomic operations on double-word (128-bit) values.
//!
//! The standard library's atomics stop at one machine word. Tagged
//! pointers, version-counted references, and atomic "fat" values such as
//! slices or type-tagged dynamic values need an atomic unit twice that
//! width. This crate provides it.
//!
//! ## Design Goals
//!
//! - **No tearing**: a double-word value is never observed with one half
//!   from one write and the other half from another
//! - **Sequential consistency**: all operations on one location fall into a
//!   single total order
//! - **Typed views**: the same two words seen as an integer pair, a pointer
//!   pair, a buffer reference, or a dynamic value reference
//! - **Fail fast**: null or misaligned locations fault deterministically
//!
//! ## Features
//!
//! - Raw value and its cell: `Uint128`, `AtomicUint128`
//! - Pointer pair: `DoublePointer`, `AtomicDoublePointer`
//! - Buffer references: `BufferDescriptor`, `AtomicSlice`, `AtomicStr`
//! - Dynamic values: `DynamicValueDescriptor`, `DynamicValue`,
//!   `AtomicValue`
//! - Free functions over raw pointers for every facade, e.g.
//!   `swap_uint128`, `compare_and_swap_buffer`, `load_dynamic`
//! - Backends: `NativeBackend` (hardware instruction via `portable-atomic`)
//!   and `LockTableBackend` (sharded lock emulation, selected as the default
//!   by the `lock-table` feature)
//!
//! ## Example
//!
//! ```rust
//! use prism3_atomic128::{AtomicUint128, Uint128};
//! use std::sync::Arc;
//! use std::thread;
//!
//! let cell: Arc<AtomicUint128> = Arc::new(AtomicUint128::new(Uint128::ZERO));
//! let mut handles = vec![];
//!
//! for _ in 0..4 {
//!     let cell = cell.clone();
//!     handles.push(thread::spawn(move || {
//!         for _ in 0..100 {
//!             cell.fetch_update(|v| v.wrapping_add_lo_sub_hi(1));
//!         }
//!     }));
//! }
//!
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//!
//! assert_eq!(cell.load(), Uint128::new(400, 400_u64.wrapping_neg()));
//! ```
//!
//! ## Author
//!
//! Haixing Hu

#![deny(missing_docs)]
#![deny(unsafe_op_in_unsafe_fn)]

#[cfg(not(target_pointer_width = "64"))]
compile_error!("prism3-rust-atomic128 requires a 64-bit target: a pointer pair must be exactly 128 bits");

pub mod atomic128;

// Re-export the public surface
pub use atomic128::{
    compare_and_swap_buffer,
    compare_and_swap_double_pointer,
    compare_and_swap_dynamic,
    compare_and_swap_uint128,
    is_lock_free,
    load_buffer,
    load_double_pointer,
    load_dynamic,
    load_uint128,
    store_buffer,
    store_double_pointer,
    store_dynamic,
    store_uint128,
    swap_buffer,
    swap_double_pointer,
    swap_dynamic,
    swap_uint128,
    try_compare_and_swap_buffer,
    try_compare_and_swap_double_pointer,
    try_compare_and_swap_dynamic,
    try_compare_and_swap_uint128,
    try_load_buffer,
    try_load_double_pointer,
    try_load_dynamic,
    try_load_uint128,
    try_store_buffer,
    try_store_double_pointer,
    try_store_dynamic,
    try_store_uint128,
    try_swap_buffer,
    try_swap_double_pointer,
    try_swap_dynamic,
    try_swap_uint128,
    Atomic,
    AtomicDoublePointer,
    AtomicDoubleWord,
    AtomicError,
    AtomicSlice,
    AtomicStr,
    AtomicUint128,
    AtomicValue,
    BufferDescriptor,
    DefaultBackend,
    DoublePointer,
    DoubleWord,
    DoubleWordBackend,
    DynamicValue,
    DynamicValueDescriptor,
    LockTableBackend,
    NativeBackend,
    Operation,
    TypeDescriptor,
    Uint128,
};
