/*******************************************************************************
 *
 *    Copyright (c) 2025.
 *    3-Prism Co. Ltd.
 *
 *    All rights reserved.
 *
 ******************************************************************************/

//! # Double-Word Atomic Errors
//!
//! Error taxonomy for the raw-pointer entry points. A compare-and-swap
//! mismatch is not an error; it is reported through the boolean result.
//!
//! # Author
//!
//! Haixing Hu

use std::fmt;

use thiserror::Error;

/// The double-word operation that raised an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Atomic exchange.
    Swap,
    /// Atomic compare-and-swap.
    CompareAndSwap,
    /// Atomic load.
    Load,
    /// Atomic store.
    Store,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Swap => "Swap",
            Operation::CompareAndSwap => "CompareAndSwap",
            Operation::Load => "Load",
            Operation::Store => "Store",
        };
        f.write_str(name)
    }
}

/// Errors reported by the `try_*` double-word operations.
///
/// Both variants are detected before the target location is touched, so a
/// failed operation never leaves memory partially modified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AtomicError {
    /// The target location was a null pointer.
    #[error("{operation}: null double-word location")]
    NullLocation {
        /// The operation that was attempted.
        operation: Operation,
    },

    /// The target location was not aligned to the full double-word width.
    #[error("{operation}: location {address:#x} is not aligned to {required} bytes")]
    Misaligned {
        /// The operation that was attempted.
        operation: Operation,
        /// The offending address.
        address: usize,
        /// The required alignment in bytes.
        required: usize,
    },
}

impl AtomicError {
    /// Returns the operation that raised this error.
    #[inline]
    pub fn operation(&self) -> Operation {
        match *self {
            AtomicError::NullLocation { operation } => operation,
            AtomicError::Misaligned { operation, .. } => operation,
        }
    }
}

/// Reports a precondition violation upward as a panic.
///
/// The error is logged first so a fault that is later swallowed by a
/// `catch_unwind` boundary still leaves a trace.
#[cold]
#[inline(never)]
#[track_caller]
pub(crate) fn fault(err: AtomicError) -> ! {
    tracing::error!(operation = %err.operation(), error = %err, "double-word atomic fault");
    panic!("{err}");
}
