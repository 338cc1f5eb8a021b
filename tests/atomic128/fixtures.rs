/*******************************************************************************
 *
 *    Copyright (c) 2025.
 *    3-Prism Co. Ltd.
 *
 *    All rights reserved.
 *
 ******************************************************************************/

use prism3_atomic128::atomic128::{
    AtomicUint128,
    AtomicValue,
    DoubleWordBackend,
    Uint128,
};
use std::fmt::Debug;
use std::sync::Arc;
use std::thread;

/// Sentinel written around a target to detect out-of-bounds writes.
pub const MAGIC: Uint128 = Uint128::splat(0x0ded_dead_beef_beef);

/// Number of concurrent workers in hammer tests.
pub const WORKERS: usize = 4;

/// Iterations per hammer worker.
pub fn hammer_iterations() -> u64 {
    if cfg!(debug_assertions) {
        10_000
    } else {
        100_000
    }
}

/// Flushes deferred releases until `payload` is referenced only by the
/// caller, giving up after a bounded number of rounds.
pub fn wait_for_release<T>(boxed: &AtomicValue, payload: &Arc<T>) -> bool {
    for _ in 0..100_000 {
        if Arc::strong_count(payload) == 1 {
            return true;
        }
        boxed.reclaim();
        thread::yield_now();
    }
    Arc::strong_count(payload) == 1
}

/// A target embedded between two sentinels.
///
/// The fields are laid out back to back, so an operation that reads or
/// writes past the target's width lands in `before` or `after`.
#[repr(C)]
pub struct Guarded<T> {
    pub before: T,
    pub value: T,
    pub after: T,
    sentinel: T,
}

impl<T: Copy + PartialEq + Debug> Guarded<T> {
    pub fn new(value: T, sentinel: T) -> Self {
        Self {
            before: sentinel,
            value,
            after: sentinel,
            sentinel,
        }
    }

    pub fn target(&mut self) -> *mut T {
        &mut self.value
    }

    pub fn assert_guards(&self) {
        assert_eq!(self.before, self.sentinel, "wrong magic before target");
        assert_eq!(self.after, self.sentinel, "wrong magic after target");
    }
}

/// Board of the two-party store/load handshake.
///
/// Each party publishes a counter, reads the peer's counter, and
/// acknowledges what it read through a ring of three slots. The handshake
/// uses nothing but loads and stores on the cells under test.
pub struct Handshake<B: DoubleWordBackend> {
    published: [AtomicUint128<B>; 2],
    acks: [[AtomicUint128<B>; 3]; 2],
}

impl<B: DoubleWordBackend> Handshake<B> {
    /// Marker of an empty acknowledgement slot.
    pub const EMPTY_ACK: Uint128 = Uint128::MAX;

    pub fn new() -> Self {
        Self {
            published: std::array::from_fn(|_| AtomicUint128::new(Uint128::ZERO)),
            acks: std::array::from_fn(|_| {
                std::array::from_fn(|_| AtomicUint128::new(Self::EMPTY_ACK))
            }),
        }
    }

    /// Runs `rounds` rounds as party `me` (0 or 1).
    ///
    /// Returns the first violation observed, if any. The protocol keeps
    /// running after a violation so that the peer is never left waiting.
    pub fn run(&self, me: usize, rounds: u64) -> Option<String> {
        let he = 1 - me;
        let mut failure = None;
        for i in 1..rounds {
            let slot = (i % 3) as usize;
            let current = Uint128::splat(i);
            let previous = Uint128::splat(i - 1);

            self.published[me].store(current);
            let my = self.published[he].load();
            self.acks[me][slot].store(my);

            let mut spins: u64 = 1;
            while self.acks[he][slot].load() == Self::EMPTY_ACK {
                if spins % 1000 == 0 {
                    thread::yield_now();
                }
                spins += 1;
            }
            let his = self.acks[he][slot].load();

            if failure.is_none() {
                if (my != current && my != previous) || (his != current && his != previous) {
                    failure = Some(format!("invalid values: {my}/{his} ({i})"));
                } else if my != current && his != current {
                    failure = Some(format!(
                        "store/load are not sequentially consistent: {my}/{his} ({i})"
                    ));
                }
            }

            self.acks[me][((i - 1) % 3) as usize].store(Self::EMPTY_ACK);
        }
        failure
    }
}
