/*******************************************************************************
 *
 *    Copyright (c) 2025.
 *    3-Prism Co. Ltd.
 *
 *    All rights reserved.
 *
 ******************************************************************************/
//! # Versioned Pointer Example
//!
//! Demonstrates pairing a pointer with a version tag so that a
//! compare-and-swap rejects a stale expectation even when the pointer value
//! recurs.

use prism3_atomic128::{
    compare_and_swap_uint128,
    load_uint128,
    store_uint128,
    AtomicDoublePointer,
    DoublePointer,
    Uint128,
};
use std::sync::Arc;
use std::thread;

static SLOTS: [u64; 4] = [100, 200, 300, 400];

fn slot(index: usize) -> *mut u64 {
    &SLOTS[index] as *const u64 as *mut u64
}

fn tagged(index: usize, version: usize) -> DoublePointer {
    DoublePointer::new(slot(index), version as *mut ())
}

fn describe(pair: DoublePointer) -> String {
    let value = unsafe { *pair.first::<u64>() };
    format!("slot value {} at version {}", value, pair.second as usize)
}

fn main() {
    println!("=== Versioned Pointer Example ===\n");

    // Example 1: A stale expectation is rejected
    println!("1. Stale Expectation:");
    let current: AtomicDoublePointer = AtomicDoublePointer::new(tagged(0, 0));
    let stale = current.load();
    println!("   Observed: {}", describe(stale));

    current.store(tagged(1, 1));
    current.store(tagged(0, 2));
    println!("   Now:      {}", describe(current.load()));

    let exchanged = current.compare_and_swap(stale, tagged(3, 3));
    println!("   CAS with stale pair succeeded: {}", exchanged);

    // Example 2: Concurrent rotation with version bumps
    println!("\n2. Concurrent Rotation:");
    let current: Arc<AtomicDoublePointer> = Arc::new(AtomicDoublePointer::new(tagged(0, 0)));
    let threads = 4;
    let rotations_per_thread = 1000;
    let mut handles = vec![];

    for i in 0..threads {
        let current = current.clone();
        let handle = thread::spawn(move || {
            let mut retries = 0;
            for _ in 0..rotations_per_thread {
                loop {
                    let seen = current.load();
                    let index = SLOTS
                        .iter()
                        .position(|s| std::ptr::eq(s as *const u64, seen.first::<u64>() as *const u64))
                        .unwrap_or(0);
                    let next = tagged((index + 1) % SLOTS.len(), seen.second as usize + 1);
                    if current.compare_and_swap(seen, next) {
                        break;
                    }
                    retries += 1;
                }
            }
            println!("   Thread {} completed with {} retries", i, retries);
        });
        handles.push(handle);
    }

    for handle in handles {
        handle.join().unwrap();
    }

    let last = current.load();
    println!("   Final: {}", describe(last));
    println!(
        "   Expected version: {}, actual: {}",
        threads * rotations_per_thread,
        last.second as usize
    );

    // Example 3: Raw free functions on a caller-owned location
    println!("\n3. Raw Location:");
    let mut counter = Uint128::new(0, 0);
    let location: *mut Uint128 = &mut counter;
    unsafe {
        store_uint128(location, Uint128::new(7, 1));
        let seen = load_uint128(location);
        let bumped = Uint128::new(seen.lo * 2, seen.hi + 1);
        println!(
            "   CAS {} -> {}: {}",
            seen,
            bumped,
            compare_and_swap_uint128(location, seen, bumped)
        );
    }
    println!("   Counter: {}", counter);

    println!("\n=== Example completed ===");
}
