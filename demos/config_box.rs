/*******************************************************************************
 *
 *    Copyright (c) 2025.
 *    3-Prism Co. Ltd.
 *
 *    All rights reserved.
 *
 ******************************************************************************/
//! # Configuration Box Example
//!
//! Demonstrates hot-swapping a shared configuration through an
//! `AtomicValue` while readers keep working.

use prism3_atomic128::{
    AtomicStr,
    AtomicValue,
    DynamicValue,
};
use std::sync::atomic::{
    AtomicBool,
    Ordering,
};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Debug)]
struct Config {
    version: u32,
    name: String,
    value: i32,
}

fn main() {
    println!("=== Configuration Box Example ===\n");

    // Example 1: Basic box operations
    println!("1. Basic Box Operations:");
    let config: AtomicValue = AtomicValue::new();
    println!("   Empty box loads: {:?}", config.load());

    config.store(DynamicValue::new(Config {
        version: 1,
        name: "initial".to_string(),
        value: 100,
    }));
    if let Some(current) = config.load() {
        println!("   Loaded: {:?}", current.downcast_ref::<Config>());
    }

    // Example 2: Compare-and-swap against the loaded value
    println!("\n2. Compare-and-Swap:");
    let observed = config.load();
    let next = DynamicValue::new(Config {
        version: 2,
        name: "updated".to_string(),
        value: 200,
    });
    let exchanged = config.compare_and_swap(observed.as_ref(), next);
    println!("   CAS succeeded: {}", exchanged);
    let retry = DynamicValue::new(Config {
        version: 3,
        name: "late".to_string(),
        value: 300,
    });
    println!(
        "   CAS with the old observation succeeded: {}",
        config.compare_and_swap(observed.as_ref(), retry)
    );

    // Example 3: Readers keep running while a writer swaps configs
    println!("\n3. Hot Swap Under Load:");
    let config: Arc<AtomicValue> = Arc::new(AtomicValue::with_value(DynamicValue::new(Config {
        version: 0,
        name: "shared".to_string(),
        value: 0,
    })));
    let running = Arc::new(AtomicBool::new(true));
    let mut readers = vec![];

    for i in 0..4 {
        let config = config.clone();
        let running = running.clone();
        readers.push(thread::spawn(move || {
            let mut reads = 0u64;
            let mut highest = 0u32;
            let mut latest = String::new();
            while running.load(Ordering::Relaxed) {
                if let Some(current) = config.load() {
                    if let Some(c) = current.downcast_ref::<Config>() {
                        if c.value != c.version as i32 * 10 {
                            println!("   Reader {} saw an inconsistent config: {:?}", i, c);
                        }
                        if c.version > highest {
                            highest = c.version;
                            latest = c.name.clone();
                        }
                        reads += 1;
                    }
                }
            }
            println!(
                "   Reader {} did {} reads, latest seen: {} (version {})",
                i, reads, latest, highest
            );
        }));
    }

    for version in 1..=10 {
        config.store(DynamicValue::new(Config {
            version,
            name: format!("rev-{}", version),
            value: version as i32 * 10,
        }));
        thread::sleep(Duration::from_millis(5));
    }
    running.store(false, Ordering::Relaxed);

    for reader in readers {
        reader.join().unwrap();
    }

    // Replaced configs are released as the epoch advances; no exclusive
    // access to the shared box is needed.
    config.reclaim();
    if let Some(last) = config.load() {
        println!("   Final config: {:?}", last.downcast_ref::<Config>());
    }

    // Example 4: An atomic string label
    println!("\n4. Atomic Label:");
    let label: AtomicStr = AtomicStr::new("blue");
    let previous = label.swap("green");
    println!("   Swapped {} for {}", previous, label);

    println!("\n=== Example completed ===");
}
