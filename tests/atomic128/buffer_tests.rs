/*******************************************************************************
 *
 *    Copyright (c) 2025.
 *    3-Prism Co. Ltd.
 *
 *    All rights reserved.
 *
 ******************************************************************************/

use super::fixtures::Guarded;
use prism3_atomic128::atomic128::{
    compare_and_swap_buffer,
    load_buffer,
    store_buffer,
    swap_buffer,
    Atomic,
    AtomicSlice,
    AtomicStr,
    BufferDescriptor,
    LockTableBackend,
};
use std::sync::{
    Arc,
    Barrier,
};
use std::thread;

static WORDS: [&str; 5] = ["a", "bb", "cccc", "dddddddd", "eeeeeeeeeeeeeeee"];

fn sentinel() -> BufferDescriptor {
    BufferDescriptor {
        data: 0x0ded_dead_beef_bee0 as *const u8,
        len: 0x0ded_dead_beef_beef,
    }
}

#[test]
fn test_raw_operations_keep_guards() {
    let short = b"abc";
    let long = b"abcdefgh";
    let mut x = Guarded::new(BufferDescriptor::EMPTY, sentinel());

    unsafe {
        store_buffer(x.target(), BufferDescriptor::of_slice(short));
        assert_eq!(load_buffer(x.target()).as_slice::<u8>(), short);

        let old = swap_buffer(x.target(), BufferDescriptor::of_slice(long));
        assert_eq!(old.as_slice::<u8>(), short);
        assert_eq!(x.value.len, 8);

        assert!(!compare_and_swap_buffer(
            x.target(),
            BufferDescriptor::of_slice(short),
            BufferDescriptor::EMPTY
        ));
        assert!(compare_and_swap_buffer(
            x.target(),
            BufferDescriptor::of_slice(long),
            BufferDescriptor::EMPTY
        ));
        assert!(x.value.as_slice::<u8>().is_empty());
    }
    x.assert_guards();
}

#[test]
fn test_empty_descriptor_views() {
    let empty = BufferDescriptor::default();
    assert!(empty.is_empty());
    unsafe {
        assert!(empty.as_slice::<u64>().is_empty());
        assert_eq!(empty.as_str(), "");
    }
}

#[test]
fn test_slice_swap_and_load() {
    let first = vec![1_u32, 2, 3];
    let second = vec![4_u32, 5];
    let atomic: AtomicSlice<u32> = AtomicSlice::new(&first[..]);

    assert_eq!(atomic.load(), &[1, 2, 3]);
    let old = atomic.swap(&second);
    assert_eq!(old, &[1, 2, 3]);
    assert_eq!(atomic.load(), &[4, 5]);

    atomic.store(&first[1..]);
    assert_eq!(atomic.load(), &[2, 3]);
}

#[test]
fn test_slice_compare_and_swap_is_by_identity() {
    let original = vec![7_u8; 4];
    let equal_contents = vec![7_u8; 4];
    let replacement = vec![9_u8; 2];
    let atomic: AtomicSlice<u8> = AtomicSlice::new(&original[..]);

    assert!(!atomic.compare_and_swap(&equal_contents, &replacement));
    assert_eq!(atomic.load().as_ptr(), original.as_ptr());

    // Same address, different length is a different slice.
    assert!(!atomic.compare_and_swap(&original[..2], &replacement));

    assert!(atomic.compare_and_swap(&original, &replacement));
    assert_eq!(atomic.load(), &[9, 9]);
}

#[test]
fn test_slice_fetch_update() {
    let data = [1_i64, 2, 3, 4, 5];
    let atomic: AtomicSlice<i64> = AtomicSlice::new(&data[..]);
    let old = atomic.fetch_update(|s| &s[1..]);
    assert_eq!(old.len(), 5);
    assert_eq!(atomic.load(), &[2, 3, 4, 5]);
}

#[test]
fn test_str_operations() {
    let atomic: AtomicStr = AtomicStr::default();
    assert_eq!(atomic.load(), "");

    atomic.store("hello");
    assert_eq!(atomic.swap("world"), "hello");
    assert_eq!(atomic.to_string(), "world");

    let current = atomic.load();
    assert!(atomic.compare_and_swap(current, "again"));
    assert_eq!(atomic.fetch_update(|s| &s[1..]), "again");
    assert_eq!(atomic.load(), "gain");
}

#[test]
fn test_atomic_trait_on_str() {
    fn rotate<A: Atomic<Value = &'static str>>(atomic: &A) -> &'static str {
        atomic.swap("rotated")
    }

    let atomic = AtomicStr::<LockTableBackend>::new("initial");
    assert_eq!(rotate(&atomic), "initial");
    assert_eq!(Atomic::load(&atomic), "rotated");
}

// Every word is one repeated letter whose count is fixed per letter, so a
// reader that pairs the pointer of one word with the length of another
// sees a wrong length for that letter.
#[test]
fn test_hammer_str_never_mismatches_length() {
    const WORKERS: usize = 4;
    const ITERATIONS: usize = 20_000;

    fn check(word: &str) {
        let letter = word.as_bytes()[0];
        let expected = 1 << (letter - b'a');
        assert_eq!(word.len(), expected, "pointer/length pair torn: {word:?}");
        assert!(word.bytes().all(|b| b == letter));
    }

    let atomic: Arc<AtomicStr<'static>> = Arc::new(AtomicStr::new(WORDS[0]));
    let barrier = Arc::new(Barrier::new(WORKERS));
    let mut handles = vec![];

    for worker in 0..WORKERS {
        let atomic = atomic.clone();
        let barrier = barrier.clone();
        let handle = thread::spawn(move || {
            barrier.wait();
            for i in 0..ITERATIONS {
                let word = WORDS[(worker + i) % WORDS.len()];
                if i % 2 == 0 {
                    check(atomic.swap(word));
                } else {
                    atomic.store(word);
                    check(atomic.load());
                }
            }
        });
        handles.push(handle);
    }

    for handle in handles {
        handle.join().unwrap();
    }
    check(atomic.load());
}
