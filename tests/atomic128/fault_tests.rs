/*******************************************************************************
 *
 *    Copyright (c) 2025.
 *    3-Prism Co. Ltd.
 *
 *    All rights reserved.
 *
 ******************************************************************************/

use prism3_atomic128::atomic128::{
    compare_and_swap_buffer,
    compare_and_swap_double_pointer,
    compare_and_swap_dynamic,
    compare_and_swap_uint128,
    load_buffer,
    load_double_pointer,
    load_dynamic,
    load_uint128,
    ops,
    store_buffer,
    store_double_pointer,
    store_dynamic,
    store_uint128,
    swap_buffer,
    swap_double_pointer,
    swap_dynamic,
    swap_uint128,
    try_compare_and_swap_uint128,
    try_load_buffer,
    try_load_uint128,
    try_store_dynamic,
    try_store_uint128,
    try_swap_double_pointer,
    try_swap_uint128,
    AtomicError,
    AtomicUint128,
    AtomicValue,
    BufferDescriptor,
    DoublePointer,
    DynamicValue,
    DynamicValueDescriptor,
    LockTableBackend,
    Operation,
    Uint128,
};
use super::fixtures::wait_for_release;
use std::panic;
use std::ptr;
use std::sync::Arc;

/// Runs `f`, expecting it to fault, and returns the panic message.
fn expect_fault(f: fn()) -> String {
    let payload = panic::catch_unwind(f).expect_err("operation on a null location must fault");
    payload
        .downcast_ref::<String>()
        .cloned()
        .unwrap_or_default()
}

/// Exercises the reclamation path and a shared cell after a fault.
fn reclamation_pass(shared: &AtomicUint128) {
    let payload = Arc::new(0_u64);
    let boxed: AtomicValue = AtomicValue::new();
    for _ in 0..15 {
        boxed.store(DynamicValue::from_arc(payload.clone()));
    }
    boxed.store(DynamicValue::new(15_u64));
    assert!(wait_for_release(&boxed, &payload));
    assert_eq!(boxed.load().unwrap().downcast_ref::<u64>(), Some(&15));
    drop(boxed);

    assert_eq!(shared.load(), Uint128::new(1, 2));
}

#[test]
fn test_null_uint128_faults() {
    let shared: AtomicUint128 = AtomicUint128::new(Uint128::new(1, 2));
    let faults: [fn(); 4] = [
        || {
            let _ = unsafe { compare_and_swap_uint128(ptr::null_mut(), Uint128::ZERO, Uint128::ZERO) };
        },
        || {
            let _ = unsafe { swap_uint128(ptr::null_mut(), Uint128::ZERO) };
        },
        || {
            let _ = unsafe { load_uint128(ptr::null_mut()) };
        },
        || unsafe { store_uint128(ptr::null_mut(), Uint128::ZERO) },
    ];

    for f in faults {
        let message = expect_fault(f);
        assert!(
            message.contains("null double-word location"),
            "unexpected fault message: {message}"
        );
        reclamation_pass(&shared);
    }
}

#[test]
fn test_null_facade_faults() {
    let shared: AtomicUint128 = AtomicUint128::new(Uint128::new(1, 2));
    let faults: [fn(); 12] = [
        || {
            let _ = unsafe { swap_double_pointer(ptr::null_mut(), DoublePointer::null()) };
        },
        || {
            let _ = unsafe {
                compare_and_swap_double_pointer(ptr::null_mut(), DoublePointer::null(), DoublePointer::null())
            };
        },
        || {
            let _ = unsafe { load_double_pointer(ptr::null_mut()) };
        },
        || unsafe { store_double_pointer(ptr::null_mut(), DoublePointer::null()) },
        || {
            let _ = unsafe { swap_buffer(ptr::null_mut(), BufferDescriptor::EMPTY) };
        },
        || {
            let _ = unsafe {
                compare_and_swap_buffer(ptr::null_mut(), BufferDescriptor::EMPTY, BufferDescriptor::EMPTY)
            };
        },
        || {
            let _ = unsafe { load_buffer(ptr::null_mut()) };
        },
        || unsafe { store_buffer(ptr::null_mut(), BufferDescriptor::EMPTY) },
        || {
            let _ = unsafe { swap_dynamic(ptr::null_mut(), DynamicValueDescriptor::EMPTY) };
        },
        || {
            let _ = unsafe {
                compare_and_swap_dynamic(
                    ptr::null_mut(),
                    DynamicValueDescriptor::EMPTY,
                    DynamicValueDescriptor::EMPTY,
                )
            };
        },
        || {
            let _ = unsafe { load_dynamic(ptr::null_mut()) };
        },
        || unsafe { store_dynamic(ptr::null_mut(), DynamicValueDescriptor::EMPTY) },
    ];

    for f in faults {
        expect_fault(f);
        reclamation_pass(&shared);
    }
}

#[test]
fn test_try_variants_report_null_location() {
    let null = ptr::null_mut();
    assert_eq!(
        unsafe { try_swap_uint128(null, Uint128::ZERO) },
        Err(AtomicError::NullLocation {
            operation: Operation::Swap
        })
    );
    assert_eq!(
        unsafe { try_compare_and_swap_uint128(null, Uint128::ZERO, Uint128::MAX) },
        Err(AtomicError::NullLocation {
            operation: Operation::CompareAndSwap
        })
    );
    assert_eq!(
        unsafe { try_load_uint128(null) },
        Err(AtomicError::NullLocation {
            operation: Operation::Load
        })
    );
    assert_eq!(
        unsafe { try_store_uint128(null, Uint128::ZERO) },
        Err(AtomicError::NullLocation {
            operation: Operation::Store
        })
    );
    assert!(matches!(
        unsafe { try_swap_double_pointer(ptr::null_mut(), DoublePointer::null()) },
        Err(AtomicError::NullLocation { .. })
    ));
    assert!(matches!(
        unsafe { try_load_buffer(ptr::null_mut()) },
        Err(AtomicError::NullLocation { .. })
    ));
    assert!(matches!(
        unsafe { try_store_dynamic(ptr::null_mut(), DynamicValueDescriptor::EMPTY) },
        Err(AtomicError::NullLocation { .. })
    ));
}

#[test]
fn test_misaligned_location_is_rejected_untouched() {
    #[repr(C, align(16))]
    struct Words([u64; 4]);

    let mut words = Words([7, 7, 7, 7]);
    let misaligned = unsafe { words.0.as_mut_ptr().add(1) }.cast::<Uint128>();

    match unsafe { try_store_uint128(misaligned, Uint128::ZERO) } {
        Err(AtomicError::Misaligned {
            operation,
            address,
            required,
        }) => {
            assert_eq!(operation, Operation::Store);
            assert_eq!(address, misaligned as usize);
            assert_eq!(required, 16);
        }
        other => panic!("expected a misalignment error, got {other:?}"),
    }
    assert_eq!(words.0, [7, 7, 7, 7]);

    let result = panic::catch_unwind(move || {
        let _ = unsafe { load_uint128(misaligned) };
    });
    assert!(result.is_err());
}

#[test]
fn test_lock_table_usable_after_fault() {
    let result = panic::catch_unwind(|| {
        let _ = unsafe { ops::swap::<LockTableBackend, Uint128>(ptr::null_mut(), Uint128::MAX) };
    });
    assert!(result.is_err());

    let cell = AtomicUint128::<LockTableBackend>::new(Uint128::new(3, 4));
    assert_eq!(cell.swap(Uint128::new(5, 6)), Uint128::new(3, 4));
    assert!(cell.compare_and_swap(Uint128::new(5, 6), Uint128::ZERO));
    assert_eq!(cell.load(), Uint128::ZERO);
}
