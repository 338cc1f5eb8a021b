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
    compare_and_swap_dynamic,
    load_dynamic,
    store_dynamic,
    swap_dynamic,
    AtomicDoubleWord,
    DynamicValue,
    DynamicValueDescriptor,
    TypeDescriptor,
};
use std::sync::Arc;

fn sentinel() -> DynamicValueDescriptor {
    DynamicValueDescriptor {
        type_desc: 0x0ded_dead_beef_bee0 as *const TypeDescriptor,
        data: 0x0ded_dead_beef_bee0 as *const (),
    }
}

#[test]
fn test_type_descriptor_identifies_type() {
    let a = TypeDescriptor::of::<String>();
    let b = TypeDescriptor::of::<String>();
    let c = TypeDescriptor::of::<u64>();
    assert_eq!(a.type_id(), b.type_id());
    assert_ne!(a.type_id(), c.type_id());
    assert!(a.type_name().contains("String"));
}

#[test]
fn test_dynamic_value_downcasts() {
    let value = DynamicValue::new(vec![1_u8, 2, 3]);
    assert!(value.is::<Vec<u8>>());
    assert!(!value.is::<Vec<u16>>());
    assert_eq!(value.downcast_ref::<Vec<u8>>().map(Vec::len), Some(3));

    let arc = value.downcast::<Vec<u8>>().unwrap();
    assert_eq!(*arc, vec![1, 2, 3]);
}

#[test]
fn test_raw_operations_keep_guards() {
    let first = DynamicValue::new(1_u32);
    let second = DynamicValue::new(String::from("two"));
    let mut x = Guarded::new(DynamicValueDescriptor::EMPTY, sentinel());

    unsafe {
        store_dynamic(x.target(), first.as_descriptor());
        assert_eq!(load_dynamic(x.target()), first.as_descriptor());

        let old = swap_dynamic(x.target(), second.as_descriptor());
        assert_eq!(old, first.as_descriptor());

        assert!(!compare_and_swap_dynamic(
            x.target(),
            first.as_descriptor(),
            DynamicValueDescriptor::EMPTY
        ));
        assert!(compare_and_swap_dynamic(
            x.target(),
            second.as_descriptor(),
            DynamicValueDescriptor::EMPTY
        ));
        assert!(x.value.is_empty());
    }
    x.assert_guards();
}

#[test]
fn test_descriptor_cell_transfers_ownership() {
    let payload = Arc::new(String::from("owned"));
    let cell: AtomicDoubleWord<DynamicValueDescriptor> =
        AtomicDoubleWord::new(DynamicValue::from_arc(payload.clone()).into_descriptor());
    assert_eq!(Arc::strong_count(&payload), 2);

    let old = cell.swap(DynamicValueDescriptor::EMPTY);
    let value = unsafe { DynamicValue::from_descriptor(old) }.unwrap();
    assert_eq!(value.downcast_ref::<String>().map(String::as_str), Some("owned"));
    drop(value);
    assert_eq!(Arc::strong_count(&payload), 1);
    assert!(cell.load().is_empty());
}
