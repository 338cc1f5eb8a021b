/*******************************************************************************
 *
 *    Copyright (c) 2025.
 *    3-Prism Co. Ltd.
 *
 *    All rights reserved.
 *
 ******************************************************************************/

//! # Dynamic Values
//!
//! A dynamically-typed value reference is a pair of words: the address of a
//! static type descriptor and the address of the payload. Updating the two
//! words separately would let a reader pair the type tag of one value with
//! the payload of another, so both words are always swapped as one
//! [`DynamicValueDescriptor`].
//!
//! Payloads are reference counted with `Arc`. The type descriptor carries
//! the functions that retain and release the payload, so a descriptor can
//! be cloned or dropped without knowing its static type.
//!
//! # Author
//!
//! Haixing Hu

use std::any::{self, Any, TypeId};
use std::fmt;
use std::marker::PhantomData;
use std::mem;
use std::ptr::{self, NonNull};
use std::sync::Arc;

use crate::atomic128::traits::{pack_halves, unpack_halves, DoubleWord};

/// Static description of a payload type.
///
/// One descriptor exists per payload type, although the compiler may emit
/// more than one copy; compare types with [`type_id`](Self::type_id), not by
/// descriptor address.
///
/// # Author
///
/// Haixing Hu
pub struct TypeDescriptor {
    type_id: fn() -> TypeId,
    type_name: fn() -> &'static str,
    retain: unsafe fn(*const ()),
    release: unsafe fn(*const ()),
}

impl TypeDescriptor {
    /// Returns the descriptor of `T`.
    #[inline]
    pub fn of<T: Any + Send + Sync>() -> &'static TypeDescriptor {
        DescriptorOf::<T>::DESCRIPTOR
    }

    /// Returns the `TypeId` of the described type.
    #[inline]
    pub fn type_id(&self) -> TypeId {
        (self.type_id)()
    }

    /// Returns the name of the described type.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        (self.type_name)()
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("type_name", &self.type_name())
            .finish()
    }
}

struct DescriptorOf<T>(PhantomData<T>);

impl<T: Any + Send + Sync> DescriptorOf<T> {
    const DESCRIPTOR: &'static TypeDescriptor = &TypeDescriptor {
        type_id: TypeId::of::<T>,
        type_name: any::type_name::<T>,
        retain: retain_arc::<T>,
        release: release_arc::<T>,
    };
}

unsafe fn retain_arc<T>(data: *const ()) {
    unsafe { Arc::increment_strong_count(data.cast::<T>()) }
}

unsafe fn release_arc<T>(data: *const ()) {
    unsafe { Arc::decrement_strong_count(data.cast::<T>()) }
}

/// Two-word representation of a dynamic value reference.
///
/// Both words null means "no value". The descriptor itself owns nothing;
/// ownership is tracked by [`DynamicValue`].
///
/// # Author
///
/// Haixing Hu
#[repr(C, align(16))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DynamicValueDescriptor {
    /// Address of the payload's [`TypeDescriptor`].
    pub type_desc: *const TypeDescriptor,
    /// Address of the payload.
    pub data: *const (),
}

impl DynamicValueDescriptor {
    /// The descriptor of no value.
    pub const EMPTY: Self = Self {
        type_desc: ptr::null(),
        data: ptr::null(),
    };

    /// Returns `true` if this descriptor refers to no value.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.type_desc.is_null()
    }
}

impl Default for DynamicValueDescriptor {
    #[inline]
    fn default() -> Self {
        Self::EMPTY
    }
}

unsafe impl DoubleWord for DynamicValueDescriptor {
    #[inline]
    fn into_bits(self) -> u128 {
        pack_halves(self.type_desc as usize as u64, self.data as usize as u64)
    }

    #[inline]
    fn from_bits(bits: u128) -> Self {
        let (type_desc, data) = unpack_halves(bits);
        Self {
            type_desc: type_desc as usize as *const TypeDescriptor,
            data: data as usize as *const (),
        }
    }
}

impl_facade_ops!(
    DynamicValueDescriptor,
    "`DynamicValueDescriptor`",
    swap: swap_dynamic,
    compare_and_swap: compare_and_swap_dynamic,
    load: load_dynamic,
    store: store_dynamic,
    try_swap: try_swap_dynamic,
    try_compare_and_swap: try_compare_and_swap_dynamic,
    try_load: try_load_dynamic,
    try_store: try_store_dynamic,
);

/// An owned, reference-counted value of any `Send + Sync` type.
///
/// Cloning shares the payload. The value can be turned into a
/// [`DynamicValueDescriptor`] and back without losing its reference.
///
/// # Example
///
/// ```rust
/// use prism3_atomic128::DynamicValue;
///
/// let value = DynamicValue::new(String::from("hello"));
/// assert!(value.is::<String>());
/// assert_eq!(value.downcast_ref::<String>().map(String::as_str), Some("hello"));
/// assert!(value.downcast_ref::<u32>().is_none());
/// ```
///
/// # Author
///
/// Haixing Hu
pub struct DynamicValue {
    type_desc: &'static TypeDescriptor,
    data: NonNull<()>,
}

// SAFETY: construction requires `T: Send + Sync`, and the payload is only
// ever shared through `Arc`.
unsafe impl Send for DynamicValue {}
unsafe impl Sync for DynamicValue {}

impl DynamicValue {
    /// Wraps `value` in a new reference-counted payload.
    #[inline]
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self::from_arc(Arc::new(value))
    }

    /// Wraps an existing `Arc`, sharing its payload.
    #[inline]
    pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        let raw = Arc::into_raw(value) as *mut ();
        Self {
            type_desc: TypeDescriptor::of::<T>(),
            // SAFETY: `Arc::into_raw` never returns null.
            data: unsafe { NonNull::new_unchecked(raw) },
        }
    }

    /// Returns `true` if the payload is a `T`.
    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.type_desc.type_id() == TypeId::of::<T>()
    }

    /// Returns a reference to the payload if it is a `T`.
    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        if self.is::<T>() {
            // SAFETY: the type check proves `data` came from an `Arc<T>`.
            Some(unsafe { &*self.data.as_ptr().cast::<T>() })
        } else {
            None
        }
    }

    /// Converts back into the typed `Arc` if the payload is a `T`.
    ///
    /// Returns `self` unchanged on a type mismatch.
    #[inline]
    pub fn downcast<T: Any + Send + Sync>(self) -> Result<Arc<T>, Self> {
        if !self.is::<T>() {
            return Err(self);
        }
        let data = self.data;
        mem::forget(self);
        Ok(unsafe { Arc::from_raw(data.as_ptr().cast::<T>()) })
    }

    /// Returns the name of the payload type.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_desc.type_name()
    }

    /// Returns the payload's type descriptor.
    #[inline]
    pub fn type_descriptor(&self) -> &'static TypeDescriptor {
        self.type_desc
    }

    /// Returns `true` if both values share the same payload.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.data == other.data && self.type_desc.type_id() == other.type_desc.type_id()
    }

    /// Returns the descriptor of this value without giving up ownership.
    #[inline]
    pub fn as_descriptor(&self) -> DynamicValueDescriptor {
        DynamicValueDescriptor {
            type_desc: self.type_desc,
            data: self.data.as_ptr(),
        }
    }

    /// Converts into a descriptor that carries this value's reference.
    ///
    /// The reference is leaked unless the descriptor is later passed to
    /// [`from_descriptor`](Self::from_descriptor).
    #[inline]
    pub fn into_descriptor(self) -> DynamicValueDescriptor {
        let desc = self.as_descriptor();
        mem::forget(self);
        desc
    }

    /// Takes over the reference carried by `desc`.
    ///
    /// Returns `None` for the empty descriptor.
    ///
    /// # Safety
    ///
    /// A non-empty `desc` must come from
    /// [`into_descriptor`](Self::into_descriptor) and its reference must not
    /// have been taken over already.
    #[inline]
    pub unsafe fn from_descriptor(desc: DynamicValueDescriptor) -> Option<Self> {
        if desc.is_empty() {
            return None;
        }
        Some(Self {
            type_desc: unsafe { &*desc.type_desc },
            data: unsafe { NonNull::new_unchecked(desc.data as *mut ()) },
        })
    }

    /// Creates a new reference to the value described by `desc`.
    ///
    /// Returns `None` for the empty descriptor.
    ///
    /// # Safety
    ///
    /// A non-empty `desc` must describe a value whose payload is kept alive
    /// by some other reference for the duration of this call.
    #[inline]
    pub unsafe fn clone_from_descriptor(desc: DynamicValueDescriptor) -> Option<Self> {
        if desc.is_empty() {
            return None;
        }
        let type_desc = unsafe { &*desc.type_desc };
        unsafe { (type_desc.retain)(desc.data) };
        unsafe { Self::from_descriptor(desc) }
    }
}

impl Clone for DynamicValue {
    #[inline]
    fn clone(&self) -> Self {
        unsafe { (self.type_desc.retain)(self.data.as_ptr()) };
        Self {
            type_desc: self.type_desc,
            data: self.data,
        }
    }
}

impl Drop for DynamicValue {
    #[inline]
    fn drop(&mut self) {
        unsafe { (self.type_desc.release)(self.data.as_ptr()) };
    }
}

impl fmt::Debug for DynamicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicValue")
            .field("type", &self.type_name())
            .field("data", &self.data)
            .finish()
    }
}
