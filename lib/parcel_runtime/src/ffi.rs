//! C functions called by the generated bindings.
//!
//! A handle is a raw `Obj`. Functions documented to "take" a handle consume
//! one reference of it; functions returning a "new" handle give one to the
//! caller; "borrowed" handles are valid while their owner keeps them.
#![allow(non_snake_case)]
use crate::hash::Hash;
use crate::obj::{Obj, ObjBody};
use crate::vector::Vector;
use std::alloc::{alloc_zeroed, dealloc, Layout};
use std::ffi::{c_char, c_void, CStr};
use std::mem::ManuallyDrop;
use std::rc::Rc;

pub type Handle = *const ObjBody;

/// Bytes reserved before each allocation to remember its size
const ALLOC_HEADER: usize = 16;

fn into_handle(obj: Obj) -> Handle {
    Rc::into_raw(obj.0)
}

fn value_into_handle(value: Option<Obj>) -> Handle {
    value.map(into_handle).unwrap_or(std::ptr::null())
}

/// Take over one reference of `h`
unsafe fn take(h: Handle) -> Option<Obj> {
    if h.is_null() {
        None
    } else {
        Some(Obj(Rc::from_raw(h)))
    }
}

/// Use `h` without changing its refcount
unsafe fn borrow<R>(h: Handle, f: impl FnOnce(&Obj) -> R) -> Option<R> {
    if h.is_null() {
        return None;
    }
    let obj = ManuallyDrop::new(Obj(Rc::from_raw(h)));
    Some(f(&obj))
}

fn borrowed_handle(value: Option<&Option<Obj>>) -> Handle {
    match value {
        Some(Some(obj)) => Rc::as_ptr(&obj.0),
        _ => std::ptr::null(),
    }
}

#[no_mangle]
pub extern "C" fn pcl_handle_incref(h: Handle) -> Handle {
    if !h.is_null() {
        unsafe { Rc::increment_strong_count(h) };
    }
    h
}

/// Returns the refcount after the decrement
#[no_mangle]
pub extern "C" fn pcl_handle_decref(h: Handle) -> u32 {
    match unsafe { take(h) } {
        Some(obj) => {
            let remaining = obj.refcount() - 1;
            drop(obj);
            remaining as u32
        }
        None => 0,
    }
}

#[no_mangle]
pub extern "C" fn pcl_handle_refcount(h: Handle) -> u32 {
    unsafe { borrow(h, |obj| obj.refcount() as u32) }.unwrap_or(0)
}

#[no_mangle]
pub extern "C" fn pcl_handle_kind(h: Handle) -> u32 {
    unsafe { borrow(h, |obj| obj.kind().code()) }.unwrap_or(u32::MAX)
}

// String

/// Returns a new string. Invalid UTF-8 is replaced.
#[no_mangle]
pub extern "C" fn pcl_String_new(ptr: *const c_char, size: usize) -> Handle {
    let bytes = if ptr.is_null() {
        &[][..]
    } else {
        unsafe { std::slice::from_raw_parts(ptr as *const u8, size) }
    };
    into_handle(Obj::string(String::from_utf8_lossy(bytes)))
}

/// Pointer to the bytes of the string (not NUL-terminated)
#[no_mangle]
pub extern "C" fn pcl_String_Get_Ptr(h: Handle) -> *const c_char {
    unsafe { borrow(h, |obj| obj.as_str().map(|s| s.as_ptr() as *const c_char)) }
        .flatten()
        .unwrap_or(std::ptr::null())
}

#[no_mangle]
pub extern "C" fn pcl_String_Get_Size(h: Handle) -> usize {
    unsafe { borrow(h, |obj| obj.as_str().map(|s| s.len())) }
        .flatten()
        .unwrap_or(0)
}

// Numbers

#[no_mangle]
pub extern "C" fn pcl_Integer_new(value: i64) -> Handle {
    into_handle(Obj::integer(value))
}

#[no_mangle]
pub extern "C" fn pcl_Integer_Get_Value(h: Handle) -> i64 {
    unsafe {
        borrow(h, |obj| match obj.body() {
            ObjBody::Integer(i) => *i,
            ObjBody::Float(f) => *f as i64,
            _ => 0,
        })
    }
    .unwrap_or(0)
}

#[no_mangle]
pub extern "C" fn pcl_Float_new(value: f64) -> Handle {
    into_handle(Obj::float(value))
}

#[no_mangle]
pub extern "C" fn pcl_Float_Get_Value(h: Handle) -> f64 {
    unsafe {
        borrow(h, |obj| match obj.body() {
            ObjBody::Float(f) => *f,
            ObjBody::Integer(i) => *i as f64,
            _ => 0.0,
        })
    }
    .unwrap_or(0.0)
}

#[no_mangle]
pub extern "C" fn pcl_Boolean_new(value: bool) -> Handle {
    into_handle(Obj::boolean(value))
}

#[no_mangle]
pub extern "C" fn pcl_Boolean_Get_Value(h: Handle) -> bool {
    unsafe { borrow(h, |obj| matches!(obj.body(), ObjBody::Boolean(true))) }.unwrap_or(false)
}

// Hash

#[no_mangle]
pub extern "C" fn pcl_Hash_new(capacity: usize) -> Handle {
    into_handle(Obj::hash(Hash::with_capacity(capacity)))
}

/// Takes `key` and `value`. A NULL value stores the sentinel. A key which
/// is not a string is dropped along with the value.
#[no_mangle]
pub extern "C" fn pcl_Hash_Store(h: Handle, key: Handle, value: Handle) {
    let (key, value) = unsafe { (take(key), take(value)) };
    let Some(key) = key else {
        log::error!("pcl_Hash_Store: NULL key");
        return;
    };
    if key.as_str().is_none() {
        log::error!("pcl_Hash_Store: {} key is dropped (keys must be strings)", key.kind());
        return;
    }
    let stored = unsafe {
        borrow(h, |obj| {
            let result = obj
                .as_hash()
                .and_then(|hash| hash.borrow_mut().store(key, value));
            if let Err(e) = &result {
                log::error!("pcl_Hash_Store: {}", e);
            }
        })
    };
    if stored.is_none() {
        log::error!("pcl_Hash_Store: NULL hash");
    }
}

/// Returns a borrowed value, or NULL if absent or the sentinel
#[no_mangle]
pub extern "C" fn pcl_Hash_Fetch(h: Handle, key: Handle) -> Handle {
    unsafe {
        borrow(h, |obj| {
            borrow(key, |key| {
                obj.as_hash()
                    .map(|hash| borrowed_handle(hash.borrow().fetch(key)))
                    .unwrap_or(std::ptr::null())
            })
        })
    }
    .flatten()
    .unwrap_or(std::ptr::null())
}

/// Returns the removed value as a new handle
#[no_mangle]
pub extern "C" fn pcl_Hash_Delete(h: Handle, key: Handle) -> Handle {
    unsafe {
        borrow(h, |obj| {
            borrow(key, |key| match obj.as_hash() {
                Ok(hash) => value_into_handle(hash.borrow_mut().delete(key).flatten()),
                Err(_) => std::ptr::null(),
            })
        })
    }
    .flatten()
    .unwrap_or(std::ptr::null())
}

#[no_mangle]
pub extern "C" fn pcl_Hash_Has_Key(h: Handle, key: Handle) -> bool {
    unsafe {
        borrow(h, |obj| {
            borrow(key, |key| {
                obj.as_hash()
                    .map(|hash| hash.borrow().has_key(key))
                    .unwrap_or(false)
            })
        })
    }
    .flatten()
    .unwrap_or(false)
}

#[no_mangle]
pub extern "C" fn pcl_Hash_Get_Size(h: Handle) -> usize {
    unsafe { borrow(h, |obj| obj.as_hash().map(|hash| hash.borrow().size()).unwrap_or(0)) }
        .unwrap_or(0)
}

/// Returns the keys as a new vector
#[no_mangle]
pub extern "C" fn pcl_Hash_Keys(h: Handle) -> Handle {
    let keys = unsafe {
        borrow(h, |obj| {
            obj.as_hash()
                .map(|hash| hash.borrow().keys())
                .unwrap_or_default()
        })
    }
    .unwrap_or_default();
    let v = Vector::from(keys.into_iter().map(Some).collect::<Vec<_>>());
    into_handle(Obj::vector(v))
}

// Vector

#[no_mangle]
pub extern "C" fn pcl_Vector_new(capacity: usize) -> Handle {
    into_handle(Obj::vector(Vector::with_capacity(capacity)))
}

/// Takes `value`. NULL pushes the sentinel.
#[no_mangle]
pub extern "C" fn pcl_Vector_Push(h: Handle, value: Handle) {
    let value = unsafe { take(value) };
    let pushed = unsafe {
        borrow(h, |obj| match obj.as_vector() {
            Ok(v) => v.borrow_mut().push(value),
            Err(e) => log::error!("pcl_Vector_Push: {}", e),
        })
    };
    if pushed.is_none() {
        log::error!("pcl_Vector_Push: NULL vector");
    }
}

/// Returns a borrowed element, or NULL if out of range or the sentinel
#[no_mangle]
pub extern "C" fn pcl_Vector_Fetch(h: Handle, tick: usize) -> Handle {
    unsafe {
        borrow(h, |obj| {
            obj.as_vector()
                .map(|v| borrowed_handle(v.borrow().fetch(tick)))
                .unwrap_or(std::ptr::null())
        })
    }
    .unwrap_or(std::ptr::null())
}

#[no_mangle]
pub extern "C" fn pcl_Vector_Get_Size(h: Handle) -> usize {
    unsafe { borrow(h, |obj| obj.as_vector().map(|v| v.borrow().len()).unwrap_or(0)) }
        .unwrap_or(0)
}

// Storage for generated objects

fn layout_for(size: usize) -> Option<Layout> {
    Layout::from_size_align(size.checked_add(ALLOC_HEADER)?, ALLOC_HEADER).ok()
}

/// Zeroed storage of `size` bytes
#[no_mangle]
pub extern "C" fn pcl_allocate(size: usize) -> *mut c_void {
    let Some(layout) = layout_for(size) else {
        pcl_fatal("pcl_allocate: size overflow");
    };
    unsafe {
        let base = alloc_zeroed(layout);
        if base.is_null() {
            pcl_fatal("pcl_allocate: out of memory");
        }
        (base as *mut usize).write(size);
        base.add(ALLOC_HEADER) as *mut c_void
    }
}

#[no_mangle]
pub extern "C" fn pcl_free(ptr: *mut c_void) {
    if ptr.is_null() {
        return;
    }
    unsafe {
        let base = (ptr as *mut u8).sub(ALLOC_HEADER);
        let size = (base as *const usize).read();
        if let Some(layout) = layout_for(size) {
            dealloc(base, layout);
        }
    }
}

/// Abort with a message (called by abstract method stubs)
#[no_mangle]
pub extern "C" fn pcl_die(msg: *const c_char) -> ! {
    let text = if msg.is_null() {
        "(no message)".to_string()
    } else {
        unsafe { CStr::from_ptr(msg) }.to_string_lossy().into_owned()
    };
    pcl_fatal(&text)
}

fn pcl_fatal(msg: &str) -> ! {
    log::error!("{}", msg);
    eprintln!("parcel runtime: {}", msg);
    std::process::abort()
}
