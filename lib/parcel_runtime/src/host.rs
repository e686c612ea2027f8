//! Values of the host runtime and the conversions to and from native
//! objects
pub mod hash_glue;
use crate::error::RuntimeError;
use crate::hash::Hash;
use crate::obj::{Obj, ObjBody, Value};
use crate::vector::Vector;
use std::cell::RefCell;
use std::rc::Rc;

/// A value as the host runtime sees it
#[derive(Debug, Clone)]
pub enum HostValue {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<HostValue>),
    /// Entries of a host mapping, in host order
    Dict(Vec<(HostValue, HostValue)>),
    Handle(HostHandle),
}

impl HostValue {
    pub fn str(s: &str) -> HostValue {
        HostValue::Str(s.to_string())
    }

    /// Structural equality of host values. Handles compare by identity of
    /// the native object.
    pub fn host_eq(&self, other: &HostValue) -> bool {
        match (self, other) {
            (HostValue::None, HostValue::None) => true,
            (HostValue::Bool(a), HostValue::Bool(b)) => a == b,
            (HostValue::Int(a), HostValue::Int(b)) => a == b,
            (HostValue::Float(a), HostValue::Float(b)) => a == b,
            (HostValue::Str(a), HostValue::Str(b)) => a == b,
            (HostValue::List(a), HostValue::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.host_eq(y))
            }
            (HostValue::Dict(a), HostValue::Dict(b)) => {
                a.len() == b.len()
                    && a.iter().all(|(k, v)| {
                        b.iter()
                            .any(|(k2, v2)| k.host_eq(k2) && v.host_eq(v2))
                    })
            }
            (HostValue::Handle(a), HostValue::Handle(b)) => match (a.get(), b.get()) {
                (Ok(x), Ok(y)) => x.ptr_eq(&y),
                _ => false,
            },
            _ => false,
        }
    }
}

/// Host-visible wrapper of a native object. All clones of a handle are the
/// same host object, which owns one reference to the native object until
/// it is released or the last clone is dropped.
#[derive(Debug, Clone)]
pub struct HostHandle {
    cell: Rc<RefCell<Option<Obj>>>,
}

impl HostHandle {
    /// Wrap `obj`, taking one reference for the host
    pub fn new(obj: &Obj) -> HostHandle {
        HostHandle::adopt(obj.clone())
    }

    /// Wrap `obj`, taking over the reference the caller owns
    pub fn adopt(obj: Obj) -> HostHandle {
        HostHandle {
            cell: Rc::new(RefCell::new(Some(obj))),
        }
    }

    /// The wrapped object (a new reference)
    pub fn get(&self) -> Result<Obj, RuntimeError> {
        self.cell
            .borrow()
            .as_ref()
            .cloned()
            .ok_or(RuntimeError::ReleasedHandle)
    }

    /// Give back the host's reference. Only the first call has an effect.
    pub fn release(&self) {
        let taken = self.cell.borrow_mut().take();
        if taken.is_some() {
            log::trace!("released host handle");
        }
    }

    pub fn is_released(&self) -> bool {
        self.cell.borrow().is_none()
    }
}

/// Convert a host value to a new native value. Host None becomes the
/// sentinel.
pub fn to_native(value: &HostValue) -> Result<Value, RuntimeError> {
    let obj = match value {
        HostValue::None => return Ok(None),
        HostValue::Bool(b) => Obj::boolean(*b),
        HostValue::Int(i) => Obj::integer(*i),
        HostValue::Float(f) => Obj::float(*f),
        HostValue::Str(s) => Obj::string(s.as_str()),
        HostValue::List(items) => {
            let mut v = Vector::with_capacity(items.len());
            for item in items {
                v.push(to_native(item)?);
            }
            Obj::vector(v)
        }
        HostValue::Dict(entries) => {
            let mut h = Hash::with_capacity(entries.len());
            for (k, v) in entries {
                h.store(to_native_key(k)?, to_native(v)?)?;
            }
            Obj::hash(h)
        }
        HostValue::Handle(handle) => handle.get()?,
    };
    Ok(Some(obj))
}

/// Keys of host mappings must be strings
fn to_native_key(key: &HostValue) -> Result<Obj, RuntimeError> {
    match key {
        HostValue::Str(s) => Ok(Obj::string(s.as_str())),
        other => Err(RuntimeError::Conversion(format!(
            "{:?} to a hash key (keys must be str)",
            other
        ))),
    }
}

/// Convert a native value to a host value
pub fn to_host(value: &Value) -> HostValue {
    let Some(obj) = value else {
        return HostValue::None;
    };
    match obj.body() {
        ObjBody::String(s) => HostValue::Str(s.clone()),
        ObjBody::Integer(i) => HostValue::Int(*i),
        ObjBody::Float(f) => HostValue::Float(*f),
        ObjBody::Boolean(b) => HostValue::Bool(*b),
        ObjBody::Vector(v) => HostValue::List(v.borrow().iter().map(to_host).collect()),
        ObjBody::Hash(h) => HostValue::Dict(
            h.borrow()
                .iter()
                .map(|(k, v)| (to_host(&Some(k.clone())), to_host(v)))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_is_idempotent() {
        let obj = Obj::string("x");
        let handle = HostHandle::new(&obj);
        let alias = handle.clone();
        assert_eq!(obj.refcount(), 2);
        handle.release();
        assert_eq!(obj.refcount(), 1);
        alias.release();
        assert_eq!(obj.refcount(), 1);
        assert!(alias.is_released());
        assert_eq!(alias.get().unwrap_err(), RuntimeError::ReleasedHandle);
    }

    #[test]
    fn test_drop_releases_once() {
        let obj = Obj::string("x");
        let handle = HostHandle::new(&obj);
        let alias = handle.clone();
        drop(handle);
        assert_eq!(obj.refcount(), 2);
        drop(alias);
        assert_eq!(obj.refcount(), 1);
    }

    #[test]
    fn test_round_trip_containers() {
        let host = HostValue::List(vec![
            HostValue::Int(1),
            HostValue::None,
            HostValue::Dict(vec![(HostValue::str("a"), HostValue::List(vec![]))]),
        ]);
        let native = to_native(&host).unwrap();
        assert!(to_host(&native).host_eq(&host));
    }

    #[test]
    fn test_non_string_key() {
        let host = HostValue::Dict(vec![(HostValue::Int(1), HostValue::None)]);
        assert!(matches!(
            to_native(&host),
            Err(RuntimeError::Conversion(_))
        ));
    }

    #[test]
    fn test_handle_passes_the_object() {
        let obj = Obj::string("x");
        let handle = HostHandle::new(&obj);
        let native = to_native(&HostValue::Handle(handle)).unwrap().unwrap();
        assert!(native.ptr_eq(&obj));
    }
}
