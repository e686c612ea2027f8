//! Hash operations as the host sees them. Arguments are converted from host
//! values and results are converted back, the way generated trampolines do.
use super::{to_host, to_native, HostHandle, HostValue};
use crate::error::RuntimeError;
use crate::hash::Hash;
use crate::hash_iterator::HashIterator;
use crate::obj::{Kind, Obj};

/// Create a hash owned by the host
pub fn new_hash(capacity: Option<usize>) -> HostHandle {
    let hash = match capacity {
        Some(n) => Hash::with_capacity(n),
        None => Hash::new(),
    };
    HostHandle::adopt(Obj::hash(hash))
}

fn receiver(handle: &HostHandle) -> Result<Obj, RuntimeError> {
    let obj = handle.get()?;
    obj.as_hash()?;
    Ok(obj)
}

/// Keys are host strings or native strings
fn key(value: &HostValue) -> Result<Obj, RuntimeError> {
    match to_native(value)? {
        Some(obj) if obj.as_str().is_some() => Ok(obj),
        Some(obj) => Err(RuntimeError::Conversion(format!(
            "{} to a hash key (keys must be str)",
            obj.kind()
        ))),
        None => Err(RuntimeError::Conversion("None to a hash key".to_string())),
    }
}

pub fn store(handle: &HostHandle, k: &HostValue, v: &HostValue) -> Result<(), RuntimeError> {
    let obj = receiver(handle)?;
    let (k, v) = (key(k)?, to_native(v)?);
    obj.as_hash()?.borrow_mut().store(k, v)?;
    Ok(())
}

/// Absent keys and the sentinel both come back as None
pub fn fetch(handle: &HostHandle, k: &HostValue) -> Result<HostValue, RuntimeError> {
    let obj = receiver(handle)?;
    let k = key(k)?;
    let found = obj.as_hash()?.borrow().fetch(&k).map(to_host);
    Ok(found.unwrap_or(HostValue::None))
}

pub fn delete(handle: &HostHandle, k: &HostValue) -> Result<HostValue, RuntimeError> {
    let obj = receiver(handle)?;
    let k = key(k)?;
    let removed = obj.as_hash()?.borrow_mut().delete(&k);
    Ok(removed.map(|v| to_host(&v)).unwrap_or(HostValue::None))
}

pub fn clear(handle: &HostHandle) -> Result<(), RuntimeError> {
    receiver(handle)?.as_hash()?.borrow_mut().clear();
    Ok(())
}

pub fn has_key(handle: &HostHandle, k: &HostValue) -> Result<bool, RuntimeError> {
    let obj = receiver(handle)?;
    let k = key(k)?;
    let found = obj.as_hash()?.borrow().has_key(&k);
    Ok(found)
}

pub fn keys(handle: &HostHandle) -> Result<Vec<HostValue>, RuntimeError> {
    let obj = receiver(handle)?;
    let keys = obj.as_hash()?.borrow().keys();
    Ok(keys.into_iter().map(|k| to_host(&Some(k))).collect())
}

pub fn values(handle: &HostHandle) -> Result<Vec<HostValue>, RuntimeError> {
    let obj = receiver(handle)?;
    let values = obj.as_hash()?.borrow().values();
    Ok(values.iter().map(to_host).collect())
}

pub fn get_size(handle: &HostHandle) -> Result<usize, RuntimeError> {
    let obj = receiver(handle)?;
    let size = obj.as_hash()?.borrow().size();
    Ok(size)
}

pub fn get_capacity(handle: &HostHandle) -> Result<usize, RuntimeError> {
    let obj = receiver(handle)?;
    let capacity = obj.as_hash()?.borrow().capacity();
    Ok(capacity)
}

/// Compare with a native hash or a host mapping. Anything else is simply
/// not equal.
pub fn equals(handle: &HostHandle, other: &HostValue) -> Result<bool, RuntimeError> {
    let obj = receiver(handle)?;
    let other = match other {
        HostValue::Handle(h) => h.get()?,
        HostValue::Dict(_) => match to_native(other) {
            Ok(Some(converted)) => converted,
            _ => return Ok(false),
        },
        _ => return Ok(false),
    };
    Ok(other.kind() == Kind::Hash && obj.equals(&other))
}

/// Iterator over a host-owned hash
#[derive(Debug)]
pub struct HostIterator {
    inner: HashIterator,
}

pub fn iterator(handle: &HostHandle) -> Result<HostIterator, RuntimeError> {
    Ok(HostIterator {
        inner: HashIterator::new(receiver(handle)?)?,
    })
}

impl HostIterator {
    pub fn next(&mut self) -> Result<bool, RuntimeError> {
        self.inner.next()
    }

    pub fn get_key(&self) -> Result<HostValue, RuntimeError> {
        Ok(self
            .inner
            .get_key()?
            .map(|k| to_host(&Some(k)))
            .unwrap_or(HostValue::None))
    }

    pub fn get_value(&self) -> Result<HostValue, RuntimeError> {
        Ok(self
            .inner
            .get_value()?
            .map(|v| to_host(&v))
            .unwrap_or(HostValue::None))
    }
}
