use crate::error::RuntimeError;
use crate::hash::Hash;
use crate::vector::Vector;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A refcounted runtime object. Cloning adds a reference and dropping
/// gives one back.
#[derive(Debug, Clone)]
pub struct Obj(pub(crate) Rc<ObjBody>);

/// A slot of a container. `None` is the "no value" sentinel, which is
/// distinct from an absent entry.
pub type Value = Option<Obj>;

#[derive(Debug)]
pub enum ObjBody {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Vector(RefCell<Vector>),
    Hash(RefCell<Hash>),
}

/// Kinds of objects. The order is the one of `pcl_handle_kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    String,
    Integer,
    Float,
    Boolean,
    Vector,
    Hash,
}

impl Kind {
    pub const ALL: [Kind; 6] = [
        Kind::String,
        Kind::Integer,
        Kind::Float,
        Kind::Boolean,
        Kind::Vector,
        Kind::Hash,
    ];

    pub fn code(&self) -> u32 {
        *self as u32
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl Obj {
    pub fn string(s: impl Into<String>) -> Obj {
        Obj(Rc::new(ObjBody::String(s.into())))
    }

    pub fn integer(i: i64) -> Obj {
        Obj(Rc::new(ObjBody::Integer(i)))
    }

    pub fn float(f: f64) -> Obj {
        Obj(Rc::new(ObjBody::Float(f)))
    }

    pub fn boolean(b: bool) -> Obj {
        Obj(Rc::new(ObjBody::Boolean(b)))
    }

    pub fn vector(v: Vector) -> Obj {
        Obj(Rc::new(ObjBody::Vector(RefCell::new(v))))
    }

    pub fn hash(h: Hash) -> Obj {
        Obj(Rc::new(ObjBody::Hash(RefCell::new(h))))
    }

    pub fn body(&self) -> &ObjBody {
        &self.0
    }

    pub fn kind(&self) -> Kind {
        match self.body() {
            ObjBody::String(_) => Kind::String,
            ObjBody::Integer(_) => Kind::Integer,
            ObjBody::Float(_) => Kind::Float,
            ObjBody::Boolean(_) => Kind::Boolean,
            ObjBody::Vector(_) => Kind::Vector,
            ObjBody::Hash(_) => Kind::Hash,
        }
    }

    /// Number of owners of this object
    pub fn refcount(&self) -> usize {
        Rc::strong_count(&self.0)
    }

    /// Returns true if both refer to the same object
    pub fn ptr_eq(&self, other: &Obj) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self.body() {
            ObjBody::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_hash(&self) -> Result<&RefCell<Hash>, RuntimeError> {
        match self.body() {
            ObjBody::Hash(h) => Ok(h),
            _ => Err(self.wrong_kind(Kind::Hash)),
        }
    }

    pub fn as_vector(&self) -> Result<&RefCell<Vector>, RuntimeError> {
        match self.body() {
            ObjBody::Vector(v) => Ok(v),
            _ => Err(self.wrong_kind(Kind::Vector)),
        }
    }

    fn wrong_kind(&self, expected: Kind) -> RuntimeError {
        RuntimeError::WrongKind {
            expected,
            got: self.kind(),
        }
    }

    /// Structural equality. Integers and floats compare numerically;
    /// objects of other different kinds are never equal.
    pub fn equals(&self, other: &Obj) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        match (self.body(), other.body()) {
            (ObjBody::String(a), ObjBody::String(b)) => a == b,
            (ObjBody::Integer(a), ObjBody::Integer(b)) => a == b,
            (ObjBody::Float(a), ObjBody::Float(b)) => a == b,
            (ObjBody::Integer(a), ObjBody::Float(b)) | (ObjBody::Float(b), ObjBody::Integer(a)) => {
                *a as f64 == *b
            }
            (ObjBody::Boolean(a), ObjBody::Boolean(b)) => a == b,
            (ObjBody::Vector(a), ObjBody::Vector(b)) => a.borrow().equals(&b.borrow()),
            (ObjBody::Hash(a), ObjBody::Hash(b)) => a.borrow().equals(&b.borrow()),
            _ => false,
        }
    }
}

/// Equality of container slots. The sentinel only equals the sentinel.
pub fn value_equals(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a.equals(b),
        _ => false,
    }
}

impl fmt::Display for Obj {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.body() {
            ObjBody::String(s) => write!(f, "{:?}", s),
            ObjBody::Integer(i) => write!(f, "{}", i),
            ObjBody::Float(x) => write!(f, "{}", x),
            ObjBody::Boolean(b) => write!(f, "{}", b),
            ObjBody::Vector(v) => write!(f, "Vector(len={})", v.borrow().len()),
            ObjBody::Hash(h) => write!(f, "Hash(size={})", h.borrow().size()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_equality() {
        assert!(Obj::integer(1).equals(&Obj::float(1.0)));
        assert!(Obj::float(2.0).equals(&Obj::integer(2)));
        assert!(!Obj::integer(1).equals(&Obj::float(1.5)));
        assert!(!Obj::integer(1).equals(&Obj::boolean(true)));
        assert!(!Obj::string("1").equals(&Obj::integer(1)));
    }

    #[test]
    fn test_refcount() {
        let a = Obj::string("x");
        assert_eq!(a.refcount(), 1);
        let b = a.clone();
        assert_eq!(a.refcount(), 2);
        assert!(a.ptr_eq(&b));
        drop(b);
        assert_eq!(a.refcount(), 1);
    }

    #[test]
    fn test_kind_codes() {
        let codes = Kind::ALL.iter().map(|k| k.code()).collect::<Vec<_>>();
        assert_eq!(codes, vec![0, 1, 2, 3, 4, 5]);
    }
}
