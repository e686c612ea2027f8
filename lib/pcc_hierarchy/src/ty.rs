use parcel_ast::names::ClassFullname;
use parcel_ast::Primitive;
use serde::Serialize;
use std::fmt;

/// Resolved type of an attribute, a parameter or a return value
#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
pub enum Ty {
    Void,
    Primitive(Primitive),
    Object(ObjectTy),
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
pub struct ObjectTy {
    pub class: ObjectClass,
    pub nullable: bool,
    /// Return value carries a +1 reference for the caller
    pub incremented: bool,
    /// Parameter passes a reference to the callee
    pub decremented: bool,
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
pub enum ObjectClass {
    /// Container provided by the runtime
    Runtime(RuntimeType),
    /// Class declared in this build
    Class(ClassFullname),
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
pub enum RuntimeType {
    String,
    Hash,
    Vector,
}

impl RuntimeType {
    pub fn from_name(s: &str) -> Option<RuntimeType> {
        match s {
            "String" => Some(RuntimeType::String),
            "Hash" => Some(RuntimeType::Hash),
            "Vector" => Some(RuntimeType::Vector),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RuntimeType::String => "String",
            RuntimeType::Hash => "Hash",
            RuntimeType::Vector => "Vector",
        }
    }
}

impl Ty {
    pub fn is_void(&self) -> bool {
        matches!(self, Ty::Void)
    }

    pub fn as_object(&self) -> Option<&ObjectTy> {
        match self {
            Ty::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Returns true if a slot of type `self` can be replaced by one of
    /// type `other`. Nullability is ignored; ownership transfer must match.
    pub fn is_compatible(&self, other: &Ty) -> bool {
        match (self, other) {
            (Ty::Void, Ty::Void) => true,
            (Ty::Primitive(a), Ty::Primitive(b)) => a == b,
            (Ty::Object(a), Ty::Object(b)) => {
                a.class == b.class
                    && a.incremented == b.incremented
                    && a.decremented == b.decremented
            }
            _ => false,
        }
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Ty::Void => write!(f, "void"),
            Ty::Primitive(p) => write!(f, "{}", p.c_name()),
            Ty::Object(o) => {
                if o.nullable {
                    write!(f, "nullable ")?;
                }
                if o.incremented {
                    write!(f, "incremented ")?;
                }
                if o.decremented {
                    write!(f, "decremented ")?;
                }
                match &o.class {
                    ObjectClass::Runtime(r) => write!(f, "{}*", r.name()),
                    ObjectClass::Class(c) => write!(f, "{}*", c),
                }
            }
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
pub struct Param {
    pub name: String,
    pub ty: Ty,
}

/// Return type and parameters of a method (`self` is implicit)
#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
pub struct Signature {
    pub ret_ty: Ty,
    pub params: Vec<Param>,
}

impl Signature {
    pub fn is_compatible(&self, other: &Signature) -> bool {
        self.ret_ty.is_compatible(&other.ret_ty)
            && self.params.len() == other.params.len()
            && self
                .params
                .iter()
                .zip(other.params.iter())
                .all(|(a, b)| a.ty.is_compatible(&b.ty))
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let params = self
            .params
            .iter()
            .map(|p| format!("{} {}", p.ty, p.name))
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{} ({})", self.ret_ty, params)
    }
}
