use crate::location::LocationSpan;
use crate::names::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unlinked class declaration; one per declaration unit.
#[derive(Debug, PartialEq, Clone)]
pub struct ClassRecord {
    pub parcel: ParcelName,
    pub fullname: ClassFullname,
    /// Parent class name as written (may be unqualified)
    pub parent: Option<String>,
    pub modifiers: ClassModifiers,
    pub attributes: Vec<AttributeDecl>,
    pub methods: Vec<MethodDecl>,
    pub locs: LocationSpan,
    pub parent_locs: Option<LocationSpan>,
    /// Read from an include directory. Such classes are linked against but
    /// their bindings are not generated.
    pub included: bool,
}

impl ClassRecord {
    pub fn find_method(&self, name: &MethodName) -> Option<&MethodDecl> {
        self.methods.iter().find(|m| &m.name == name)
    }

    pub fn find_attribute(&self, name: &str) -> Option<&AttributeDecl> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct ClassModifiers {
    pub public: bool,
    pub is_final: bool,
}

#[derive(Debug, PartialEq, Clone)]
pub struct AttributeDecl {
    pub name: String,
    pub ty: TypeExpr,
    pub locs: LocationSpan,
}

#[derive(Debug, PartialEq, Clone)]
pub struct MethodDecl {
    pub name: MethodName,
    pub ret_ty: TypeExpr,
    pub params: Vec<ParamDecl>,
    pub modifiers: MethodModifiers,
    pub locs: LocationSpan,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct MethodModifiers {
    pub public: bool,
    pub is_final: bool,
    pub is_abstract: bool,
    pub is_override: bool,
}

#[derive(Debug, PartialEq, Clone)]
pub struct ParamDecl {
    pub name: String,
    pub ty: TypeExpr,
}

/// A type as written in a declaration
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum TypeExpr {
    Void,
    Primitive(Primitive),
    Object(ObjectTypeExpr),
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ObjectTypeExpr {
    /// Class name as written (may be unqualified)
    pub name: String,
    pub nullable: bool,
    pub incremented: bool,
    pub decremented: bool,
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TypeExpr::Void => write!(f, "void"),
            TypeExpr::Primitive(p) => write!(f, "{}", p.c_name()),
            TypeExpr::Object(o) => {
                if o.nullable {
                    write!(f, "nullable ")?;
                }
                if o.incremented {
                    write!(f, "incremented ")?;
                }
                if o.decremented {
                    write!(f, "decremented ")?;
                }
                write!(f, "{}*", o.name)
            }
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum Primitive {
    Bool,
    Char,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    SizeT,
    Float,
    Double,
}

impl Primitive {
    pub fn from_name(s: &str) -> Option<Primitive> {
        let p = match s {
            "bool" => Primitive::Bool,
            "char" => Primitive::Char,
            "int8_t" => Primitive::Int8,
            "int16_t" => Primitive::Int16,
            "int32_t" => Primitive::Int32,
            "int64_t" => Primitive::Int64,
            "uint8_t" => Primitive::UInt8,
            "uint16_t" => Primitive::UInt16,
            "uint32_t" => Primitive::UInt32,
            "uint64_t" => Primitive::UInt64,
            "size_t" => Primitive::SizeT,
            "float" => Primitive::Float,
            "double" => Primitive::Double,
            _ => return None,
        };
        Some(p)
    }

    pub fn c_name(&self) -> &'static str {
        match self {
            Primitive::Bool => "bool",
            Primitive::Char => "char",
            Primitive::Int8 => "int8_t",
            Primitive::Int16 => "int16_t",
            Primitive::Int32 => "int32_t",
            Primitive::Int64 => "int64_t",
            Primitive::UInt8 => "uint8_t",
            Primitive::UInt16 => "uint16_t",
            Primitive::UInt32 => "uint32_t",
            Primitive::UInt64 => "uint64_t",
            Primitive::SizeT => "size_t",
            Primitive::Float => "float",
            Primitive::Double => "double",
        }
    }

    pub fn is_floating(&self) -> bool {
        matches!(self, Primitive::Float | Primitive::Double)
    }
}
