use crate::ty::{Signature, Ty};
use crate::vtable::VTable;
use parcel_ast::names::*;
use parcel_ast::LocationSpan;
use serde::Serialize;

/// Index of a class in the hierarchy arena
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord)]
pub struct ClassId(pub usize);

/// A linked class
#[derive(Debug, Clone, Serialize)]
pub struct ClassNode {
    #[serde(skip)]
    pub id: ClassId,
    pub fullname: ClassFullname,
    pub parcel: ParcelName,
    #[serde(skip)]
    pub parent: Option<ClassId>,
    pub parent_name: Option<ClassFullname>,
    #[serde(skip)]
    pub children: Vec<ClassId>,
    pub is_public: bool,
    pub is_final: bool,
    /// Inherited attributes followed by own ones
    pub attributes: Vec<Attribute>,
    /// Number of attributes inherited from the parent
    pub inherited_attr_count: usize,
    /// Methods declared in this class
    pub methods: Vec<Method>,
    pub vtable: VTable,
    /// Declared in an include directory
    pub is_included: bool,
    #[serde(skip)]
    pub locs: LocationSpan,
}

#[derive(Debug, Clone, Serialize)]
pub struct Attribute {
    pub name: String,
    pub ty: Ty,
    pub declared_in: ClassFullname,
}

#[derive(Debug, Clone, Serialize)]
pub struct Method {
    pub name: MethodName,
    pub signature: Signature,
    pub is_public: bool,
    pub is_final: bool,
    pub is_abstract: bool,
    /// true if this method introduces a new slot
    pub is_novel: bool,
    #[serde(skip)]
    pub locs: LocationSpan,
}

impl ClassNode {
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Attributes declared in this class
    pub fn own_attributes(&self) -> &[Attribute] {
        &self.attributes[self.inherited_attr_count..]
    }

    /// Attributes inherited from the ancestors
    pub fn inherited_attributes(&self) -> &[Attribute] {
        &self.attributes[..self.inherited_attr_count]
    }

    pub fn find_method(&self, name: &MethodName) -> Option<&Method> {
        self.methods.iter().find(|m| &m.name == name)
    }

    /// C struct name (eg. `hello_Dog`)
    pub fn struct_sym(&self) -> String {
        struct_sym(&self.parcel, &self.fullname)
    }

    /// Uppercase C name used for macros and the vtable (eg. `HELLO_DOG`)
    pub fn upper_sym(&self) -> String {
        upper_sym(&self.parcel, &self.fullname)
    }
}

/// C struct name of a class (eg. `hello_Dog`)
pub fn struct_sym(parcel: &ParcelName, name: &ClassFullname) -> String {
    format!("{}{}", parcel.prefix(), name.last_component())
}

/// Uppercase C name of a class (eg. `HELLO_DOG`)
pub fn upper_sym(parcel: &ParcelName, name: &ClassFullname) -> String {
    format!(
        "{}{}",
        parcel.upper_prefix(),
        name.last_component().to_uppercase()
    )
}
