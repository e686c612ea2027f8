//! Links class records into a validated single-inheritance hierarchy
//! with flattened attributes and vtables.
mod builder;
mod class_node;
mod error;
mod ty;
mod vtable;
pub use crate::class_node::{struct_sym, Attribute, ClassId, ClassNode, Method};
pub use crate::error::Error;
pub use crate::ty::{ObjectClass, ObjectTy, Param, RuntimeType, Signature, Ty};
pub use crate::vtable::{Slot, VTable};
use parcel_ast::names::*;
use parcel_ast::ClassRecord;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::collections::HashMap;

/// The linked classes. Read-only once built.
#[derive(Debug)]
pub struct Hierarchy {
    /// Arena of the classes
    nodes: Vec<ClassNode>,
    index: HashMap<ClassFullname, ClassId>,
    /// Classes ordered parents-first
    ladder: Vec<ClassId>,
    /// Sorted by name
    parcels: Vec<Parcel>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Parcel {
    pub name: ParcelName,
    /// C symbol prefix (eg. `hello_`)
    pub prefix: String,
    /// Classes of this parcel in ladder order
    pub classes: Vec<ClassFullname>,
    /// Every class of this parcel comes from an include directory
    pub included: bool,
}

impl Hierarchy {
    pub fn build(records: Vec<ClassRecord>) -> Result<Hierarchy, Error> {
        builder::build(records)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: ClassId) -> &ClassNode {
        &self.nodes[id.0]
    }

    pub fn find(&self, name: &ClassFullname) -> Option<&ClassNode> {
        self.index.get(name).map(|id| self.get(*id))
    }

    /// Returns all classes, parents first
    pub fn ladder(&self) -> impl Iterator<Item = &ClassNode> + '_ {
        self.ladder.iter().map(|id| self.get(*id))
    }

    pub fn parent(&self, node: &ClassNode) -> Option<&ClassNode> {
        node.parent.map(|id| self.get(id))
    }

    /// Returns the ancestors of `node`, nearest first
    pub fn ancestors<'a>(&'a self, node: &'a ClassNode) -> Vec<&'a ClassNode> {
        let mut v = vec![];
        let mut cur = node;
        while let Some(parent) = self.parent(cur) {
            v.push(parent);
            cur = parent;
        }
        v
    }

    pub fn children<'a>(&'a self, node: &'a ClassNode) -> impl Iterator<Item = &'a ClassNode> {
        node.children.iter().map(|id| self.get(*id))
    }

    pub fn parcels(&self) -> &[Parcel] {
        &self.parcels
    }

    pub fn find_parcel(&self, name: &ParcelName) -> Option<&Parcel> {
        self.parcels.iter().find(|p| &p.name == name)
    }

    /// Returns the classes of the parcel, parents first
    pub fn parcel_classes<'a>(&'a self, parcel: &'a Parcel) -> impl Iterator<Item = &'a ClassNode> {
        parcel.classes.iter().filter_map(|name| self.find(name))
    }
}

impl Serialize for Hierarchy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Hierarchy", 2)?;
        s.serialize_field("parcels", &self.parcels)?;
        s.serialize_field("classes", &self.ladder().collect::<Vec<_>>())?;
        s.end()
    }
}
