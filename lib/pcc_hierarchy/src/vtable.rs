use crate::ty::Signature;
use parcel_ast::names::*;
use serde::Serialize;
use std::collections::HashMap;

/// A method table of a class. Inherited slots keep the index they have in
/// the parent's table.
#[derive(Debug, Clone, Default, Serialize)]
pub struct VTable {
    /// List of slots, ordered by index
    slots: Vec<Slot>,
    /// Mapping from method name to index
    #[serde(skip)]
    index: HashMap<MethodName, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slot {
    pub name: MethodName,
    /// The class which introduced this slot
    pub novel_in: ClassFullname,
    /// The class whose implementation fills this slot
    pub implemented_by: ClassFullname,
    pub signature: Signature,
    pub is_final: bool,
    pub is_abstract: bool,
}

impl VTable {
    /// Create an empty VTable
    pub fn null() -> VTable {
        VTable {
            slots: vec![],
            index: HashMap::new(),
        }
    }

    /// Build a VTable of a class from its parent's table and its own
    /// methods (in declaration order)
    pub fn build(super_vtable: &VTable, own: impl IntoIterator<Item = Slot>) -> VTable {
        let mut vtable = super_vtable.clone();
        for slot in own {
            if vtable.contains(&slot.name) {
                vtable.update(slot);
            } else {
                vtable.push(slot);
            }
        }
        vtable
    }

    pub fn contains(&self, name: &MethodName) -> bool {
        self.index.contains_key(name)
    }

    /// Replace the slot in place. The slot keeps the class which introduced
    /// it.
    fn update(&mut self, mut slot: Slot) {
        let i = self.index[&slot.name];
        let elem = &mut self.slots[i];
        slot.novel_in = elem.novel_in.clone();
        *elem = slot;
    }

    fn push(&mut self, slot: Slot) {
        let i = self.slots.len();
        self.index.insert(slot.name.clone(), i);
        self.slots.push(slot);
    }

    /// Returns the size
    pub fn size(&self) -> usize {
        self.slots.len()
    }

    /// Returns the index of the method
    pub fn get(&self, name: &MethodName) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Returns the slot of the method
    pub fn slot(&self, name: &MethodName) -> Option<&Slot> {
        self.get(name).map(|i| &self.slots[i])
    }

    /// Returns the list of slots, ordered by the index.
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ty::Ty;

    fn slot(name: &str, class: &str) -> Slot {
        Slot {
            name: method_name(name),
            novel_in: class_fullname(class),
            implemented_by: class_fullname(class),
            signature: Signature {
                ret_ty: Ty::Void,
                params: vec![],
            },
            is_final: false,
            is_abstract: false,
        }
    }

    #[test]
    fn test_override_keeps_index() {
        let base = VTable::build(
            &VTable::null(),
            vec![slot("Eat", "A::Base"), slot("Sleep", "A::Base")],
        );
        let sub = VTable::build(&base, vec![slot("Run", "A::Sub"), slot("Eat", "A::Sub")]);
        let names = sub
            .slots()
            .iter()
            .map(|s| s.name.0.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["Eat", "Sleep", "Run"]);
        let eat = sub.slot(&method_name("Eat")).unwrap();
        assert_eq!(eat.implemented_by, class_fullname("A::Sub"));
        assert_eq!(eat.novel_in, class_fullname("A::Base"));
        assert_eq!(sub.get(&method_name("Run")), Some(2));
        assert_eq!(base.size(), 2);
    }
}
