//! C names and types for the classes of a hierarchy
use parcel_ast::names::*;
use pcc_hierarchy::{ClassNode, Hierarchy, ObjectClass, Signature, Slot, Ty};

/// C symbols of a class
#[derive(Debug, Clone)]
pub struct ClassSyms {
    /// eg. `zoo_Dog`
    pub struct_sym: String,
    /// eg. `ZOO_DOG`
    pub upper: String,
    /// eg. `Zoo/Dog`
    pub path_part: String,
}

impl ClassSyms {
    pub fn new(node: &ClassNode) -> ClassSyms {
        ClassSyms {
            struct_sym: node.struct_sym(),
            upper: node.upper_sym(),
            path_part: node.fullname.path_part(),
        }
    }

    /// eg. `Zoo/Dog.h`
    pub fn header_path(&self) -> String {
        format!("{}.h", self.path_part)
    }

    pub fn vtable_struct(&self) -> String {
        format!("{}_VTable", self.struct_sym)
    }

    /// The vtable instance (eg. `ZOO_DOG_VTABLE`)
    pub fn vtable_var(&self) -> String {
        format!("{}_VTABLE", self.upper)
    }

    pub fn include_guard(&self) -> String {
        format!("H_{}", self.upper)
    }

    /// Dispatch wrapper (eg. `zoo_Dog_Bark`)
    pub fn method(&self, name: &MethodName) -> String {
        format!("{}_{}", self.struct_sym, name)
    }

    /// Function pointer type of a slot (eg. `zoo_Dog_Bark_t`)
    pub fn method_typedef(&self, name: &MethodName) -> String {
        format!("{}_{}_t", self.struct_sym, name)
    }

    /// Implementation (eg. `zoo_Dog_Bark_IMP`)
    pub fn imp(&self, name: &MethodName) -> String {
        format!("{}_{}_IMP", self.struct_sym, name)
    }

    /// Generated stub for an abstract method
    pub fn abstract_stub(&self, name: &MethodName) -> String {
        format!("{}_{}_ABSTRACT", self.struct_sym, name)
    }

    pub fn new_fn(&self) -> String {
        format!("{}_new", self.struct_sym)
    }

    pub fn init_fn(&self) -> String {
        format!("{}_init", self.struct_sym)
    }

    pub fn destroy_fn(&self) -> String {
        format!("{}_destroy", self.struct_sym)
    }
}

/// Symbols of the class named `name`
pub fn syms_of(h: &Hierarchy, name: &ClassFullname) -> ClassSyms {
    let node = h
        .find(name)
        .unwrap_or_else(|| panic!("[BUG] class {} not in the hierarchy", name));
    ClassSyms::new(node)
}

/// Symbol of the function which fills `slot`
pub fn slot_fn(h: &Hierarchy, slot: &Slot) -> String {
    let syms = syms_of(h, &slot.implemented_by);
    if slot.is_abstract {
        syms.abstract_stub(&slot.name)
    } else {
        syms.imp(&slot.name)
    }
}

/// C type of `ty` (eg. `int32_t`, `pcl_Hash*`, `zoo_Dog*`)
pub fn c_type(h: &Hierarchy, ty: &Ty) -> String {
    match ty {
        Ty::Void => "void".to_string(),
        Ty::Primitive(p) => p.c_name().to_string(),
        Ty::Object(o) => match &o.class {
            ObjectClass::Runtime(r) => format!("pcl_{}*", r.name()),
            ObjectClass::Class(name) => format!("{}*", syms_of(h, name).struct_sym),
        },
    }
}

/// `<type> <name>` with the `*` attached to the name
pub fn c_decl(h: &Hierarchy, ty: &Ty, name: &str) -> String {
    let t = c_type(h, ty);
    match t.strip_suffix('*') {
        Some(base) => format!("{} *{}", base, name),
        None => format!("{} {}", t, name),
    }
}

/// Parameter list including `self` (eg. `zoo_Dog *self, int32_t hours`)
pub fn c_params(h: &Hierarchy, self_struct: &str, sig: &Signature) -> String {
    let mut v = vec![format!("{} *self", self_struct)];
    for p in &sig.params {
        v.push(c_decl(h, &p.ty, &p.name));
    }
    v.join(", ")
}

/// Argument list including `self` (eg. `self, hours`)
pub fn c_args(sig: &Signature) -> String {
    let mut v = vec!["self".to_string()];
    for p in &sig.params {
        v.push(p.name.clone());
    }
    v.join(", ")
}

/// Statement to release a field of type `ty`, if it holds a reference
pub fn release_stmt(ty: &Ty, expr: &str) -> Option<String> {
    match ty {
        Ty::Object(o) => match o.class {
            ObjectClass::Runtime(_) => Some(format!("pcl_handle_decref((pcl_Handle*){});", expr)),
            ObjectClass::Class(_) => Some(format!("pcl_decref({});", expr)),
        },
        _ => None,
    }
}

/// Initial value of a field of type `ty`
pub fn zero_value(ty: &Ty) -> &'static str {
    match ty {
        Ty::Object(_) => "NULL",
        Ty::Primitive(p) if p.is_floating() => "0.0",
        Ty::Primitive(parcel_ast::Primitive::Bool) => "false",
        _ => "0",
    }
}

/// Returns the parcels whose headers are needed for the types used by
/// `node` (excluding its own parcel)
pub fn referenced_parcels(h: &Hierarchy, node: &ClassNode) -> Vec<ParcelName> {
    let mut tys: Vec<&Ty> = node.attributes.iter().map(|a| &a.ty).collect();
    for slot in node.vtable.slots() {
        tys.push(&slot.signature.ret_ty);
        tys.extend(slot.signature.params.iter().map(|p| &p.ty));
    }
    let mut parcels = vec![];
    for ty in tys {
        if let Ty::Object(o) = ty {
            if let ObjectClass::Class(name) = &o.class {
                if let Some(other) = h.find(name) {
                    if other.parcel != node.parcel && !parcels.contains(&other.parcel) {
                        parcels.push(other.parcel.clone());
                    }
                }
            }
        }
    }
    parcels.sort();
    parcels
}

/// Comment block from configured text (one `/* */` per line)
pub fn comment_block(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let mut s = String::new();
    for line in text.lines() {
        s.push_str(&format!("/* {} */\n", line));
    }
    s.push('\n');
    s
}
