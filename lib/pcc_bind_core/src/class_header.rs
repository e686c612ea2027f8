use crate::c_type::*;
use pcc_hierarchy::{ClassNode, Hierarchy};

/// Header of a class: layout, vtable and the functions to call its methods
pub fn class_header(h: &Hierarchy, node: &ClassNode) -> String {
    let syms = ClassSyms::new(node);
    let guard = syms.include_guard();
    let mut out = String::new();
    out.push_str(&format!("#ifndef {}\n#define {} 1\n\n", guard, guard));
    out.push_str(&format!("#include \"{}parcel.h\"\n", node.parcel.prefix()));
    for parcel in referenced_parcels(h, node) {
        out.push_str(&format!("#include \"{}parcel.h\"\n", parcel.prefix()));
    }
    if let Some(parent) = h.parent(node) {
        out.push_str(&format!(
            "#include \"{}\"\n",
            ClassSyms::new(parent).header_path()
        ));
    }
    out.push('\n');

    gen_struct(h, node, &syms, &mut out);
    gen_vtable_struct(h, node, &syms, &mut out);
    gen_prototypes(h, node, &syms, &mut out);
    gen_dispatch_wrappers(h, node, &syms, &mut out);

    out.push_str(&format!("#endif /* {} */\n", guard));
    out
}

/// Object layout. Inherited fields come first, grouped by the class
/// declaring them.
fn gen_struct(h: &Hierarchy, node: &ClassNode, syms: &ClassSyms, out: &mut String) {
    out.push_str(&format!("/* {} */\n", node.fullname));
    out.push_str(&format!("struct {} {{\n", syms.struct_sym));
    out.push_str("    PCL_OBJ_HEAD\n");
    let mut current = None;
    for attr in &node.attributes {
        if current != Some(&attr.declared_in) {
            out.push_str(&format!("    /* {} */\n", attr.declared_in));
            current = Some(&attr.declared_in);
        }
        out.push_str(&format!("    {};\n", c_decl(h, &attr.ty, &attr.name)));
    }
    out.push_str("};\n\n");
}

fn gen_vtable_struct(h: &Hierarchy, node: &ClassNode, syms: &ClassSyms, out: &mut String) {
    for slot in node.vtable.slots() {
        out.push_str(&format!(
            "typedef {} (*{})({});\n",
            c_type(h, &slot.signature.ret_ty),
            syms.method_typedef(&slot.name),
            c_params(h, &syms.struct_sym, &slot.signature)
        ));
    }
    if !node.vtable.slots().is_empty() {
        out.push('\n');
    }
    let vt = syms.vtable_struct();
    out.push_str(&format!("typedef struct {} {{\n", vt));
    out.push_str("    pcl_VTable base;\n");
    for slot in node.vtable.slots() {
        out.push_str(&format!(
            "    {} {};\n",
            syms.method_typedef(&slot.name),
            slot.name
        ));
    }
    out.push_str(&format!("}} {};\n\n", vt));
    out.push_str(&format!("extern const {} {};\n\n", vt, syms.vtable_var()));
}

fn gen_prototypes(h: &Hierarchy, node: &ClassNode, syms: &ClassSyms, out: &mut String) {
    let s = &syms.struct_sym;
    out.push_str(&format!("{} *{}(void);\n", s, syms.new_fn()));
    out.push_str(&format!("{} *{}({} *self);\n", s, syms.init_fn(), s));
    out.push_str(&format!("void {}({} *self);\n", syms.destroy_fn(), s));
    for method in &node.methods {
        let f = if method.is_abstract {
            syms.abstract_stub(&method.name)
        } else {
            syms.imp(&method.name)
        };
        out.push_str(&format!(
            "{} {}({});\n",
            c_type(h, &method.signature.ret_ty),
            f,
            c_params(h, s, &method.signature)
        ));
    }
    out.push('\n');
}

fn gen_dispatch_wrappers(h: &Hierarchy, node: &ClassNode, syms: &ClassSyms, out: &mut String) {
    let vt = syms.vtable_struct();
    for slot in node.vtable.slots() {
        let sig = &slot.signature;
        out.push_str(&format!(
            "static CHY_INLINE {}\n{}({}) {{\n",
            c_type(h, &sig.ret_ty),
            syms.method(&slot.name),
            c_params(h, &syms.struct_sym, sig)
        ));
        out.push_str(&format!(
            "    const {} *vt = (const {}*)self->vtable;\n",
            vt, vt
        ));
        let call = format!("vt->{}({})", slot.name, c_args(sig));
        if sig.ret_ty.is_void() {
            out.push_str(&format!("    {};\n", call));
        } else {
            out.push_str(&format!("    return {};\n", call));
        }
        out.push_str("}\n\n");
    }
}
