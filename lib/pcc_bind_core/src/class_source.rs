use crate::c_type::*;
use pcc_hierarchy::{ClassNode, Hierarchy, Ty};

/// Source of a class: the vtable instance and the lifecycle functions
pub fn class_source(h: &Hierarchy, node: &ClassNode) -> String {
    let syms = ClassSyms::new(node);
    let mut out = String::new();
    out.push_str(&format!("#include \"{}\"\n\n", syms.header_path()));
    gen_abstract_stubs(h, node, &syms, &mut out);
    gen_vtable(h, node, &syms, &mut out);
    gen_new(&syms, &mut out);
    gen_init(h, node, &syms, &mut out);
    gen_destroy(h, node, &syms, &mut out);
    out
}

fn gen_abstract_stubs(h: &Hierarchy, node: &ClassNode, syms: &ClassSyms, out: &mut String) {
    for method in node.methods.iter().filter(|m| m.is_abstract) {
        let ret_ty = &method.signature.ret_ty;
        out.push_str(&format!(
            "{}\n{}({}) {{\n",
            c_type(h, ret_ty),
            syms.abstract_stub(&method.name),
            c_params(h, &syms.struct_sym, &method.signature)
        ));
        out.push_str(&format!(
            "    pcl_die(\"{}#{} is abstract\");\n",
            node.fullname, method.name
        ));
        match ret_ty {
            Ty::Void => {}
            _ => out.push_str(&format!("    return {};\n", zero_value(ret_ty))),
        }
        out.push_str("}\n\n");
    }
}

fn gen_vtable(h: &Hierarchy, node: &ClassNode, syms: &ClassSyms, out: &mut String) {
    let parent_vtable = match h.parent(node) {
        Some(parent) => format!("&{}.base", ClassSyms::new(parent).vtable_var()),
        None => "NULL".to_string(),
    };
    out.push_str(&format!(
        "const {} {} = {{\n",
        syms.vtable_struct(),
        syms.vtable_var()
    ));
    out.push_str("    {\n");
    out.push_str(&format!("        \"{}\",\n", node.fullname));
    out.push_str(&format!("        {},\n", parent_vtable));
    out.push_str(&format!("        sizeof({}),\n", syms.struct_sym));
    out.push_str(&format!("        (pcl_destroy_t){},\n", syms.destroy_fn()));
    out.push_str(&format!("        {}\n", node.vtable.size()));
    out.push_str("    },\n");
    for slot in node.vtable.slots() {
        let f = slot_fn(h, slot);
        if slot.implemented_by == node.fullname {
            out.push_str(&format!("    {},\n", f));
        } else {
            out.push_str(&format!("    ({}){},\n", syms.method_typedef(&slot.name), f));
        }
    }
    out.push_str("};\n\n");
}

fn gen_new(syms: &ClassSyms, out: &mut String) {
    let s = &syms.struct_sym;
    out.push_str(&format!("{}*\n{}(void) {{\n", s, syms.new_fn()));
    out.push_str(&format!(
        "    {} *self = ({}*)pcl_allocate(sizeof({}));\n",
        s, s, s
    ));
    out.push_str("    self->refcount = 1;\n");
    out.push_str(&format!("    self->vtable = &{}.base;\n", syms.vtable_var()));
    out.push_str(&format!("    return {}(self);\n", syms.init_fn()));
    out.push_str("}\n\n");
}

/// Runs the parent's initializer, then sets the own fields
fn gen_init(h: &Hierarchy, node: &ClassNode, syms: &ClassSyms, out: &mut String) {
    let s = &syms.struct_sym;
    out.push_str(&format!("{}*\n{}({} *self) {{\n", s, syms.init_fn(), s));
    if let Some(parent) = h.parent(node) {
        let p = ClassSyms::new(parent);
        out.push_str(&format!("    {}(({}*)self);\n", p.init_fn(), p.struct_sym));
    }
    for attr in node.own_attributes() {
        out.push_str(&format!(
            "    self->{} = {};\n",
            attr.name,
            zero_value(&attr.ty)
        ));
    }
    out.push_str("    return self;\n");
    out.push_str("}\n\n");
}

/// Releases the own fields, then runs the parent's destructor. The root
/// class frees the storage.
fn gen_destroy(h: &Hierarchy, node: &ClassNode, syms: &ClassSyms, out: &mut String) {
    let s = &syms.struct_sym;
    out.push_str(&format!("void\n{}({} *self) {{\n", syms.destroy_fn(), s));
    for attr in node.own_attributes() {
        let field = format!("self->{}", attr.name);
        if let Some(stmt) = release_stmt(&attr.ty, &field) {
            out.push_str(&format!("    {}\n", stmt));
            out.push_str(&format!("    {} = NULL;\n", field));
        }
    }
    match h.parent(node) {
        Some(parent) => {
            let p = ClassSyms::new(parent);
            out.push_str(&format!("    {}(({}*)self);\n", p.destroy_fn(), p.struct_sym));
        }
        None => out.push_str("    pcl_free(self);\n"),
    }
    out.push_str("}\n");
}
