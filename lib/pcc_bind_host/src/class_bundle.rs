use crate::host_syms::*;
use crate::trampoline::gen_trampoline;
use pcc_hierarchy::{ClassNode, Hierarchy, Method};

/// Returns true if `method` needs its own trampoline in `node`. An override
/// reuses the trampoline of the class which introduced the slot, unless the
/// method was not published there.
fn needs_trampoline(h: &Hierarchy, node: &ClassNode, method: &Method) -> bool {
    if !method.is_public {
        return false;
    }
    if method.is_novel {
        return true;
    }
    let Some(slot) = node.vtable.slot(&method.name) else {
        return true;
    };
    match h.find(&slot.novel_in).and_then(|c| c.find_method(&method.name)) {
        Some(original) => !original.is_public,
        None => true,
    }
}

/// The wrapper type of a class and its trampolines
pub fn class_bundle(h: &Hierarchy, m: &ModuleSyms, node: &ClassNode, py_name: &str) -> String {
    let w = WrapperSyms::new(node);
    let mut out = String::new();
    out.push_str(&format!("#include \"{}\"\n\n", m.header_name()));

    let methods = node
        .methods
        .iter()
        .filter(|method| needs_trampoline(h, node, method))
        .collect::<Vec<_>>();
    for method in &methods {
        gen_trampoline(h, m, node, method, &mut out);
    }
    gen_new(node, m, &w, &mut out);

    out.push_str(&format!("static PyMethodDef {}[] = {{\n", w.methods_table()));
    if h.parent(node).is_none() {
        out.push_str(&format!(
            "    {{\"release\", {}, METH_NOARGS, NULL}},\n",
            m.helper("release_method")
        ));
    }
    for method in &methods {
        let flag = if method.signature.params.is_empty() {
            "METH_NOARGS"
        } else {
            "METH_VARARGS"
        };
        out.push_str(&format!(
            "    {{\"{}\", {}, {}, NULL}},\n",
            method.name,
            w.trampoline(&method.name),
            flag
        ));
    }
    out.push_str("    {NULL, NULL, 0, NULL}\n};\n\n");

    out.push_str(&format!("PyTypeObject {} = {{\n", w.type_object()));
    out.push_str("    PyVarObject_HEAD_INIT(NULL, 0)\n");
    out.push_str(&format!("    .tp_name = \"{}.{}\",\n", m.ext_name(), py_name));
    out.push_str(&format!("    .tp_basicsize = sizeof({}),\n", m.wrapper_struct()));
    out.push_str(&format!("    .tp_dealloc = {},\n", m.helper("dealloc")));
    // No Py_TPFLAGS_BASETYPE: native dispatch never reaches a method
    // overridden in a host subclass.
    out.push_str("    .tp_flags = Py_TPFLAGS_DEFAULT,\n");
    out.push_str(&format!("    .tp_doc = \"{}\",\n", node.fullname));
    out.push_str(&format!("    .tp_methods = {},\n", w.methods_table()));
    if let Some(parent) = h.parent(node) {
        out.push_str(&format!(
            "    .tp_base = &{},\n",
            WrapperSyms::new(parent).type_object()
        ));
    }
    out.push_str(&format!("    .tp_new = {},\n", w.new_fn()));
    out.push_str("};\n");
    out
}

/// Host constructor. Classes with abstract methods cannot be instantiated.
fn gen_new(node: &ClassNode, m: &ModuleSyms, w: &WrapperSyms, out: &mut String) {
    let wrapper = m.wrapper_struct();
    out.push_str(&format!(
        "static PyObject*\n{}(PyTypeObject *type, PyObject *args, PyObject *kwds) {{\n",
        w.new_fn()
    ));
    if node.vtable.slots().iter().any(|s| s.is_abstract) {
        out.push_str(&format!(
            "    PyErr_SetString(PyExc_TypeError, \"{} has abstract methods\");\n",
            node.fullname
        ));
        out.push_str("    return NULL;\n}\n\n");
        return;
    }
    out.push_str(&format!(
        "    {} *self = ({}*)type->tp_alloc(type, 0);\n",
        wrapper, wrapper
    ));
    out.push_str("    if (self == NULL) { return NULL; }\n");
    out.push_str(&format!("    self->native = {}_new();\n", w.struct_sym));
    out.push_str("    self->released = 0;\n");
    out.push_str("    return (PyObject*)self;\n}\n\n");
}
