//! Host functions calling native methods
//!
//! Ownership rules
//! - A wrapper argument lends its native pointer. When the parameter is
//!   `decremented`, one reference is added before the call for the callee.
//! - A converted container argument is a new reference. It is released after
//!   the call unless the parameter is `decremented`.
//! - A returned object is adopted by a new wrapper. Unless the return type
//!   is `incremented`, one reference is added for the wrapper first.
//! - A returned container is converted to a host value, then released if
//!   the return type is `incremented`.
use crate::host_syms::*;
use parcel_ast::Primitive;
use parcel_ast::names::ClassFullname;
use pcc_bind_core::c_type::{c_decl, syms_of};
use pcc_hierarchy::{ClassNode, Hierarchy, Method, ObjectClass, ObjectTy, Ty};

/// Type object of the wrapper of `class`
fn wrapper_type(h: &Hierarchy, class: &ClassFullname) -> String {
    let struct_sym = syms_of(h, class).struct_sym;
    WrapperSyms { struct_sym }.type_object()
}

/// The parsed argument of a parameter (eg. `py_volume`)
fn py_var(name: &str) -> String {
    format!("py_{}", name)
}

pub fn gen_trampoline(
    h: &Hierarchy,
    m: &ModuleSyms,
    node: &ClassNode,
    method: &Method,
    out: &mut String,
) {
    let w = WrapperSyms::new(node);
    let sig = &method.signature;
    let self_sym = node.struct_sym();
    let n_params = sig.params.len();
    let args_param = if n_params == 0 { "unused" } else { "args" };
    out.push_str(&format!(
        "static PyObject*\n{}(PyObject *py_self, PyObject *{}) {{\n",
        w.trampoline(&method.name),
        args_param
    ));

    // Declarations
    out.push_str("    PyObject *result = NULL;\n");
    out.push_str(&format!("    {} *self;\n", self_sym));
    for p in &sig.params {
        out.push_str(&format!("    PyObject *{};\n", py_var(&p.name)));
        match &p.ty {
            Ty::Object(_) => out.push_str(&format!("    {} = NULL;\n", c_decl(h, &p.ty, &p.name))),
            _ => out.push_str(&format!("    {};\n", c_decl(h, &p.ty, &p.name))),
        }
    }
    if !sig.ret_ty.is_void() {
        out.push_str(&format!("    {};\n", c_decl(h, &sig.ret_ty, "retval")));
    }
    if sig.params.iter().any(|p| p.ty == Ty::Primitive(Primitive::Bool)) {
        out.push_str("    int truth;\n");
    }

    // Arguments
    if n_params > 0 {
        let targets = sig
            .params
            .iter()
            .map(|p| format!("&{}", py_var(&p.name)))
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&format!(
            "    if (!PyArg_UnpackTuple(args, \"{}\", {}, {}, {})) {{ return NULL; }}\n",
            method.name, n_params, n_params, targets
        ));
    }
    out.push_str(&format!(
        "    if ({}(py_self, &{}, 0, (void**)&self) < 0) {{ return NULL; }}\n",
        m.helper("unwrap"),
        w.type_object()
    ));
    for p in &sig.params {
        gen_arg(h, m, &p.name, &p.ty, out);
    }

    // Call
    let args = std::iter::once("self".to_string())
        .chain(sig.params.iter().map(|p| p.name.clone()))
        .collect::<Vec<_>>()
        .join(", ");
    for p in &sig.params {
        if let Ty::Object(o) = &p.ty {
            if o.decremented && matches!(o.class, ObjectClass::Class(_)) {
                out.push_str(&format!("    pcl_incref({});\n", p.name));
            }
        }
    }
    let dispatch = format!("{}_{}", self_sym, method.name);
    if sig.ret_ty.is_void() {
        out.push_str(&format!("    {}({});\n", dispatch, args));
    } else {
        out.push_str(&format!("    retval = {}({});\n", dispatch, args));
    }
    for p in &sig.params {
        if let Ty::Object(o) = &p.ty {
            if o.decremented && matches!(o.class, ObjectClass::Runtime(_)) {
                out.push_str(&format!("    {} = NULL; /* taken by the callee */\n", p.name));
            }
        }
    }
    gen_result(h, m, &sig.ret_ty, out);

    // Cleanup
    let converted = sig
        .params
        .iter()
        .filter(|p| matches!(&p.ty, Ty::Object(ObjectTy { class: ObjectClass::Runtime(_), .. })))
        .collect::<Vec<_>>();
    if n_params > 0 {
        out.push_str("\ndone:\n");
        for p in converted {
            out.push_str(&format!("    pcl_handle_decref((pcl_Handle*){});\n", p.name));
        }
    }
    out.push_str("    return result;\n}\n\n");
}

/// Converts a host argument into `name`. Jumps to `done` on failure.
fn gen_arg(h: &Hierarchy, m: &ModuleSyms, name: &str, ty: &Ty, out: &mut String) {
    let py = py_var(name);
    match ty {
        Ty::Void => panic!("[BUG] void parameter `{}`", name),
        Ty::Primitive(Primitive::Bool) => {
            out.push_str(&format!("    truth = PyObject_IsTrue({});\n", py));
            out.push_str("    if (truth < 0) { goto done; }\n");
            out.push_str(&format!("    {} = truth;\n", name));
        }
        Ty::Primitive(p) => {
            let (expr, fail) = from_host_primitive(*p, &py, name);
            out.push_str(&format!("    {} = {};\n", name, expr));
            out.push_str(&format!("    if ({}) {{ goto done; }}\n", fail));
        }
        Ty::Object(o) => match &o.class {
            ObjectClass::Class(class) => {
                let t = wrapper_type(h, class);
                out.push_str(&format!(
                    "    if ({}({}, &{}, {}, (void**)&{}) < 0) {{ goto done; }}\n",
                    m.helper("unwrap"),
                    py,
                    t,
                    o.nullable as u8,
                    name
                ));
            }
            ObjectClass::Runtime(_) => {
                out.push_str(&format!(
                    "    if ({}({}, {}, (pcl_Handle**)&{}) < 0) {{ goto done; }}\n",
                    m.helper("to_native"),
                    py,
                    o.nullable as u8,
                    name
                ));
            }
        },
    }
}

/// Returns the C expression converting a host number and the condition
/// telling it failed
fn from_host_primitive(p: Primitive, py: &str, name: &str) -> (String, String) {
    match p {
        Primitive::Float | Primitive::Double => (
            format!("({})PyFloat_AsDouble({})", p.c_name(), py),
            format!("{} == -1.0 && PyErr_Occurred()", name),
        ),
        Primitive::UInt8
        | Primitive::UInt16
        | Primitive::UInt32
        | Primitive::UInt64
        | Primitive::SizeT => (
            format!("({})PyLong_AsUnsignedLongLong({})", p.c_name(), py),
            format!("{} == ({})-1 && PyErr_Occurred()", name, p.c_name()),
        ),
        _ => (
            format!("({})PyLong_AsLongLong({})", p.c_name(), py),
            format!("{} == -1 && PyErr_Occurred()", name),
        ),
    }
}

/// Converts `retval` into `result`
fn gen_result(h: &Hierarchy, m: &ModuleSyms, ty: &Ty, out: &mut String) {
    match ty {
        Ty::Void => out.push_str("    Py_INCREF(Py_None);\n    result = Py_None;\n"),
        Ty::Primitive(p) => {
            let expr = match p {
                Primitive::Bool => "PyBool_FromLong(retval)",
                Primitive::Float | Primitive::Double => "PyFloat_FromDouble(retval)",
                Primitive::UInt8
                | Primitive::UInt16
                | Primitive::UInt32
                | Primitive::UInt64
                | Primitive::SizeT => "PyLong_FromUnsignedLongLong(retval)",
                _ => "PyLong_FromLongLong(retval)",
            };
            out.push_str(&format!("    result = {};\n", expr));
        }
        Ty::Object(o) => match &o.class {
            ObjectClass::Class(class) => {
                if !o.incremented {
                    out.push_str("    pcl_incref(retval);\n");
                }
                out.push_str(&format!(
                    "    result = {}(&{}, retval);\n",
                    m.helper("wrap"),
                    wrapper_type(h, class)
                ));
            }
            ObjectClass::Runtime(_) => {
                out.push_str(&format!(
                    "    result = {}((pcl_Handle*)retval);\n",
                    m.helper("to_host")
                ));
                if o.incremented {
                    out.push_str("    pcl_handle_decref((pcl_Handle*)retval);\n");
                }
            }
        },
    }
}
