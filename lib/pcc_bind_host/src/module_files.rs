use crate::host_syms::*;
use pcc_bind_core::c_type::ClassSyms;
use pcc_hierarchy::ClassNode;

/// Declarations shared by the generated glue and hand-written extension
/// sources
pub fn module_header(m: &ModuleSyms, classes: &[&ClassNode]) -> String {
    let guard = m.guard();
    let w = m.wrapper_struct();
    let mut out = String::new();
    out.push_str(&format!("#ifndef {}\n#define {} 1\n\n", guard, guard));
    out.push_str("#define PY_SSIZE_T_CLEAN\n#include <Python.h>\n\n");
    for node in classes {
        out.push_str(&format!("#include \"{}\"\n", ClassSyms::new(node).header_path()));
    }
    out.push('\n');
    out.push_str("/* Host object wrapping a native object. Holds one reference until\n");
    out.push_str(" * released. */\n");
    out.push_str(&format!(
        "typedef struct {{\n    PyObject_HEAD\n    void *native;\n    int released;\n}} {};\n\n",
        w
    ));
    for node in classes {
        out.push_str(&format!(
            "extern PyTypeObject {};\n",
            WrapperSyms::new(node).type_object()
        ));
    }
    out.push('\n');
    out.push_str("/* Adopts one reference of `native`. NULL becomes None. */\n");
    out.push_str(&format!(
        "PyObject *{}(PyTypeObject *type, void *native);\n",
        m.helper("wrap")
    ));
    out.push_str("/* Borrowed native pointer of a wrapper. Returns -1 on error. */\n");
    out.push_str(&format!(
        "int {}(PyObject *obj, PyTypeObject *type, int nullable, void **out);\n",
        m.helper("unwrap")
    ));
    out.push_str("/* New native value converted from a host value. Returns -1 on error. */\n");
    out.push_str(&format!(
        "int {}(PyObject *obj, int nullable, pcl_Handle **out);\n",
        m.helper("to_native")
    ));
    out.push_str("/* New host value converted from a borrowed native value */\n");
    out.push_str(&format!(
        "PyObject *{}(pcl_Handle *handle);\n",
        m.helper("to_host")
    ));
    out.push_str(&format!("void {}({} *self);\n", m.helper("release"), w));
    out.push_str(&format!(
        "PyObject *{}(PyObject *self, PyObject *unused);\n",
        m.helper("release_method")
    ));
    out.push_str(&format!("void {}(PyObject *self);\n\n", m.helper("dealloc")));
    out.push_str(&format!("#endif /* {} */\n", guard));
    out
}

/// The module definition and the helpers declared in the module header.
/// `classes` are (class, attribute name) pairs in ladder order.
pub fn module_source(m: &ModuleSyms, classes: &[(&ClassNode, String)]) -> String {
    let mut out = String::new();
    out.push_str(&format!("#include \"{}\"\n\n", m.header_name()));
    gen_type_table(m, classes, &mut out);
    gen_wrap(m, &mut out);
    gen_unwrap(m, &mut out);
    gen_release(m, &mut out);
    gen_to_native(m, &mut out);
    gen_to_host(m, &mut out);
    gen_init(m, classes, &mut out);
    out
}

fn gen_type_table(m: &ModuleSyms, classes: &[(&ClassNode, String)], out: &mut String) {
    out.push_str(&format!(
        "static const struct {{\n    const pcl_VTable *vtable;\n    PyTypeObject *type;\n}} {}[] = {{\n",
        m.helper("types")
    ));
    for (node, _) in classes {
        out.push_str(&format!(
            "    {{&{}.base, &{}}},\n",
            ClassSyms::new(node).vtable_var(),
            WrapperSyms::new(node).type_object()
        ));
    }
    out.push_str("};\n\n");
    out.push_str("/* Wrapper type of the nearest published class of the object */\n");
    out.push_str(&format!(
        "static PyTypeObject*\n{}(void *native, PyTypeObject *fallback) {{\n",
        m.helper("type_of")
    ));
    out.push_str("    const pcl_VTable *vt = ((pcl_Obj*)native)->vtable;\n");
    out.push_str("    for (; vt != NULL; vt = vt->parent) {\n");
    out.push_str(&format!(
        "        for (size_t i = 0; i < {}; i++) {{\n",
        classes.len()
    ));
    out.push_str(&format!(
        "            if ({}[i].vtable == vt) {{ return {}[i].type; }}\n",
        m.helper("types"),
        m.helper("types")
    ));
    out.push_str("        }\n    }\n    return fallback;\n}\n\n");
}

fn gen_wrap(m: &ModuleSyms, out: &mut String) {
    let w = m.wrapper_struct();
    out.push_str(&format!(
        "PyObject*\n{}(PyTypeObject *type, void *native) {{\n",
        m.helper("wrap")
    ));
    out.push_str("    if (native == NULL) { Py_RETURN_NONE; }\n");
    out.push_str(&format!(
        "    type = {}(native, type);\n",
        m.helper("type_of")
    ));
    out.push_str(&format!(
        "    {} *self = ({}*)type->tp_alloc(type, 0);\n",
        w, w
    ));
    out.push_str("    if (self == NULL) {\n        pcl_decref(native);\n        return NULL;\n    }\n");
    out.push_str("    self->native = native;\n    self->released = 0;\n");
    out.push_str("    return (PyObject*)self;\n}\n\n");
}

fn gen_unwrap(m: &ModuleSyms, out: &mut String) {
    let w = m.wrapper_struct();
    out.push_str(&format!(
        "int\n{}(PyObject *obj, PyTypeObject *type, int nullable, void **out) {{\n",
        m.helper("unwrap")
    ));
    out.push_str("    if (obj == Py_None && nullable) {\n        *out = NULL;\n        return 0;\n    }\n");
    out.push_str("    if (!PyObject_TypeCheck(obj, type)) {\n");
    out.push_str("        PyErr_Format(PyExc_TypeError, \"expected %s, got %s\", type->tp_name,\n");
    out.push_str("                     Py_TYPE(obj)->tp_name);\n");
    out.push_str("        return -1;\n    }\n");
    out.push_str(&format!("    if ((({}*)obj)->released) {{\n", w));
    out.push_str("        PyErr_SetString(PyExc_ValueError, \"object is already released\");\n");
    out.push_str("        return -1;\n    }\n");
    out.push_str(&format!("    *out = (({}*)obj)->native;\n", w));
    out.push_str("    return 0;\n}\n\n");
}

/// The only place which gives back the reference held by a wrapper
fn gen_release(m: &ModuleSyms, out: &mut String) {
    let w = m.wrapper_struct();
    out.push_str(&format!("void\n{}({} *self) {{\n", m.helper("release"), w));
    out.push_str("    if (!self->released) {\n");
    out.push_str("        self->released = 1;\n");
    out.push_str("        pcl_decref(self->native);\n");
    out.push_str("        self->native = NULL;\n");
    out.push_str("    }\n}\n\n");
    out.push_str(&format!(
        "PyObject*\n{}(PyObject *self, PyObject *unused) {{\n",
        m.helper("release_method")
    ));
    out.push_str(&format!(
        "    {}(({}*)self);\n    Py_RETURN_NONE;\n}}\n\n",
        m.helper("release"),
        w
    ));
    out.push_str(&format!("void\n{}(PyObject *self) {{\n", m.helper("dealloc")));
    out.push_str(&format!(
        "    {}(({}*)self);\n    Py_TYPE(self)->tp_free(self);\n}}\n\n",
        m.helper("release"),
        w
    ));
}

fn gen_to_native(m: &ModuleSyms, out: &mut String) {
    let f = m.helper("to_native");
    out.push_str(&format!(
        "int\n{}(PyObject *obj, int nullable, pcl_Handle **out) {{\n",
        f
    ));
    out.push_str("    if (obj == Py_None) {\n");
    out.push_str("        if (!nullable) {\n");
    out.push_str("            PyErr_SetString(PyExc_TypeError, \"None is not allowed here\");\n");
    out.push_str("            return -1;\n        }\n");
    out.push_str("        *out = NULL;\n        return 0;\n    }\n");
    out.push_str("    if (PyBool_Check(obj)) {\n");
    out.push_str("        *out = pcl_Boolean_new(obj == Py_True);\n        return 0;\n    }\n");
    out.push_str("    if (PyLong_Check(obj)) {\n");
    out.push_str("        long long value = PyLong_AsLongLong(obj);\n");
    out.push_str("        if (value == -1 && PyErr_Occurred()) { return -1; }\n");
    out.push_str("        *out = pcl_Integer_new((int64_t)value);\n        return 0;\n    }\n");
    out.push_str("    if (PyFloat_Check(obj)) {\n");
    out.push_str("        *out = pcl_Float_new(PyFloat_AsDouble(obj));\n        return 0;\n    }\n");
    out.push_str("    if (PyUnicode_Check(obj)) {\n");
    out.push_str("        Py_ssize_t size;\n");
    out.push_str("        const char *ptr = PyUnicode_AsUTF8AndSize(obj, &size);\n");
    out.push_str("        if (ptr == NULL) { return -1; }\n");
    out.push_str("        *out = pcl_String_new(ptr, (size_t)size);\n        return 0;\n    }\n");
    out.push_str("    if (PyList_Check(obj)) {\n");
    out.push_str("        Py_ssize_t size = PyList_GET_SIZE(obj);\n");
    out.push_str("        pcl_Vector *vec = pcl_Vector_new((size_t)size);\n");
    out.push_str("        for (Py_ssize_t i = 0; i < size; i++) {\n");
    out.push_str("            pcl_Handle *elem;\n");
    out.push_str(&format!(
        "            if ({}(PyList_GET_ITEM(obj, i), 1, &elem) < 0) {{\n",
        f
    ));
    out.push_str("                pcl_handle_decref(vec);\n                return -1;\n            }\n");
    out.push_str("            pcl_Vector_Push(vec, elem);\n        }\n");
    out.push_str("        *out = vec;\n        return 0;\n    }\n");
    out.push_str("    if (PyDict_Check(obj)) {\n");
    out.push_str("        pcl_Hash *hash = pcl_Hash_new((size_t)PyDict_Size(obj));\n");
    out.push_str("        PyObject *key, *value;\n        Py_ssize_t pos = 0;\n");
    out.push_str("        while (PyDict_Next(obj, &pos, &key, &value)) {\n");
    out.push_str("            pcl_Handle *native_key, *native_value;\n");
    out.push_str("            if (!PyUnicode_Check(key)) {\n");
    out.push_str("                PyErr_SetString(PyExc_TypeError, \"dict keys must be str\");\n");
    out.push_str("                pcl_handle_decref(hash);\n                return -1;\n            }\n");
    out.push_str(&format!(
        "            if ({}(key, 0, &native_key) < 0) {{\n",
        f
    ));
    out.push_str("                pcl_handle_decref(hash);\n                return -1;\n            }\n");
    out.push_str(&format!(
        "            if ({}(value, 1, &native_value) < 0) {{\n",
        f
    ));
    out.push_str("                pcl_handle_decref(native_key);\n");
    out.push_str("                pcl_handle_decref(hash);\n                return -1;\n            }\n");
    out.push_str("            pcl_Hash_Store(hash, native_key, native_value);\n        }\n");
    out.push_str("        *out = hash;\n        return 0;\n    }\n");
    out.push_str("    PyErr_Format(PyExc_TypeError, \"cannot convert %s to a native value\",\n");
    out.push_str("                 Py_TYPE(obj)->tp_name);\n");
    out.push_str("    return -1;\n}\n\n");
}

fn gen_to_host(m: &ModuleSyms, out: &mut String) {
    let f = m.helper("to_host");
    out.push_str(&format!("PyObject*\n{}(pcl_Handle *handle) {{\n", f));
    out.push_str("    if (handle == NULL) { Py_RETURN_NONE; }\n");
    out.push_str("    switch (pcl_handle_kind(handle)) {\n");
    out.push_str("    case PCL_KIND_STRING:\n");
    out.push_str("        return PyUnicode_FromStringAndSize(pcl_String_Get_Ptr(handle),\n");
    out.push_str("                                           (Py_ssize_t)pcl_String_Get_Size(handle));\n");
    out.push_str("    case PCL_KIND_INTEGER:\n");
    out.push_str("        return PyLong_FromLongLong((long long)pcl_Integer_Get_Value(handle));\n");
    out.push_str("    case PCL_KIND_FLOAT:\n");
    out.push_str("        return PyFloat_FromDouble(pcl_Float_Get_Value(handle));\n");
    out.push_str("    case PCL_KIND_BOOLEAN:\n");
    out.push_str("        return PyBool_FromLong(pcl_Boolean_Get_Value(handle));\n");
    out.push_str("    case PCL_KIND_VECTOR: {\n");
    out.push_str("        size_t size = pcl_Vector_Get_Size(handle);\n");
    out.push_str("        PyObject *list = PyList_New((Py_ssize_t)size);\n");
    out.push_str("        if (list == NULL) { return NULL; }\n");
    out.push_str("        for (size_t i = 0; i < size; i++) {\n");
    out.push_str(&format!(
        "            PyObject *elem = {}(pcl_Vector_Fetch(handle, i));\n",
        f
    ));
    out.push_str("            if (elem == NULL) {\n                Py_DECREF(list);\n                return NULL;\n            }\n");
    out.push_str("            PyList_SET_ITEM(list, (Py_ssize_t)i, elem);\n        }\n");
    out.push_str("        return list;\n    }\n");
    out.push_str("    case PCL_KIND_HASH: {\n");
    out.push_str("        PyObject *dict = PyDict_New();\n");
    out.push_str("        if (dict == NULL) { return NULL; }\n");
    out.push_str("        pcl_Vector *keys = pcl_Hash_Keys(handle);\n");
    out.push_str("        size_t size = pcl_Vector_Get_Size(keys);\n");
    out.push_str("        for (size_t i = 0; i < size; i++) {\n");
    out.push_str("            pcl_Handle *key = pcl_Vector_Fetch(keys, i);\n");
    out.push_str(&format!("            PyObject *k = {}(key);\n", f));
    out.push_str(&format!(
        "            PyObject *v = k == NULL ? NULL : {}(pcl_Hash_Fetch(handle, key));\n",
        f
    ));
    out.push_str("            if (v == NULL || PyDict_SetItem(dict, k, v) < 0) {\n");
    out.push_str("                Py_XDECREF(k);\n                Py_XDECREF(v);\n");
    out.push_str("                Py_DECREF(dict);\n                pcl_handle_decref(keys);\n");
    out.push_str("                return NULL;\n            }\n");
    out.push_str("            Py_DECREF(k);\n            Py_DECREF(v);\n        }\n");
    out.push_str("        pcl_handle_decref(keys);\n        return dict;\n    }\n");
    out.push_str("    }\n");
    out.push_str("    PyErr_SetString(PyExc_TypeError, \"unknown native value\");\n");
    out.push_str("    return NULL;\n}\n\n");
}

/// Readies the wrapper types parents first and registers them
fn gen_init(m: &ModuleSyms, classes: &[(&ClassNode, String)], out: &mut String) {
    let ext = m.ext_name();
    out.push_str(&format!(
        "static struct PyModuleDef {}_module = {{\n    PyModuleDef_HEAD_INIT,\n    \"{}\",\n    NULL,\n    -1,\n    NULL\n}};\n\n",
        m.module, ext
    ));
    out.push_str(&format!("PyMODINIT_FUNC\nPyInit_{}(void) {{\n", ext));
    out.push_str(&format!(
        "    PyObject *module = PyModule_Create(&{}_module);\n",
        m.module
    ));
    out.push_str("    if (module == NULL) { return NULL; }\n");
    for (node, py_name) in classes {
        let t = WrapperSyms::new(node).type_object();
        out.push_str(&format!("    if (PyType_Ready(&{}) < 0) {{ goto error; }}\n", t));
        out.push_str(&format!("    Py_INCREF(&{});\n", t));
        out.push_str(&format!(
            "    if (PyModule_AddObject(module, \"{}\", (PyObject*)&{}) < 0) {{\n",
            py_name, t
        ));
        out.push_str(&format!("        Py_DECREF(&{});\n        goto error;\n    }}\n", t));
    }
    out.push_str("    return module;\n\nerror:\n    Py_DECREF(module);\n    return NULL;\n}\n");
}
