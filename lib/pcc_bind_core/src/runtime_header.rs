/// Path of the shared runtime header, relative to the destination
pub const RUNTIME_HEADER: &str = "include/parcel_runtime.h";

/// Kinds of runtime values, numbered as `pcl_handle_kind` returns them
pub const HANDLE_KINDS: [&str; 6] = ["String", "Integer", "Float", "Boolean", "Vector", "Hash"];

/// Body of `parcel_runtime.h`
pub fn runtime_header() -> String {
    let mut out = String::new();
    out.push_str("#ifndef H_PARCEL_RUNTIME\n#define H_PARCEL_RUNTIME 1\n\n");
    out.push_str("#include \"charmony.h\"\n");
    out.push_str("#include <stddef.h>\n#include <stdint.h>\n#include <stdbool.h>\n\n");
    out.push_str(
        "/* Refcounts are not atomic. An object must only be touched by one thread. */\n\n",
    );
    out.push_str("typedef struct pcl_VTable pcl_VTable;\n");
    out.push_str("typedef struct pcl_Obj pcl_Obj;\n");
    out.push_str("typedef void (*pcl_destroy_t)(void *self);\n\n");
    out.push_str("struct pcl_VTable {\n");
    out.push_str("    const char *name;\n");
    out.push_str("    const pcl_VTable *parent;\n");
    out.push_str("    size_t obj_size;\n");
    out.push_str("    pcl_destroy_t destroy;\n");
    out.push_str("    uint32_t num_slots;\n");
    out.push_str("};\n\n");
    out.push_str("#define PCL_OBJ_HEAD \\\n");
    out.push_str("    uint32_t refcount; \\\n");
    out.push_str("    const pcl_VTable *vtable;\n\n");
    out.push_str("struct pcl_Obj {\n    PCL_OBJ_HEAD\n};\n\n");

    out.push_str("/* Provided by the runtime library */\n");
    out.push_str("void *pcl_allocate(size_t size);\n");
    out.push_str("void pcl_free(void *ptr);\n");
    out.push_str("void pcl_die(const char *msg);\n\n");

    out.push_str("static CHY_INLINE void*\npcl_incref(void *vself) {\n");
    out.push_str("    pcl_Obj *self = (pcl_Obj*)vself;\n");
    out.push_str("    if (self != NULL) { self->refcount++; }\n");
    out.push_str("    return vself;\n}\n\n");
    out.push_str("static CHY_INLINE uint32_t\npcl_decref(void *vself) {\n");
    out.push_str("    pcl_Obj *self = (pcl_Obj*)vself;\n");
    out.push_str("    if (self == NULL) { return 0; }\n");
    out.push_str("    if (self->refcount == 1) {\n");
    out.push_str("        self->refcount = 0;\n");
    out.push_str("        self->vtable->destroy(self);\n");
    out.push_str("        return 0;\n");
    out.push_str("    }\n");
    out.push_str("    return --self->refcount;\n}\n\n");

    out.push_str("/* Containers of the runtime library */\n");
    out.push_str("typedef struct pcl_Handle pcl_Handle;\n");
    out.push_str("typedef pcl_Handle pcl_String;\n");
    out.push_str("typedef pcl_Handle pcl_Hash;\n");
    out.push_str("typedef pcl_Handle pcl_Vector;\n\n");
    out.push_str("pcl_Handle *pcl_handle_incref(pcl_Handle *handle);\n");
    out.push_str("uint32_t pcl_handle_decref(pcl_Handle *handle);\n");
    out.push_str("uint32_t pcl_handle_refcount(pcl_Handle *handle);\n");
    out.push_str("uint32_t pcl_handle_kind(pcl_Handle *handle);\n\n");
    for (i, kind) in HANDLE_KINDS.iter().enumerate() {
        out.push_str(&format!("#define PCL_KIND_{} {}\n", kind.to_uppercase(), i));
    }
    out.push('\n');
    out.push_str("pcl_String *pcl_String_new(const char *ptr, size_t size);\n");
    out.push_str("const char *pcl_String_Get_Ptr(pcl_String *self);\n");
    out.push_str("size_t pcl_String_Get_Size(pcl_String *self);\n");
    out.push_str("pcl_Handle *pcl_Integer_new(int64_t value);\n");
    out.push_str("int64_t pcl_Integer_Get_Value(pcl_Handle *self);\n");
    out.push_str("pcl_Handle *pcl_Float_new(double value);\n");
    out.push_str("double pcl_Float_Get_Value(pcl_Handle *self);\n");
    out.push_str("pcl_Handle *pcl_Boolean_new(bool value);\n");
    out.push_str("bool pcl_Boolean_Get_Value(pcl_Handle *self);\n\n");
    out.push_str("/* Store and Push take over the references of their arguments.\n");
    out.push_str(" * Fetch returns a borrowed reference; Delete and Keys return a new one. */\n");
    out.push_str("pcl_Hash *pcl_Hash_new(size_t capacity);\n");
    out.push_str("void pcl_Hash_Store(pcl_Hash *self, pcl_Handle *key, pcl_Handle *value);\n");
    out.push_str("pcl_Handle *pcl_Hash_Fetch(pcl_Hash *self, pcl_Handle *key);\n");
    out.push_str("pcl_Handle *pcl_Hash_Delete(pcl_Hash *self, pcl_Handle *key);\n");
    out.push_str("bool pcl_Hash_Has_Key(pcl_Hash *self, pcl_Handle *key);\n");
    out.push_str("size_t pcl_Hash_Get_Size(pcl_Hash *self);\n");
    out.push_str("pcl_Vector *pcl_Hash_Keys(pcl_Hash *self);\n");
    out.push_str("pcl_Vector *pcl_Vector_new(size_t capacity);\n");
    out.push_str("void pcl_Vector_Push(pcl_Vector *self, pcl_Handle *value);\n");
    out.push_str("pcl_Handle *pcl_Vector_Fetch(pcl_Vector *self, size_t tick);\n");
    out.push_str("size_t pcl_Vector_Get_Size(pcl_Vector *self);\n\n");
    out.push_str("#endif /* H_PARCEL_RUNTIME */\n");
    out
}
