use crate::c_type::ClassSyms;
use pcc_hierarchy::{Hierarchy, Parcel};

/// `include/<prefix>parcel.h`
pub fn parcel_header_path(parcel: &Parcel) -> String {
    format!("include/{}parcel.h", parcel.prefix)
}

/// `source/<prefix>parcel.c`
pub fn parcel_source_path(parcel: &Parcel) -> String {
    format!("source/{}parcel.c", parcel.prefix)
}

fn vtables_var(parcel: &Parcel) -> String {
    format!("{}VTABLES", parcel.name.upper_prefix())
}

/// Struct typedefs of every class of the parcel
pub fn parcel_header(h: &Hierarchy, parcel: &Parcel) -> String {
    let guard = format!("H_{}PARCEL", parcel.name.upper_prefix());
    let mut out = String::new();
    out.push_str(&format!("#ifndef {}\n#define {} 1\n\n", guard, guard));
    out.push_str("#include \"parcel_runtime.h\"\n\n");
    for node in h.parcel_classes(parcel) {
        let sym = node.struct_sym();
        out.push_str(&format!("typedef struct {} {};\n", sym, sym));
    }
    out.push('\n');
    out.push_str(&format!(
        "extern const pcl_VTable *const {}[];\n",
        vtables_var(parcel)
    ));
    out.push_str(&format!(
        "extern const size_t {}NUM_VTABLES;\n\n",
        parcel.name.upper_prefix()
    ));
    out.push_str(&format!("#endif /* {} */\n", guard));
    out
}

/// Table of the vtables of the parcel, parents first
pub fn parcel_source(h: &Hierarchy, parcel: &Parcel) -> String {
    let classes = h.parcel_classes(parcel).collect::<Vec<_>>();
    let mut out = String::new();
    out.push_str(&format!("#include \"{}parcel.h\"\n", parcel.prefix));
    for node in &classes {
        out.push_str(&format!("#include \"{}\"\n", ClassSyms::new(node).header_path()));
    }
    out.push('\n');
    out.push_str(&format!(
        "const pcl_VTable *const {}[] = {{\n",
        vtables_var(parcel)
    ));
    for node in &classes {
        out.push_str(&format!("    &{}.base,\n", ClassSyms::new(node).vtable_var()));
    }
    out.push_str("};\n\n");
    out.push_str(&format!(
        "const size_t {}NUM_VTABLES = {};\n",
        parcel.name.upper_prefix(),
        classes.len()
    ));
    out
}
