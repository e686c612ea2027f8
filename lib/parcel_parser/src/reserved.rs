//! Identifiers which the generated C and host glue already use
use parcel_ast::names::ParcelName;
use parcel_ast::Primitive;

const C_KEYWORDS: [&str; 44] = [
    "auto", "break", "case", "char", "const", "continue", "default", "do", "double", "else",
    "enum", "extern", "float", "for", "goto", "if", "inline", "int", "long", "register",
    "restrict", "return", "short", "signed", "sizeof", "static", "struct", "switch", "typedef",
    "union", "unsigned", "void", "volatile", "while", "_Alignas", "_Alignof", "_Atomic",
    "_Bool", "_Complex", "_Generic", "_Imaginary", "_Noreturn", "_Static_assert",
    "_Thread_local",
];

/// Other names with a fixed meaning in the generated sources
const C_RESERVED: [&str; 4] = ["true", "false", "NULL", "bool"];

/// Prefixes of the runtime and CPython symbols
const RESERVED_PREFIXES: [&str; 4] = ["pcl_", "PCL_", "Py", "_Py"];

/// Members of `PCL_OBJ_HEAD`
const RESERVED_ATTRIBUTES: [&str; 2] = ["refcount", "vtable"];

/// `new`/`init`/`destroy` are the lifecycle functions, `base` is the first
/// member of every vtable, `release` is a method of every host wrapper and
/// `VTable`/`HostType` would name the class's own structs.
const RESERVED_METHODS: [&str; 7] = ["new", "init", "destroy", "base", "release", "VTable", "HostType"];

/// `<struct>_host_<M>` names trampolines
const RESERVED_METHOD_PREFIXES: [&str; 1] = ["host_"];

/// `<struct>_<M>_t`, `<struct>_<M>_IMP` and `<struct>_<M>_ABSTRACT` are
/// derived from every method name
const RESERVED_METHOD_SUFFIXES: [&str; 3] = ["_t", "_IMP", "_ABSTRACT"];

/// Locals of dispatch wrappers and trampolines
const RESERVED_PARAMS: [&str; 8] = [
    "self", "vt", "result", "retval", "truth", "args", "unused", "py_self",
];

/// Trampolines keep the host argument of `x` in `py_x`
const RESERVED_PARAM_PREFIX: &str = "py_";

/// Suffix of the per-parcel header (`<prefix>parcel.h`)
const PARCEL_HEADER_CLASS: &str = "PARCEL";

/// Include guard of the runtime header, without `H_`
const RUNTIME_HEADER_GUARD: &str = "PARCEL_RUNTIME";

/// Returns an error message if `name` cannot be used as a C identifier
fn check_identifier(what: &str, name: &str) -> Result<(), String> {
    if C_KEYWORDS.contains(&name) {
        return Err(format!("{} name `{}` is a C keyword", what, name));
    }
    if C_RESERVED.contains(&name) || Primitive::from_name(name).is_some() {
        return Err(format!("{} name `{}` is reserved", what, name));
    }
    if let Some(prefix) = RESERVED_PREFIXES.iter().find(|p| name.starts_with(*p)) {
        return Err(format!(
            "{} name `{}` must not start with `{}`",
            what, name, prefix
        ));
    }
    Ok(())
}

pub fn check_attribute_name(name: &str) -> Result<(), String> {
    check_identifier("attribute", name)?;
    if RESERVED_ATTRIBUTES.contains(&name) {
        return Err(format!("attribute name `{}` is reserved", name));
    }
    Ok(())
}

pub fn check_method_name(name: &str) -> Result<(), String> {
    check_identifier("method", name)?;
    let reserved = RESERVED_METHODS.contains(&name)
        || RESERVED_METHOD_PREFIXES.iter().any(|p| name.starts_with(p))
        || RESERVED_METHOD_SUFFIXES.iter().any(|s| name.ends_with(s));
    if reserved {
        return Err(format!("method name `{}` is reserved", name));
    }
    Ok(())
}

/// Parameters share the scope of the generated locals and of the symbols of
/// the parcel, so they must not look like either.
pub fn check_param_name(parcel: &ParcelName, name: &str) -> Result<(), String> {
    check_identifier("parameter", name)?;
    if RESERVED_PARAMS.contains(&name) || name.starts_with(RESERVED_PARAM_PREFIX) {
        return Err(format!("parameter name `{}` is reserved", name));
    }
    let prefix = parcel.prefix();
    let typelike = name
        .split('_')
        .skip(1)
        .any(|part| part.starts_with(|c: char| c.is_ascii_uppercase()));
    if name.starts_with(&prefix) || typelike {
        return Err(format!(
            "parameter name `{}` may clash with a C symbol of parcel {}",
            name, parcel
        ));
    }
    Ok(())
}

/// `name` is the last component of a class name
pub fn check_class_name(parcel: &ParcelName, name: &str) -> Result<(), String> {
    if name.contains('_') {
        return Err(format!("class name `{}` must not contain `_`", name));
    }
    let upper = name.to_uppercase();
    let full_upper = format!("{}{}", parcel.upper_prefix(), upper);
    if upper == PARCEL_HEADER_CLASS || full_upper == RUNTIME_HEADER_GUARD {
        return Err(format!(
            "class name `{}` is reserved in parcel {}",
            name, parcel
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use parcel_ast::names::parcel_name;

    #[test]
    fn test_method_names() {
        assert!(check_method_name("Bark").is_ok());
        assert!(check_method_name("Get_Size").is_ok());
        assert!(check_method_name("base").is_err());
        assert!(check_method_name("host_Bark").is_err());
        assert!(check_method_name("Bark_t").is_err());
        assert!(check_method_name("Bark_IMP").is_err());
        assert!(check_method_name("while").is_err());
    }

    #[test]
    fn test_param_names() {
        let zoo = parcel_name("Zoo");
        assert!(check_param_name(&zoo, "hours").is_ok());
        assert!(check_param_name(&zoo, "max_hours").is_ok());
        assert!(check_param_name(&zoo, "vt").is_err());
        assert!(check_param_name(&zoo, "py_hours").is_err());
        assert!(check_param_name(&zoo, "int32_t").is_err());
        assert!(check_param_name(&zoo, "size_t").is_err());
        assert!(check_param_name(&zoo, "PyObject").is_err());
        assert!(check_param_name(&zoo, "zoo_unwrap").is_err());
        assert!(check_param_name(&zoo, "farm_Cow").is_err());
    }

    #[test]
    fn test_class_names() {
        let zoo = parcel_name("Zoo");
        assert!(check_class_name(&zoo, "Dog").is_ok());
        assert!(check_class_name(&zoo, "Hot_Dog").is_err());
        assert!(check_class_name(&zoo, "Parcel").is_err());
        assert!(check_class_name(&zoo, "Runtime").is_ok());
        assert!(check_class_name(&parcel_name("Parcel"), "Runtime").is_err());
    }
}
