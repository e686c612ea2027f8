use parcel_ast::names::MethodName;
use pcc_hierarchy::ClassNode;

/// Symbols of the host glue of a module
#[derive(Debug, Clone)]
pub struct ModuleSyms {
    /// eg. `hello`
    pub module: String,
}

impl ModuleSyms {
    pub fn new(module: &str) -> ModuleSyms {
        ModuleSyms {
            module: module.to_string(),
        }
    }

    /// Name of the extension module (eg. `_hello`)
    pub fn ext_name(&self) -> String {
        format!("_{}", self.module)
    }

    /// eg. `hello_host.h`
    pub fn header_name(&self) -> String {
        format!("{}_host.h", self.module)
    }

    pub fn dir(&self) -> String {
        format!("host/{}", self.module)
    }

    /// Lowercase like every module symbol, so it never meets a class symbol
    pub fn wrapper_struct(&self) -> String {
        format!("{}_wrapper", self.module)
    }

    /// Include guard of the module header
    pub fn guard(&self) -> String {
        format!("H_{}_host", self.module)
    }

    /// Name of a helper function (eg. `hello_wrap`)
    pub fn helper(&self, name: &str) -> String {
        format!("{}_{}", self.module, name)
    }
}

/// Symbols of the host glue of a class
#[derive(Debug, Clone)]
pub struct WrapperSyms {
    pub struct_sym: String,
}

impl WrapperSyms {
    pub fn new(node: &ClassNode) -> WrapperSyms {
        WrapperSyms {
            struct_sym: node.struct_sym(),
        }
    }

    /// The type object (eg. `zoo_Dog_HostType`). Hand-written sources
    /// refer to a class by this symbol.
    pub fn type_object(&self) -> String {
        format!("{}_HostType", self.struct_sym)
    }

    pub fn trampoline(&self, name: &MethodName) -> String {
        format!("{}_host_{}", self.struct_sym, name)
    }

    pub fn methods_table(&self) -> String {
        format!("{}_host_methods", self.struct_sym)
    }

    pub fn new_fn(&self) -> String {
        format!("{}_host_new", self.struct_sym)
    }
}
