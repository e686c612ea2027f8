//! Generates CPython glue for the classes of the published parcels.
//!
//! Every wrapper owns exactly one reference to its native object and gives
//! it back exactly once, either on `release()` or when the host collects it.
mod class_bundle;
mod host_syms;
mod module_files;
mod touch;
mod trampoline;
pub use crate::host_syms::{ModuleSyms, WrapperSyms};
pub use crate::touch::touch_dependents;
use parcel_ast::names::ParcelName;
use pcc_artifact::{GeneratedArtifact, Generator};
use pcc_bind_core::decorate;
use pcc_hierarchy::{ClassNode, Hierarchy, ObjectClass, ObjectTy};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct HostOptions {
    /// Parcels whose classes are published to the host
    pub parcels: Vec<ParcelName>,
    /// Name of the host module
    pub module: String,
}

/// Generated glue of a host module
#[derive(Debug)]
pub struct HostOutput {
    pub artifacts: Vec<GeneratedArtifact>,
    /// Symbol that hand-written sources use to refer to each artifact
    pub symbols: HashMap<PathBuf, String>,
}

impl HostOutput {
    /// Returns the symbols of the artifacts at `paths`
    pub fn symbols_of<'a>(&'a self, paths: impl IntoIterator<Item = &'a PathBuf>) -> Vec<&'a str> {
        let mut v = paths
            .into_iter()
            .filter_map(|p| self.symbols.get(p))
            .map(|s| s.as_str())
            .collect::<Vec<_>>();
        v.sort();
        v
    }
}

pub struct HostBinding<'h> {
    hierarchy: &'h Hierarchy,
    options: HostOptions,
    header: String,
    footer: String,
}

impl<'h> HostBinding<'h> {
    pub fn new(
        hierarchy: &'h Hierarchy,
        options: HostOptions,
        header: &str,
        footer: &str,
    ) -> HostBinding<'h> {
        HostBinding {
            hierarchy,
            options,
            header: header.to_string(),
            footer: footer.to_string(),
        }
    }

    /// Classes of the published parcels, the classes their public methods
    /// take or return and the ancestors of all of them, parents first
    pub fn reachable_classes(&self) -> Vec<&'h ClassNode> {
        let h = self.hierarchy;
        let mut reachable = HashSet::new();
        let mut queue = vec![];
        for name in &self.options.parcels {
            let Some(parcel) = h.find_parcel(name) else {
                log::warn!("parcel {} is not declared", name);
                continue;
            };
            queue.extend(h.parcel_classes(parcel));
        }
        while let Some(node) = queue.pop() {
            if !reachable.insert(node.id) {
                continue;
            }
            queue.extend(h.ancestors(node));
            for method in node.methods.iter().filter(|m| m.is_public) {
                let sig = &method.signature;
                let tys = std::iter::once(&sig.ret_ty).chain(sig.params.iter().map(|p| &p.ty));
                for ty in tys {
                    if let Some(ObjectTy {
                        class: ObjectClass::Class(name),
                        ..
                    }) = ty.as_object()
                    {
                        queue.extend(h.find(name));
                    }
                }
            }
        }
        h.ladder().filter(|n| reachable.contains(&n.id)).collect()
    }

    pub fn generate(&self) -> HostOutput {
        let h = self.hierarchy;
        let m = ModuleSyms::new(&self.options.module);
        let classes = self.reachable_classes();
        let mut output = HostOutput {
            artifacts: vec![],
            symbols: HashMap::new(),
        };
        if classes.is_empty() {
            log::warn!("no classes are published to the host module {}", m.module);
            return output;
        }
        let named = py_names(&classes);

        let header_path = PathBuf::from(format!("{}/{}", m.dir(), m.header_name()));
        output.symbols.insert(header_path.clone(), m.header_name());
        output.artifacts.push(self.artifact(
            header_path,
            module_files::module_header(&m, &classes),
        ));
        output.artifacts.push(self.artifact(
            format!("{}/{}.c", m.dir(), m.ext_name()),
            module_files::module_source(&m, &named),
        ));
        for (node, py_name) in &named {
            let path = PathBuf::from(format!(
                "{}/{}_host.c",
                m.dir(),
                node.fullname.path_part()
            ));
            output
                .symbols
                .insert(path.clone(), WrapperSyms::new(node).type_object());
            output.artifacts.push(self.artifact(
                path,
                class_bundle::class_bundle(h, &m, node, py_name),
            ));
        }
        log::debug!(
            "host binding: {} classes in module {}",
            named.len(),
            m.module
        );
        output
    }

    fn artifact(&self, path: impl Into<PathBuf>, body: String) -> GeneratedArtifact {
        GeneratedArtifact::new(
            Generator::Host,
            path,
            decorate(&self.header, &self.footer, &body),
        )
    }
}

/// Host attribute name of each class. The last component of the class name
/// is used unless two classes share it.
fn py_names<'h>(classes: &[&'h ClassNode]) -> Vec<(&'h ClassNode, String)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for node in classes {
        *counts.entry(node.fullname.last_component()).or_default() += 1;
    }
    classes
        .iter()
        .map(|node| {
            let last = node.fullname.last_component();
            let name = if counts[last] > 1 {
                node.struct_sym()
            } else {
                last.to_string()
            };
            (*node, name)
        })
        .collect()
}
