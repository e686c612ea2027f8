use crate::class_node::*;
use crate::error::*;
use crate::ty::*;
use crate::vtable::{Slot, VTable};
use crate::{Hierarchy, Parcel};
use parcel_ast::names::*;
use parcel_ast::*;
use std::collections::{BTreeMap, HashMap};

/// Link class records into a Hierarchy.
///
/// 1. index records by name (duplicates are rejected)
/// 2. resolve parents
/// 3. order classes parent-first
/// 4. materialize attributes and vtables in that order
pub fn build(mut records: Vec<ClassRecord>) -> Result<Hierarchy, Error> {
    // Stable, so the first loaded one of duplicates comes first
    records.sort_by(|a, b| a.fullname.cmp(&b.fullname));
    let index = index_records(&records)?;
    let parents = resolve_parents(&records, &index)?;
    let ladder = ladder_order(&records, &parents)?;
    let mut linker = Linker {
        records: &records,
        index: &index,
        parents: &parents,
        nodes: vec![None; records.len()],
    };
    for i in &ladder {
        let node = linker.link_class(*i)?;
        linker.nodes[*i] = Some(node);
    }
    let mut nodes = linker
        .nodes
        .into_iter()
        .flatten()
        .collect::<Vec<ClassNode>>();
    debug_assert_eq!(nodes.len(), records.len());
    for i in &ladder {
        if let Some(p) = parents[*i] {
            nodes[p].children.push(ClassId(*i));
        }
    }

    let mut by_parcel: BTreeMap<ParcelName, (Vec<ClassFullname>, bool)> = BTreeMap::new();
    for i in &ladder {
        let node = &nodes[*i];
        let entry = by_parcel
            .entry(node.parcel.clone())
            .or_insert_with(|| (vec![], true));
        entry.0.push(node.fullname.clone());
        entry.1 &= node.is_included;
    }
    let parcels = by_parcel
        .into_iter()
        .map(|(name, (classes, included))| Parcel {
            prefix: name.prefix(),
            name,
            classes,
            included,
        })
        .collect::<Vec<_>>();
    log::debug!(
        "linked {} classes in {} parcels",
        nodes.len(),
        parcels.len()
    );
    Ok(Hierarchy {
        nodes,
        index: index
            .into_iter()
            .map(|(name, i)| (name, ClassId(i)))
            .collect(),
        ladder: ladder.into_iter().map(ClassId).collect(),
        parcels,
    })
}

/// Index records by fullname. Also rejects two classes which would have
/// the same C struct name or the same uppercase name.
fn index_records(records: &[ClassRecord]) -> Result<HashMap<ClassFullname, usize>, Error> {
    let mut index = HashMap::new();
    let mut syms: HashMap<String, usize> = HashMap::new();
    let mut upper_syms: HashMap<String, usize> = HashMap::new();
    for (i, record) in records.iter().enumerate() {
        if let Some(first) = index.get(&record.fullname) {
            let first: &ClassRecord = &records[*first];
            return Err(duplicate_class(
                format!("class `{}` is already declared", record.fullname),
                &record.locs,
                &first.locs,
            ));
        }
        let sym = struct_sym(&record.parcel, &record.fullname);
        if let Some(first) = syms.get(&sym) {
            let first: &ClassRecord = &records[*first];
            return Err(duplicate_class(
                format!(
                    "class `{}` conflicts with `{}` (both are named `{}` in C)",
                    record.fullname, first.fullname, sym
                ),
                &record.locs,
                &first.locs,
            ));
        }
        let upper = upper_sym(&record.parcel, &record.fullname);
        if let Some(first) = upper_syms.get(&upper) {
            let first: &ClassRecord = &records[*first];
            return Err(duplicate_class(
                format!(
                    "class `{}` conflicts with `{}` (both are named `{}` in C macros)",
                    record.fullname, first.fullname, upper
                ),
                &record.locs,
                &first.locs,
            ));
        }
        index.insert(record.fullname.clone(), i);
        syms.insert(sym, i);
        upper_syms.insert(upper, i);
    }
    Ok(index)
}

fn resolve_parents(
    records: &[ClassRecord],
    index: &HashMap<ClassFullname, usize>,
) -> Result<Vec<Option<usize>>, Error> {
    records
        .iter()
        .map(|record| {
            let Some(written) = &record.parent else {
                return Ok(None);
            };
            let name = ClassFullname::qualify(written, &record.parcel);
            match index.get(&name) {
                Some(i) => Ok(Some(*i)),
                None => Err(unresolved_parent(
                    format!(
                        "parent class `{}` of `{}` is not declared",
                        name, record.fullname
                    ),
                    record.parent_locs.as_ref().unwrap_or(&record.locs),
                )),
            }
        })
        .collect()
}

/// Returns the indices of the classes, parents first. Siblings are ordered
/// by name because `records` is sorted.
fn ladder_order(records: &[ClassRecord], parents: &[Option<usize>]) -> Result<Vec<usize>, Error> {
    let n = records.len();
    let mut children: Vec<Vec<usize>> = vec![vec![]; n];
    for (i, parent) in parents.iter().enumerate() {
        if let Some(p) = parent {
            children[*p].push(i);
        }
    }
    let mut ladder = Vec::with_capacity(n);
    let mut stack = (0..n)
        .filter(|i| parents[*i].is_none())
        .rev()
        .collect::<Vec<_>>();
    while let Some(i) = stack.pop() {
        ladder.push(i);
        stack.extend(children[i].iter().rev());
    }
    if ladder.len() == n {
        return Ok(ladder);
    }

    // Classes not reached from any root are on (or below) a cycle
    let mut visited = vec![false; n];
    for i in &ladder {
        visited[*i] = true;
    }
    let start = (0..n).find(|i| !visited[*i]).unwrap_or(0);
    let mut path: Vec<usize> = vec![];
    let mut cur = start;
    loop {
        if let Some(pos) = path.iter().position(|x| *x == cur) {
            path.drain(..pos);
            break;
        }
        path.push(cur);
        match parents[cur] {
            Some(p) => cur = p,
            None => break,
        }
    }
    // Start from the smallest name for a stable message
    let min_pos = (0..path.len()).min_by_key(|k| path[*k]).unwrap_or(0);
    path.rotate_left(min_pos);
    let mut names = path
        .iter()
        .map(|i| records[*i].fullname.to_string())
        .collect::<Vec<_>>();
    names.push(records[path[0]].fullname.to_string());
    let record = &records[path[0]];
    Err(cycle(
        format!("inheritance cycle: {}", names.join(" -> ")),
        record.parent_locs.as_ref().unwrap_or(&record.locs),
    ))
}

struct Linker<'a> {
    records: &'a [ClassRecord],
    index: &'a HashMap<ClassFullname, usize>,
    parents: &'a [Option<usize>],
    /// Linked classes (indexed like `records`)
    nodes: Vec<Option<ClassNode>>,
}

impl<'a> Linker<'a> {
    fn link_class(&self, i: usize) -> Result<ClassNode, Error> {
        let record = &self.records[i];
        let parent = self.parents[i].map(|p| {
            self.nodes[p].as_ref().unwrap_or_else(|| {
                panic!("[BUG] parent of {} is not linked yet", record.fullname)
            })
        });
        if let Some(parent) = parent {
            if parent.is_final {
                return Err(final_class(
                    format!(
                        "`{}` cannot inherit from final class `{}`",
                        record.fullname, parent.fullname
                    ),
                    record.parent_locs.as_ref().unwrap_or(&record.locs),
                ));
            }
        }

        let mut attributes = parent.map(|p| p.attributes.clone()).unwrap_or_default();
        let inherited_attr_count = attributes.len();
        for attr in &record.attributes {
            if let Some(inherited) = attributes.iter().find(|a| a.name == attr.name) {
                let inherited_locs = self
                    .attribute_locs(&inherited.declared_in, &attr.name)
                    .unwrap_or(&attr.locs);
                return Err(attribute_shadow(
                    format!(
                        "attribute `{}` of `{}` shadows the one inherited from `{}`",
                        attr.name, record.fullname, inherited.declared_in
                    ),
                    &attr.locs,
                    inherited_locs,
                ));
            }
            attributes.push(Attribute {
                name: attr.name.clone(),
                ty: self.resolve_ty(&attr.ty, record, &attr.locs)?,
                declared_in: record.fullname.clone(),
            });
        }

        let null_vtable = VTable::null();
        let super_vtable = parent.map(|p| &p.vtable).unwrap_or(&null_vtable);
        let mut methods = vec![];
        let mut slots = vec![];
        for decl in &record.methods {
            let signature = self.resolve_signature(decl, record)?;
            let inherited = super_vtable.slot(&decl.name);
            self.check_override(record, decl, &signature, inherited)?;
            methods.push(Method {
                name: decl.name.clone(),
                signature: signature.clone(),
                is_public: decl.modifiers.public,
                is_final: decl.modifiers.is_final,
                is_abstract: decl.modifiers.is_abstract,
                is_novel: inherited.is_none(),
                locs: decl.locs.clone(),
            });
            slots.push(Slot {
                name: decl.name.clone(),
                novel_in: record.fullname.clone(),
                implemented_by: record.fullname.clone(),
                signature,
                is_final: decl.modifiers.is_final,
                is_abstract: decl.modifiers.is_abstract,
            });
        }
        let vtable = VTable::build(super_vtable, slots);

        Ok(ClassNode {
            id: ClassId(i),
            fullname: record.fullname.clone(),
            parcel: record.parcel.clone(),
            parent: self.parents[i].map(ClassId),
            parent_name: parent.map(|p| p.fullname.clone()),
            children: vec![],
            is_public: record.modifiers.public,
            is_final: record.modifiers.is_final,
            attributes,
            inherited_attr_count,
            methods,
            vtable,
            is_included: record.included,
            locs: record.locs.clone(),
        })
    }

    fn check_override(
        &self,
        record: &ClassRecord,
        decl: &MethodDecl,
        signature: &Signature,
        inherited: Option<&Slot>,
    ) -> Result<(), Error> {
        match inherited {
            Some(slot) => {
                if slot.is_final {
                    return Err(override_error(
                        format!(
                            "`{}#{}` cannot override final method of `{}`",
                            record.fullname, decl.name, slot.implemented_by
                        ),
                        &decl.locs,
                    ));
                }
                if !slot.signature.is_compatible(signature) {
                    return Err(override_error(
                        format!(
                            "signature of `{}#{}` ({}) does not match the overridden one ({})",
                            record.fullname, decl.name, signature, slot.signature
                        ),
                        &decl.locs,
                    ));
                }
                if !decl.modifiers.is_override {
                    log::warn!(
                        "{}: `{}#{}` overrides `{}#{}` without `override`",
                        decl.locs,
                        record.fullname,
                        decl.name,
                        slot.implemented_by,
                        decl.name
                    );
                }
            }
            None => {
                if decl.modifiers.is_override {
                    return Err(override_error(
                        format!(
                            "`{}#{}` is marked `override` but there is no inherited method to override",
                            record.fullname, decl.name
                        ),
                        &decl.locs,
                    ));
                }
            }
        }
        Ok(())
    }

    fn attribute_locs(&self, class: &ClassFullname, name: &str) -> Option<&'a LocationSpan> {
        let i = self.index.get(class)?;
        let records: &'a [ClassRecord] = self.records;
        records[*i].find_attribute(name).map(|a| &a.locs)
    }

    fn resolve_signature(&self, decl: &MethodDecl, record: &ClassRecord) -> Result<Signature, Error> {
        let ret_ty = self.resolve_ty(&decl.ret_ty, record, &decl.locs)?;
        let params = decl
            .params
            .iter()
            .map(|p| {
                Ok(Param {
                    name: p.name.clone(),
                    ty: self.resolve_ty(&p.ty, record, &decl.locs)?,
                })
            })
            .collect::<Result<Vec<_>, Error>>()?;
        Ok(Signature { ret_ty, params })
    }

    fn resolve_ty(
        &self,
        ty: &TypeExpr,
        record: &ClassRecord,
        locs: &LocationSpan,
    ) -> Result<Ty, Error> {
        match ty {
            TypeExpr::Void => Ok(Ty::Void),
            TypeExpr::Primitive(p) => Ok(Ty::Primitive(*p)),
            TypeExpr::Object(o) => {
                let class = self.resolve_class(&o.name, &record.parcel).ok_or_else(|| {
                    unknown_type(
                        format!("unknown type `{}` in `{}`", o.name, record.fullname),
                        locs,
                    )
                })?;
                Ok(Ty::Object(ObjectTy {
                    class,
                    nullable: o.nullable,
                    incremented: o.incremented,
                    decremented: o.decremented,
                }))
            }
        }
    }

    /// Classes of the same parcel take precedence over the runtime types
    fn resolve_class(&self, name: &str, parcel: &ParcelName) -> Option<ObjectClass> {
        let fullname = ClassFullname::qualify(name, parcel);
        if self.index.contains_key(&fullname) {
            return Some(ObjectClass::Class(fullname));
        }
        if !name.contains("::") {
            return RuntimeType::from_name(name).map(ObjectClass::Runtime);
        }
        None
    }
}
