//! Ancestor closure
//!
//! Widens each type's directly declared bases into the transitive sets
//! (`based`, `based_types`, `inherits`, `implements`) by a memoized
//! post-order walk: a base's own closure is completed before it is folded
//! into its descendants. The `processed` memo breaks inheritance cycles.

use std::collections::{BTreeMap, BTreeSet};

use stencil_ast::{AssociatedType, TypeDecl, TypeId, TypeKind};

pub(crate) fn resolve_ancestry(types: &mut [TypeDecl]) {
    let index = types
        .iter()
        .enumerate()
        .map(|(position, decl)| (decl.global_name().0, position))
        .collect();
    let mut closure = Closure {
        index,
        processed: BTreeSet::new(),
    };
    for position in 0..types.len() {
        closure.process(types, position);
    }
}

struct Closure {
    index: BTreeMap<String, usize>,
    processed: BTreeSet<usize>,
}

/// Everything a descendant folds in from one of its bases.
struct BaseSnapshot {
    global: TypeId,
    is_class: bool,
    is_protocol: bool,
    is_composition: bool,
    based: BTreeSet<String>,
    based_types: BTreeSet<TypeId>,
    inherits: BTreeSet<TypeId>,
    implements: BTreeSet<TypeId>,
    associated_types: BTreeMap<String, AssociatedType>,
}

impl BaseSnapshot {
    fn of(decl: &TypeDecl) -> Self {
        Self {
            global: decl.global_name(),
            is_class: decl.is_class(),
            is_protocol: decl.is_protocol(),
            is_composition: decl.is_composition(),
            based: decl.based.clone(),
            based_types: decl.based_types.clone(),
            inherits: decl.inherits.clone(),
            implements: decl.implements.clone(),
            associated_types: decl
                .as_protocol()
                .map(|protocol| protocol.associated_types.clone())
                .unwrap_or_default(),
        }
    }
}

impl Closure {
    fn process(&mut self, types: &mut [TypeDecl], position: usize) {
        if !self.processed.insert(position) {
            return;
        }

        self.resolve_supertype(types, position);

        let base_keys: Vec<String> = types[position].based.iter().cloned().collect();
        for key in base_keys {
            let Some(base_position) = self.find_base(types, position, &key) else {
                continue;
            };
            if base_position == position {
                continue;
            }
            self.process(types, base_position);

            let base = BaseSnapshot::of(&types[base_position]);
            let decl = &mut types[position];
            decl.based.extend(base.based);
            decl.based_types.extend(base.based_types);
            decl.inherits.extend(base.inherits);
            decl.implements.extend(base.implements);

            if base.is_class {
                decl.inherits.insert(base.global.clone());
            } else if base.is_protocol || base.is_composition {
                decl.implements.insert(base.global.clone());
                if base.is_protocol {
                    if let TypeKind::Protocol(protocol) = &mut decl.kind {
                        // a protocol inherits base associated types it does
                        // not declare itself
                        for (name, associated) in &base.associated_types {
                            protocol
                                .associated_types
                                .entry(name.clone())
                                .or_insert_with(|| associated.clone());
                        }
                    }
                }
            }
            decl.based_types.insert(base.global);
        }
    }

    /// A class whose first declared base resolves to another class gains it
    /// as supertype.
    fn resolve_supertype(&self, types: &mut [TypeDecl], position: usize) {
        if !types[position].is_class() {
            return;
        }
        let Some(first) = types[position].inherited_types.first().cloned() else {
            return;
        };
        let Some(base_position) = self.find_base(types, position, &first) else {
            return;
        };
        if !types[base_position].is_class() {
            return;
        }
        let supertype = types[base_position].global_name();
        if let TypeKind::Class(class) = &mut types[position].kind {
            class.supertype = Some(supertype);
        }
    }

    /// Probe a base key bare, module-qualified, then through each import.
    fn find_base(&self, types: &[TypeDecl], position: usize, key: &str) -> Option<usize> {
        if let Some(&found) = self.index.get(key) {
            return Some(found);
        }
        let decl = &types[position];
        if let Some(module) = &decl.module {
            if let Some(&found) = self.index.get(&format!("{module}.{key}")) {
                return Some(found);
            }
        }
        for import in &decl.imports {
            if let Some(&found) = self.index.get(&format!("{import}.{key}")) {
                return Some(found);
            }
        }
        None
    }
}
