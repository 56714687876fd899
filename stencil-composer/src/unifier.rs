//! Unification of duplicate declarations
//!
//! Merges every declaration of a nominal type (the definition plus its
//! extensions, possibly across files and modules) into one canonical record
//! keyed by global name, and derives the session maps. Unification builds
//! the name-addressable universe only; no reference is resolved here.

use std::collections::{btree_map::Entry, BTreeMap};

use stencil_ast::{ParserResult, TypeDecl, TypeKind, Typealias};

use crate::state::Unified;

pub(crate) fn unify(parser_result: ParserResult) -> Unified {
    let ParserResult {
        types,
        functions,
        typealiases,
    } = parser_result;

    let mut unique: BTreeMap<String, TypeDecl> = BTreeMap::new();
    for decl in types {
        match unique.entry(decl.global_name().0) {
            Entry::Occupied(mut existing) => merge_into(existing.get_mut(), decl),
            Entry::Vacant(slot) => {
                slot.insert(decl);
            }
        }
    }

    for decl in unique.values() {
        if decl.is_extension {
            log::warn!(
                "extension of undeclared type `{}` kept as its own record",
                decl.global_name()
            );
        }
    }

    let mut modules: BTreeMap<String, BTreeMap<String, _>> = BTreeMap::new();
    for decl in unique.values() {
        if let Some(module) = &decl.module {
            modules
                .entry(module.clone())
                .or_default()
                .insert(decl.name.clone(), decl.global_name());
        }
    }

    let unresolved_typealiases: BTreeMap<String, Typealias> = typealiases
        .iter()
        .map(|alias| (alias.global_name().0, alias.clone()))
        .collect();

    Unified {
        types: unique.into_values().collect(),
        functions,
        typealiases,
        modules,
        unresolved_typealiases,
    }
}

/// Fold a later declaration of the same global name into the canonical
/// record. Members append in input order; a full declaration supplies the
/// attributes only a definition can carry.
fn merge_into(existing: &mut TypeDecl, mut incoming: TypeDecl) {
    if existing.is_extension && !incoming.is_extension {
        // the definition becomes canonical, the extension folds into it
        std::mem::swap(existing, &mut incoming);
    }

    existing.variables.append(&mut incoming.variables);
    existing.methods.append(&mut incoming.methods);
    existing.subscripts.append(&mut incoming.subscripts);

    for name in incoming.inherited_types {
        if !existing.inherited_types.contains(&name) {
            existing.inherited_types.push(name.clone());
        }
        existing.based.insert(name);
    }
    existing.based.extend(incoming.based);

    for import in incoming.imports {
        if !existing.imports.contains(&import) {
            existing.imports.push(import);
        }
    }

    match (&mut existing.kind, incoming.kind) {
        (TypeKind::Enum(canonical), TypeKind::Enum(merged)) => {
            canonical.cases.extend(merged.cases);
            if canonical.raw_type_name.is_none() {
                canonical.raw_type_name = merged.raw_type_name;
            }
        }
        (TypeKind::Protocol(canonical), TypeKind::Protocol(merged)) => {
            for (name, associated) in merged.associated_types {
                canonical.associated_types.entry(name).or_insert(associated);
            }
            canonical
                .generic_requirements
                .extend(merged.generic_requirements);
        }
        (TypeKind::Composition(canonical), TypeKind::Composition(merged)) => {
            if canonical.composed_type_names.is_empty() {
                canonical.composed_type_names = merged.composed_type_names;
            }
        }
        // the definition's kind stands; an extension adds members only
        _ => {}
    }

    existing.is_extension = existing.is_extension && incoming.is_extension;
}
