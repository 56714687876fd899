//! Session state for a single composition pass
//!
//! `Unified` is the canonical universe the unifier produces; `Lookup` is the
//! immutable snapshot of it shared by every parallel member-resolution task.

use std::collections::{BTreeMap, BTreeSet};

use stencil_ast::{Method, TypeDecl, TypeId, TypeKind, Typealias};

/// Canonical output of unification: one record per global name, plus the
/// session maps derived while merging.
#[derive(Debug)]
pub(crate) struct Unified {
    pub types: Vec<TypeDecl>,
    pub functions: Vec<Method>,
    pub typealiases: Vec<Typealias>,
    /// module name → short name → global name
    pub modules: BTreeMap<String, BTreeMap<String, TypeId>>,
    /// global alias name → alias, pre-flattening
    pub unresolved_typealiases: BTreeMap<String, Typealias>,
}

/// The kind of a declared type, as much of it as name resolution needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KindTag {
    Class,
    Struct,
    Enum,
    Protocol,
    Composition,
}

impl KindTag {
    fn of(kind: &TypeKind) -> Self {
        match kind {
            TypeKind::Class(_) => Self::Class,
            TypeKind::Struct => Self::Struct,
            TypeKind::Enum(_) => Self::Enum,
            TypeKind::Protocol(_) => Self::Protocol,
            TypeKind::Composition(_) => Self::Composition,
        }
    }
}

/// Read-only view of the unified universe. Shared by reference across the
/// parallel phase; everything a task needs to resolve names lives here.
#[derive(Debug)]
pub(crate) struct Lookup {
    kinds: BTreeMap<String, KindTag>,
    modules: BTreeMap<String, BTreeMap<String, TypeId>>,
    /// global alias name → alias with its chain flattened to the terminal
    /// target
    typealiases: BTreeMap<String, Typealias>,
}

impl Lookup {
    pub fn from_unified(unified: &Unified) -> Self {
        let kinds = unified
            .types
            .iter()
            .map(|decl| (decl.global_name().0, KindTag::of(&decl.kind)))
            .collect();
        Self {
            kinds,
            modules: unified.modules.clone(),
            typealiases: flatten_typealiases(&unified.unresolved_typealiases),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.kinds.contains_key(name)
    }

    pub fn kind(&self, name: &str) -> Option<KindTag> {
        self.kinds.get(name).copied()
    }

    pub fn is_protocol_or_composition(&self, name: &str) -> bool {
        matches!(
            self.kind(name),
            Some(KindTag::Protocol) | Some(KindTag::Composition)
        )
    }

    pub fn module_type(&self, module: &str, name: &str) -> Option<&TypeId> {
        self.modules.get(module)?.get(name)
    }

    pub fn alias(&self, name: &str) -> Option<&Typealias> {
        self.typealiases.get(name)
    }
}

/// Flatten alias-to-alias chains so each entry carries the terminal target
/// directly. A name repeating along a chain stops the walk, so cycles
/// resolve to the last name reached instead of looping.
fn flatten_typealiases(
    unresolved: &BTreeMap<String, Typealias>,
) -> BTreeMap<String, Typealias> {
    unresolved
        .iter()
        .map(|(key, alias)| {
            let mut visited: BTreeSet<String> = BTreeSet::new();
            visited.insert(key.clone());
            let mut current = alias;
            while let Some((next_key, next)) = next_alias(unresolved, current) {
                if !visited.insert(next_key) {
                    break;
                }
                current = next;
            }
            let mut flattened = alias.clone();
            flattened.type_name = current.type_name.clone();
            (key.clone(), flattened)
        })
        .collect()
}

/// The alias the current alias's target names, if any: probed in the parent
/// scope, bare, then module-qualified.
fn next_alias<'a>(
    unresolved: &'a BTreeMap<String, Typealias>,
    current: &Typealias,
) -> Option<(String, &'a Typealias)> {
    let target_name = &current.type_name;
    let target = target_name
        .generic
        .as_ref()
        .map(|generic| generic.name.clone())
        .unwrap_or_else(|| target_name.unwrapped_type_name().to_string());

    let mut candidates = Vec::new();
    if let Some(parent) = &current.parent_name {
        match &current.module {
            Some(module) => candidates.push(format!("{module}.{parent}.{target}")),
            None => candidates.push(format!("{parent}.{target}")),
        }
    }
    candidates.push(target.clone());
    if let Some(module) = &current.module {
        candidates.push(format!("{module}.{target}"));
    }

    candidates
        .into_iter()
        .find_map(|candidate| unresolved.get(&candidate).map(|next| (candidate, next)))
}
