//! Name resolution through the scope chain
//!
//! A textual name is looked up in the containing type's scope (walking
//! outward to module scope), then as written, then through the declaring
//! module and its imports. Typealiases are probed at every step and followed
//! to a fixed point; a name repeating along an alias chain resolves to
//! itself as an opaque name.

use std::collections::BTreeSet;

use stencil_ast::{Method, TypeDecl, Typealias};

use crate::state::Lookup;

/// The lexical scope a textual name is resolved in.
#[derive(Debug, Clone)]
pub(crate) struct Scope {
    /// Global name of the containing type, when resolving inside one.
    pub container: Option<String>,
    pub module: Option<String>,
    pub imports: Vec<String>,
}

impl Scope {
    pub fn of_type(decl: &TypeDecl) -> Self {
        Self {
            container: Some(decl.global_name().0),
            module: decl.module.clone(),
            imports: decl.imports.clone(),
        }
    }

    /// Free functions resolve against their own module and imports only.
    pub fn of_function(function: &Method) -> Self {
        Self {
            container: None,
            module: function.module.clone(),
            imports: function.imports.clone(),
        }
    }

    pub fn of_typealias(alias: &Typealias) -> Self {
        let container = alias.parent_name.as_ref().map(|parent| match &alias.module {
            Some(module) => format!("{module}.{parent}"),
            None => parent.clone(),
        });
        Self {
            container,
            module: alias.module.clone(),
            imports: Vec::new(),
        }
    }
}

/// A name resolved to its fully-qualified form. `via_alias` carries the last
/// typealias crossed, so callers can adopt its compound substructure.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedName {
    pub name: String,
    pub via_alias: Option<Typealias>,
}

/// Resolve `name` in `scope` to the global name of a declared type or the
/// terminal name of a typealias chain. `None` means no declaration or alias
/// matched anywhere along the scope chain.
pub(crate) fn resolve_global_name(
    name: &str,
    scope: &Scope,
    lookup: &Lookup,
) -> Option<ResolvedName> {
    let mut visited = BTreeSet::new();
    resolve_with_guard(name, scope, lookup, &mut visited)
}

fn resolve_with_guard(
    name: &str,
    scope: &Scope,
    lookup: &Lookup,
    visited: &mut BTreeSet<String>,
) -> Option<ResolvedName> {
    if !visited.insert(name.to_string()) {
        // alias cycle: the name resolves to itself, opaque
        return Some(ResolvedName {
            name: name.to_string(),
            via_alias: None,
        });
    }

    // containing type scope, walking outward to module scope
    if let Some(container) = &scope.container {
        let mut prefix = container.as_str();
        loop {
            if let Some(hit) = probe(&format!("{prefix}.{name}"), lookup, visited) {
                return Some(hit);
            }
            match prefix.rfind('.') {
                Some(dot) => prefix = &prefix[..dot],
                None => break,
            }
        }
    }

    // the name as written
    if let Some(hit) = probe(name, lookup, visited) {
        return Some(hit);
    }

    // the declaring module, then each import
    for module in scope.module.iter().chain(scope.imports.iter()) {
        if let Some(global) = lookup.module_type(module, name) {
            return Some(ResolvedName {
                name: global.0.clone(),
                via_alias: None,
            });
        }
        if let Some(alias) = lookup.alias(&format!("{module}.{name}")) {
            return Some(follow_alias(alias.clone(), lookup, visited));
        }
    }

    log::trace!("no declaration found for `{name}`");
    None
}

fn probe(candidate: &str, lookup: &Lookup, visited: &mut BTreeSet<String>) -> Option<ResolvedName> {
    if lookup.contains(candidate) {
        return Some(ResolvedName {
            name: candidate.to_string(),
            via_alias: None,
        });
    }
    lookup
        .alias(candidate)
        .cloned()
        .map(|alias| follow_alias(alias, lookup, visited))
}

/// Chase an alias's target in the alias's own scope. The last alias crossed
/// wins the `via_alias` slot.
fn follow_alias(
    alias: Typealias,
    lookup: &Lookup,
    visited: &mut BTreeSet<String>,
) -> ResolvedName {
    let target = alias
        .type_name
        .generic
        .as_ref()
        .map(|generic| generic.name.clone())
        .unwrap_or_else(|| alias.type_name.unwrapped_type_name().to_string());
    let alias_scope = Scope::of_typealias(&alias);

    match resolve_with_guard(&target, &alias_scope, lookup, visited) {
        Some(resolved) => ResolvedName {
            name: resolved.name,
            via_alias: resolved.via_alias.or(Some(alias)),
        },
        None => ResolvedName {
            name: target,
            via_alias: Some(alias),
        },
    }
}
