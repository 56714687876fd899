//! Type-expression rewriting
//!
//! Walks a compound type expression, substitutes typealiases at every leaf
//! and materializes the rewritten form in the reference's `actual_type_name`
//! slot. Rewrites produce copies with resolved leaves; the original textual
//! names stay available on the reference for diagnostic output.

use stencil_ast::{
    ArrayType, ClosureParameter, ClosureType, DictionaryType, GenericType, GenericTypeParameter,
    TupleElement, TupleType, TypeId, TypeName,
};

use crate::lookup::{resolve_global_name, Scope};
use crate::state::Lookup;

/// Resolve a type reference to the global name of a declared type, rewriting
/// the reference's compound structure along the way. `None` means the
/// reference does not name a declared nominal type (unknown or external
/// names, tuples, closures).
pub(crate) fn resolve_type_name(
    type_name: &mut TypeName,
    scope: &Scope,
    lookup: &Lookup,
) -> Option<TypeId> {
    // an already-rewritten reference is looked up directly, no recursion
    if let Some(actual) = &type_name.actual_type_name {
        return nominal_key(actual, lookup);
    }

    let retrieved = substituted_type_name(type_name, scope, lookup);
    let substituted = retrieved.is_some();
    let mut shape = retrieved.unwrap_or_else(|| type_name.clone());

    if let Some(tuple) = shape.tuple.take() {
        rewrite_tuple(type_name, *tuple, substituted, scope, lookup);
        return None; // tuples are not nominal
    }
    if let Some(closure) = shape.closure.take() {
        rewrite_closure(type_name, *closure, substituted, scope, lookup);
        return None; // closures are not nominal
    }

    if let Some(array) = shape.array.take() {
        rewrite_array(type_name, *array, substituted, scope, lookup);
    } else if let Some(dictionary) = shape.dictionary.take() {
        rewrite_dictionary(type_name, *dictionary, substituted, scope, lookup);
    } else if shape.generic.is_some() || type_name.generic.is_some() {
        rewrite_generic(type_name, shape, substituted, scope, lookup);
    } else if substituted {
        // plain name substituted through an alias
        let actual = shape.inherit_optionality(type_name);
        type_name.set_actual(actual);
    }

    let key = {
        let final_form = type_name.actual();
        final_form
            .generic
            .as_ref()
            .map(|generic| generic.name.clone())
            .unwrap_or_else(|| final_form.unwrapped_type_name().to_string())
    };
    find_nominal(&key, scope, lookup)
}

/// Direct map lookup for a memoized reference; actual names are already
/// fully qualified.
fn nominal_key(actual: &TypeName, lookup: &Lookup) -> Option<TypeId> {
    let name = actual
        .generic
        .as_ref()
        .map(|generic| generic.name.as_str())
        .unwrap_or_else(|| actual.unwrapped_type_name());
    lookup.contains(name).then(|| TypeId::new(name))
}

/// Scoped lookup for the final nominal: the name as-is, then resolved
/// through the scope chain.
fn find_nominal(name: &str, scope: &Scope, lookup: &Lookup) -> Option<TypeId> {
    if lookup.contains(name) {
        return Some(TypeId::new(name));
    }
    let resolved = resolve_global_name(name, scope, lookup)?;
    lookup
        .contains(&resolved.name)
        .then(|| TypeId::new(resolved.name))
}

/// The post-typealias-substitution form of a reference, or `None` when no
/// alias applies. The alias target's compound substructure is adopted and
/// the reference's optionality merged in.
fn substituted_type_name(
    type_name: &TypeName,
    scope: &Scope,
    lookup: &Lookup,
) -> Option<TypeName> {
    let referenced = type_name
        .generic
        .as_ref()
        .map(|generic| generic.name.as_str())
        .unwrap_or_else(|| type_name.unwrapped_type_name());
    let resolved = resolve_global_name(referenced, scope, lookup)?;
    let alias = resolved.via_alias?;

    let mut actual = alias.type_name.clone();
    actual.actual_type_name = None;
    if !is_structural(&actual) {
        match actual.generic.take() {
            Some(mut generic) => {
                // requalify the base name of a generic target
                generic.name = resolved.name;
                actual.name = generic.composed_name();
                actual.generic = Some(generic);
            }
            None => actual.name = resolved.name,
        }
    }
    Some(actual.inherit_optionality(type_name))
}

fn is_structural(type_name: &TypeName) -> bool {
    type_name.tuple.is_some()
        || type_name.array.is_some()
        || type_name.dictionary.is_some()
        || type_name.closure.is_some()
}

/// The substituted form of a child reference: its rewritten shape when one
/// was recorded, itself otherwise, with the memo slot cleared either way.
fn substituted_child(mut type_name: TypeName) -> TypeName {
    match type_name.actual_type_name.take() {
        Some(actual) => *actual,
        None => type_name,
    }
}

fn rewrite_tuple(
    type_name: &mut TypeName,
    mut work: TupleType,
    substituted: bool,
    scope: &Scope,
    lookup: &Lookup,
) {
    let mut rewritten = false;
    for element in &mut work.elements {
        element.resolved = resolve_type_name(&mut element.type_name, scope, lookup);
        rewritten |= element.type_name.actual_type_name.is_some();
    }

    if rewritten || substituted {
        let elements = work
            .elements
            .into_iter()
            .map(|element| TupleElement {
                name: element.name,
                type_name: substituted_child(element.type_name),
                resolved: element.resolved,
            })
            .collect();
        let rebuilt = TupleType::new(elements);
        let actual = TypeName::tuple(rebuilt.clone()).inherit_optionality(type_name);
        type_name.tuple = Some(Box::new(rebuilt));
        type_name.set_actual(actual);
    } else {
        type_name.tuple = Some(Box::new(work));
    }
}

fn rewrite_array(
    type_name: &mut TypeName,
    mut work: ArrayType,
    substituted: bool,
    scope: &Scope,
    lookup: &Lookup,
) {
    work.element = resolve_type_name(&mut work.element_type_name, scope, lookup);

    if work.element_type_name.actual_type_name.is_some() || substituted {
        let mut rebuilt = ArrayType::new(substituted_child(work.element_type_name));
        rebuilt.element = work.element;
        let actual = TypeName::array(rebuilt.clone()).inherit_optionality(type_name);
        type_name.generic = Some(Box::new(rebuilt.as_generic()));
        type_name.array = Some(Box::new(rebuilt));
        type_name.set_actual(actual);
    } else {
        type_name.array = Some(Box::new(work));
    }
}

fn rewrite_dictionary(
    type_name: &mut TypeName,
    mut work: DictionaryType,
    substituted: bool,
    scope: &Scope,
    lookup: &Lookup,
) {
    work.key = resolve_type_name(&mut work.key_type_name, scope, lookup);
    work.value = resolve_type_name(&mut work.value_type_name, scope, lookup);

    let rewritten = work.key_type_name.actual_type_name.is_some()
        || work.value_type_name.actual_type_name.is_some();
    if rewritten || substituted {
        let mut rebuilt = DictionaryType::new(
            substituted_child(work.key_type_name),
            substituted_child(work.value_type_name),
        );
        rebuilt.key = work.key;
        rebuilt.value = work.value;
        let actual = TypeName::dictionary(rebuilt.clone()).inherit_optionality(type_name);
        type_name.generic = Some(Box::new(rebuilt.as_generic()));
        type_name.dictionary = Some(Box::new(rebuilt));
        type_name.set_actual(actual);
    } else {
        type_name.dictionary = Some(Box::new(work));
    }
}

fn rewrite_closure(
    type_name: &mut TypeName,
    mut work: ClosureType,
    substituted: bool,
    scope: &Scope,
    lookup: &Lookup,
) {
    let mut rewritten = false;
    for parameter in &mut work.parameters {
        parameter.resolved = resolve_type_name(&mut parameter.type_name, scope, lookup);
        rewritten |= parameter.type_name.actual_type_name.is_some();
    }
    work.return_type = resolve_type_name(&mut work.return_type_name, scope, lookup);
    rewritten |= work.return_type_name.actual_type_name.is_some();

    if rewritten || substituted {
        let parameters = work
            .parameters
            .into_iter()
            .map(|parameter| ClosureParameter {
                type_name: substituted_child(parameter.type_name),
                resolved: parameter.resolved,
            })
            .collect();
        let mut rebuilt = ClosureType::new(parameters, substituted_child(work.return_type_name));
        rebuilt.return_type = work.return_type;
        let actual = TypeName::closure(rebuilt.clone()).inherit_optionality(type_name);
        type_name.closure = Some(Box::new(rebuilt));
        type_name.set_actual(actual);
    } else {
        type_name.closure = Some(Box::new(work));
    }
}

fn rewrite_generic(
    type_name: &mut TypeName,
    shape: TypeName,
    substituted: bool,
    scope: &Scope,
    lookup: &Lookup,
) {
    // an alias can substitute the base name while the reference supplies the
    // type arguments
    let mut work = match shape.generic.clone() {
        Some(generic) => *generic,
        None => GenericType::new(
            shape.unwrapped_type_name(),
            type_name
                .generic
                .as_ref()
                .map(|generic| generic.type_parameters.clone())
                .unwrap_or_default(),
        ),
    };

    let mut rewritten = false;
    for parameter in &mut work.type_parameters {
        parameter.resolved = resolve_type_name(&mut parameter.type_name, scope, lookup);
        rewritten |= parameter.type_name.actual_type_name.is_some();
    }

    if rewritten || substituted {
        let parameters = work
            .type_parameters
            .into_iter()
            .map(|parameter| GenericTypeParameter {
                type_name: substituted_child(parameter.type_name),
                resolved: parameter.resolved,
            })
            .collect();
        let rebuilt = GenericType::new(work.name, parameters);
        let actual = TypeName::generic(rebuilt.clone()).inherit_optionality(type_name);
        type_name.generic = Some(Box::new(rebuilt));
        type_name.set_actual(actual);
    } else {
        type_name.generic = Some(Box::new(work));
    }
}
