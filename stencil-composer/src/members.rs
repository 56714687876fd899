//! Per-type member resolution
//!
//! Each type's variables, methods, subscripts and kind-specific members are
//! resolved independently; tasks write only to slots reachable from the type
//! they own, so the fan-out needs no synchronization.

use stencil_ast::{
    CompositionDetail, EnumDetail, Method, MethodParameter, ProtocolDetail, Subscript, TypeDecl,
    TypeId, TypeKind, TypeName, Variable,
};

use crate::lookup::Scope;
use crate::rewrite::resolve_type_name;
use crate::state::Lookup;

pub(crate) fn resolve_type_members(decl: &mut TypeDecl, lookup: &Lookup) {
    let scope = Scope::of_type(decl);
    let TypeDecl {
        variables,
        methods,
        subscripts,
        kind,
        inherited_types,
        ..
    } = decl;

    for variable in variables.iter_mut() {
        resolve_variable(variable, &scope, lookup);
    }
    for method in methods.iter_mut() {
        resolve_method(method, &scope, lookup);
    }
    for subscript in subscripts.iter_mut() {
        resolve_subscript(subscript, &scope, lookup);
    }

    match kind {
        TypeKind::Enum(detail) => {
            resolve_enum(detail, variables, inherited_types, &scope, lookup)
        }
        TypeKind::Protocol(detail) => resolve_protocol(detail, &scope, lookup),
        TypeKind::Composition(detail) => resolve_composition(detail, &scope, lookup),
        TypeKind::Class(_) | TypeKind::Struct => {}
    }
}

/// Free functions resolve like methods, with no containing type.
pub(crate) fn resolve_function(function: &mut Method, lookup: &Lookup) {
    let scope = Scope::of_function(function);
    resolve_method(function, &scope, lookup);
}

fn resolve_variable(variable: &mut Variable, scope: &Scope, lookup: &Lookup) {
    variable.resolved = resolve_type_name(&mut variable.type_name, scope, lookup);
    if let Some(defined_in) = &mut variable.defined_in_type_name {
        // result discarded; the typealias rewrite is the point
        let _ = resolve_type_name(defined_in, scope, lookup);
    }
}

fn resolve_method(method: &mut Method, scope: &Scope, lookup: &Lookup) {
    for parameter in &mut method.parameters {
        resolve_parameter(parameter, scope, lookup);
    }
    let defined_in = method.defined_in_type_name.as_mut().map(|type_name| {
        let resolved = resolve_type_name(type_name, scope, lookup);
        (type_name.clone(), resolved)
    });

    if method.is_initializer || method.is_failable_initializer {
        // an initializer returns the type that defines it
        let (defining, resolved) = match defined_in {
            Some(pair) => pair,
            None => match &scope.container {
                Some(container) => (
                    TypeName::new(container.clone()),
                    lookup
                        .contains(container)
                        .then(|| TypeId::new(container.clone())),
                ),
                None => return,
            },
        };
        let mut return_type_name = TypeName::new(defining.actual().unwrapped_type_name());
        return_type_name.is_optional = method.is_failable_initializer;
        method.return_type_name = return_type_name;
        method.return_type = resolved;
    } else if method.return_type_name.is_void() {
        // explicitly Void: nothing to resolve
    } else {
        method.return_type = resolve_type_name(&mut method.return_type_name, scope, lookup);
    }
}

fn resolve_subscript(subscript: &mut Subscript, scope: &Scope, lookup: &Lookup) {
    for parameter in &mut subscript.parameters {
        resolve_parameter(parameter, scope, lookup);
    }
    subscript.return_type = resolve_type_name(&mut subscript.return_type_name, scope, lookup);
    if let Some(defined_in) = &mut subscript.defined_in_type_name {
        let _ = resolve_type_name(defined_in, scope, lookup);
    }
}

fn resolve_parameter(parameter: &mut MethodParameter, scope: &Scope, lookup: &Lookup) {
    parameter.resolved = resolve_type_name(&mut parameter.type_name, scope, lookup);
}

fn resolve_enum(
    detail: &mut EnumDetail,
    variables: &[Variable],
    inherited_types: &[String],
    scope: &Scope,
    lookup: &Lookup,
) {
    for case in &mut detail.cases {
        for value in &mut case.associated_values {
            value.resolved = resolve_type_name(&mut value.type_name, scope, lookup);
        }
    }

    // a stored instance `rawValue` property decides the raw type outright
    if let Some(raw_value) = variables
        .iter()
        .find(|variable| variable.name == "rawValue" && !variable.is_static && variable.is_stored())
    {
        detail.raw_type_name = Some(raw_value.type_name.clone());
        detail.raw_type = raw_value.resolved.clone();
        return;
    }

    let Some(first) = inherited_types.first() else {
        return;
    };
    if detail.cases.iter().all(|case| case.has_associated_values()) {
        if !detail.cases.is_empty() {
            // cases all carry payloads: no raw representation is possible
            detail.raw_type_name = None;
            detail.raw_type = None;
        }
        return;
    }

    let mut raw_type_name = TypeName::new(first.clone());
    let resolved = resolve_type_name(&mut raw_type_name, scope, lookup);
    match resolved {
        Some(id) if lookup.is_protocol_or_composition(id.name()) => {
            // declared conformance, not a raw type; the textual name stays
            detail.raw_type_name = Some(raw_type_name);
            detail.raw_type = None;
        }
        other => {
            detail.raw_type_name = Some(raw_type_name);
            detail.raw_type = other;
        }
    }
}

fn resolve_protocol(detail: &mut ProtocolDetail, scope: &Scope, lookup: &Lookup) {
    let ProtocolDetail {
        associated_types,
        generic_requirements,
    } = detail;

    for associated in associated_types.values_mut() {
        if let Some(constraint) = &mut associated.type_name {
            associated.resolved = resolve_type_name(constraint, scope, lookup);
        }
    }
    for requirement in generic_requirements.iter_mut() {
        requirement.right_type =
            resolve_type_name(&mut requirement.right_type_name, scope, lookup);
        if let Some(known) = associated_types.get(&requirement.left_type.name) {
            requirement.left_type = known.clone();
        }
    }
}

fn resolve_composition(detail: &mut CompositionDetail, scope: &Scope, lookup: &Lookup) {
    let CompositionDetail {
        composed_type_names,
        composed_types,
    } = detail;

    composed_types.clear();
    for type_name in composed_type_names.iter_mut() {
        if let Some(id) = resolve_type_name(type_name, scope, lookup) {
            composed_types.push(id);
        }
    }
}
