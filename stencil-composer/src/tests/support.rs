//! Shared fixture builders for composer tests

use stencil_ast::{
    EnumCase, Method, MethodParameter, ParserResult, TypeDecl, TypeKind, TypeName, Typealias,
    Variable,
};

use crate::Composition;

pub fn class(name: &str) -> TypeDecl {
    TypeDecl::new(name, TypeKind::class())
}

pub fn strukt(name: &str) -> TypeDecl {
    TypeDecl::new(name, TypeKind::Struct)
}

pub fn protocol(name: &str) -> TypeDecl {
    TypeDecl::new(name, TypeKind::protocol())
}

pub fn enumeration(name: &str, cases: Vec<EnumCase>) -> TypeDecl {
    TypeDecl::new(name, TypeKind::enumeration(cases))
}

pub fn variable(name: &str, type_name: TypeName) -> Variable {
    Variable::new(name, type_name)
}

pub fn function(name: &str, parameters: Vec<MethodParameter>, return_type: &str) -> Method {
    Method::new(name, parameters, TypeName::new(return_type))
}

pub fn alias(name: &str, type_name: TypeName) -> Typealias {
    Typealias::new(name, type_name)
}

pub fn parsed(types: Vec<TypeDecl>) -> ParserResult {
    ParserResult {
        types,
        functions: Vec::new(),
        typealiases: Vec::new(),
    }
}

pub fn parsed_with(
    types: Vec<TypeDecl>,
    functions: Vec<Method>,
    typealiases: Vec<Typealias>,
) -> ParserResult {
    ParserResult {
        types,
        functions,
        typealiases,
    }
}

/// Find an output type by global name; panics when absent.
pub fn find<'a>(composition: &'a Composition, global_name: &str) -> &'a TypeDecl {
    composition
        .types
        .iter()
        .find(|decl| decl.global_name().name() == global_name)
        .unwrap_or_else(|| panic!("no type named `{global_name}` in output"))
}
