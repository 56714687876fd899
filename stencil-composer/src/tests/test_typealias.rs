//! Tests for typealias substitution through simple and compound references

use stencil_ast::{
    ArrayType, MethodParameter, TupleElement, TupleType, TypeName, Typealias,
};

use crate::compose;
use crate::tests::support::*;

#[test]
fn simple_alias_substitutes_to_declared_type() {
    let composition = compose(parsed_with(
        vec![
            class("Bar"),
            strukt("Holder").with_variables(vec![variable("x", TypeName::new("Foo"))]),
        ],
        vec![],
        vec![alias("Foo", TypeName::new("Bar"))],
    ));

    let holder = find(&composition, "Holder");
    let x = &holder.variables[0];
    assert_eq!(x.resolved.as_ref().unwrap().name(), "Bar");
    assert_eq!(x.type_name.actual().name, "Bar");
}

#[test]
fn tuple_alias_contributes_tuple_shape() {
    let pair = TypeName::tuple(TupleType::new(vec![
        TupleElement::new(None, TypeName::new("Int")),
        TupleElement::new(None, TypeName::new("String")),
    ]));
    let composition = compose(parsed_with(
        vec![],
        vec![function(
            "f",
            vec![MethodParameter::new("p", TypeName::new("Pair"))],
            "Void",
        )],
        vec![alias("Pair", pair)],
    ));

    let f = &composition.functions[0];
    let parameter = &f.parameters[0];
    // tuples are not nominal
    assert!(parameter.resolved.is_none());

    let actual = parameter.type_name.actual();
    assert_eq!(actual.name, "(Int, String)");
    let tuple = actual.tuple.as_ref().unwrap();
    assert_eq!(tuple.elements.len(), 2);
    assert_eq!(tuple.elements[0].type_name.name, "Int");
    assert_eq!(tuple.elements[1].type_name.name, "String");
}

#[test]
fn array_alias_substitutes_element_form() {
    let strings = TypeName::array(ArrayType::new(TypeName::new("String")));
    let composition = compose(parsed_with(
        vec![strukt("Holder").with_variables(vec![variable("xs", TypeName::new("Strings"))])],
        vec![],
        vec![alias("Strings", strings)],
    ));

    let holder = find(&composition, "Holder");
    let xs = &holder.variables[0];
    let actual = xs.type_name.actual();
    assert_eq!(actual.name, "[String]");
    assert_eq!(
        actual.array.as_ref().unwrap().element_type_name.name,
        "String"
    );
}

#[test]
fn alias_chains_flatten_to_the_terminal_type() {
    let composition = compose(parsed_with(
        vec![
            class("Concrete"),
            strukt("Holder").with_variables(vec![variable("x", TypeName::new("First"))]),
        ],
        vec![],
        vec![
            alias("First", TypeName::new("Second")),
            alias("Second", TypeName::new("Third")),
            alias("Third", TypeName::new("Concrete")),
        ],
    ));

    let holder = find(&composition, "Holder");
    let x = &holder.variables[0];
    assert_eq!(x.resolved.as_ref().unwrap().name(), "Concrete");
    assert_eq!(x.type_name.actual().name, "Concrete");
}

#[test]
fn alias_cycles_resolve_to_an_opaque_name() {
    let composition = compose(parsed_with(
        vec![strukt("Holder").with_variables(vec![variable("x", TypeName::new("Ping"))])],
        vec![],
        vec![
            alias("Ping", TypeName::new("Pong")),
            alias("Pong", TypeName::new("Ping")),
        ],
    ));

    let holder = find(&composition, "Holder");
    let x = &holder.variables[0];
    assert!(x.resolved.is_none());
    // the chain stops on the repeated name instead of looping
    assert!(matches!(
        x.type_name.actual().name.as_str(),
        "Ping" | "Pong"
    ));
}

#[test]
fn alias_optionality_is_sticky() {
    let composition = compose(parsed_with(
        vec![
            class("Bar"),
            strukt("Holder").with_variables(vec![variable("x", TypeName::new("MaybeBar"))]),
        ],
        vec![],
        vec![alias("MaybeBar", TypeName::new("Bar").optional())],
    ));

    let holder = find(&composition, "Holder");
    let actual = holder.variables[0].type_name.actual();
    assert_eq!(actual.name, "Bar");
    assert!(actual.is_optional);
    assert_eq!(
        holder.variables[0].resolved.as_ref().unwrap().name(),
        "Bar"
    );
}

#[test]
fn tuple_elements_substitute_nested_aliases() {
    let pair = TypeName::tuple(TupleType::new(vec![
        TupleElement::new(None, TypeName::new("Inner")),
        TupleElement::new(None, TypeName::new("Int")),
    ]));
    let composition = compose(parsed_with(
        vec![
            class("Bar"),
            strukt("Holder").with_variables(vec![variable("p", TypeName::new("Pair"))]),
        ],
        vec![],
        vec![
            alias("Pair", pair),
            alias("Inner", TypeName::new("Bar")),
        ],
    ));

    let holder = find(&composition, "Holder");
    let actual = holder.variables[0].type_name.actual();
    let tuple = actual.tuple.as_ref().unwrap();
    assert_eq!(tuple.elements[0].type_name.name, "Bar");
    assert_eq!(tuple.elements[0].resolved.as_ref().unwrap().name(), "Bar");
    assert_eq!(actual.name, "(Bar, Int)");
}

#[test]
fn aliases_resolve_across_module_imports() {
    let composition = compose(parsed_with(
        vec![
            class("Impl").in_module("Lib"),
            strukt("Holder")
                .in_module("App")
                .with_imports(vec!["Lib".into()])
                .with_variables(vec![variable("h", TypeName::new("Handle"))]),
        ],
        vec![],
        vec![alias("Handle", TypeName::new("Impl")).in_module("Lib")],
    ));

    let holder = find(&composition, "App.Holder");
    let h = &holder.variables[0];
    assert_eq!(h.resolved.as_ref().unwrap().name(), "Lib.Impl");
    assert_eq!(h.type_name.actual().name, "Lib.Impl");
}

#[test]
fn typealias_resolved_slot_points_at_the_terminal_type() {
    let composition = compose(parsed_with(
        vec![class("Concrete")],
        vec![],
        vec![
            alias("First", TypeName::new("Second")),
            alias("Second", TypeName::new("Concrete")),
        ],
    ));

    let first = composition
        .typealiases
        .iter()
        .find(|a| a.alias_name == "First")
        .unwrap();
    assert_eq!(first.resolved.as_ref().unwrap().name(), "Concrete");
    let second = composition
        .typealiases
        .iter()
        .find(|a| a.alias_name == "Second")
        .unwrap();
    assert_eq!(second.resolved.as_ref().unwrap().name(), "Concrete");
}

#[test]
fn generic_reference_through_aliased_base_keeps_arguments() {
    let my_list = Typealias::new("MyList", TypeName::new("List"));
    let reference = TypeName::generic(stencil_ast::GenericType::new(
        "MyList",
        vec![stencil_ast::GenericTypeParameter::new(TypeName::new("Int"))],
    ));
    let composition = compose(parsed_with(
        vec![
            class("List"),
            strukt("Holder").with_variables(vec![variable("xs", reference)]),
        ],
        vec![],
        vec![my_list],
    ));

    let holder = find(&composition, "Holder");
    let xs = &holder.variables[0];
    assert_eq!(xs.resolved.as_ref().unwrap().name(), "List");
    let actual = xs.type_name.actual();
    assert_eq!(actual.name, "List<Int>");
    let generic = actual.generic.as_ref().unwrap();
    assert_eq!(generic.name, "List");
    assert_eq!(generic.type_parameters[0].type_name.name, "Int");
}
