//! Tests for enum raw-type computation

use stencil_ast::{AssociatedValue, EnumCase, TypeName};

use crate::compose;
use crate::tests::support::*;

fn plain_cases() -> Vec<EnumCase> {
    vec![EnumCase::new("north"), EnumCase::new("south")]
}

#[test]
fn raw_type_comes_from_the_first_inherited_type() {
    let composition = compose(parsed(vec![
        strukt("Int"),
        enumeration("Direction", plain_cases()).with_inherited_types(vec!["Int".into()]),
    ]));

    let direction = find(&composition, "Direction");
    let detail = direction.as_enum().unwrap();
    assert_eq!(detail.raw_type_name.as_ref().unwrap().name, "Int");
    assert_eq!(detail.raw_type.as_ref().unwrap().name(), "Int");
}

#[test]
fn undeclared_raw_type_keeps_its_textual_name() {
    let composition = compose(parsed(vec![
        enumeration("Direction", plain_cases()).with_inherited_types(vec!["Int".into()])
    ]));

    let direction = find(&composition, "Direction");
    let detail = direction.as_enum().unwrap();
    assert_eq!(detail.raw_type_name.as_ref().unwrap().name, "Int");
    assert!(detail.raw_type.is_none());
}

#[test]
fn stored_raw_value_property_wins_over_inherited_types() {
    let raw_value = variable("rawValue", TypeName::new("String"));
    let composition = compose(parsed(vec![
        strukt("String"),
        protocol("Describable"),
        enumeration("Direction", plain_cases())
            .with_inherited_types(vec!["Describable".into()])
            .with_variables(vec![raw_value]),
    ]));

    let direction = find(&composition, "Direction");
    let detail = direction.as_enum().unwrap();
    assert_eq!(detail.raw_type_name.as_ref().unwrap().name, "String");
    assert_eq!(detail.raw_type.as_ref().unwrap().name(), "String");
}

#[test]
fn computed_or_static_raw_value_does_not_count() {
    let computed = variable("rawValue", TypeName::new("String")).computed();
    let statik = variable("rawValue", TypeName::new("String")).statik();
    let composition = compose(parsed(vec![
        strukt("String"),
        strukt("Int"),
        enumeration("Direction", plain_cases())
            .with_inherited_types(vec!["Int".into()])
            .with_variables(vec![computed, statik]),
    ]));

    let direction = find(&composition, "Direction");
    let detail = direction.as_enum().unwrap();
    // falls through to the inherited raw type
    assert_eq!(detail.raw_type_name.as_ref().unwrap().name, "Int");
}

#[test]
fn associated_values_rule_out_a_raw_type() {
    let cases = vec![
        EnumCase::new("success").with_associated_values(vec![AssociatedValue::new(
            None,
            TypeName::new("Payload"),
        )]),
        EnumCase::new("failure").with_associated_values(vec![AssociatedValue::new(
            None,
            TypeName::new("Reason"),
        )]),
    ];
    let composition = compose(parsed(vec![
        strukt("Int"),
        strukt("Payload"),
        strukt("Reason"),
        enumeration("Outcome", cases).with_inherited_types(vec!["Int".into()]),
    ]));

    let outcome = find(&composition, "Outcome");
    let detail = outcome.as_enum().unwrap();
    assert!(detail.raw_type_name.is_none());
    assert!(detail.raw_type.is_none());
    // the associated values themselves still resolved
    assert_eq!(
        detail.cases[0].associated_values[0]
            .resolved
            .as_ref()
            .unwrap()
            .name(),
        "Payload"
    );
}

#[test]
fn inherited_protocol_keeps_the_textual_name_without_a_raw_type() {
    let composition = compose(parsed(vec![
        protocol("Describable"),
        enumeration("Direction", plain_cases())
            .with_inherited_types(vec!["Describable".into()]),
    ]));

    let direction = find(&composition, "Direction");
    let detail = direction.as_enum().unwrap();
    assert_eq!(detail.raw_type_name.as_ref().unwrap().name, "Describable");
    assert!(detail.raw_type.is_none());
}

#[test]
fn caseless_enums_have_no_raw_type() {
    let composition = compose(parsed(vec![
        strukt("Int"),
        enumeration("Namespace", vec![]).with_inherited_types(vec!["Int".into()]),
    ]));

    let namespace = find(&composition, "Namespace");
    let detail = namespace.as_enum().unwrap();
    assert!(detail.raw_type_name.is_none());
    assert!(detail.raw_type.is_none());
}

#[test]
fn mixed_cases_still_take_the_raw_type() {
    let cases = vec![
        EnumCase::new("plain"),
        EnumCase::new("loaded").with_associated_values(vec![AssociatedValue::new(
            None,
            TypeName::new("Int"),
        )]),
    ];
    let composition = compose(parsed(vec![
        strukt("Int"),
        enumeration("Mixed", cases).with_inherited_types(vec!["Int".into()]),
    ]));

    let mixed = find(&composition, "Mixed");
    let detail = mixed.as_enum().unwrap();
    assert_eq!(detail.raw_type_name.as_ref().unwrap().name, "Int");
    assert_eq!(detail.raw_type.as_ref().unwrap().name(), "Int");
}
