use crate::{
    diagnostics::position::Span,
    stage::{StagedTable, StagedValue},
    syntax::print_expression,
};

use super::literal::lower_value;

fn lowered(value: StagedValue) -> String {
    let expression = lower_value(&value, Span::default()).expect("value should lower");
    print_expression(&expression)
}

fn string(s: &str) -> StagedValue {
    StagedValue::String(s.as_bytes().to_vec())
}

#[test]
fn lowers_scalars() {
    assert_eq!(lowered(StagedValue::Nil), "nil");
    assert_eq!(lowered(StagedValue::Boolean(true)), "true");
    assert_eq!(lowered(StagedValue::Integer(42)), "42");
    assert_eq!(lowered(StagedValue::Integer(-7)), "-7");
    assert_eq!(lowered(StagedValue::Integer(i64::MIN)), "math.mininteger");
    assert_eq!(lowered(string("a\"b")), "\"a\\\"b\"");
}

#[test]
fn lowers_floats_so_they_stay_floats() {
    assert_eq!(lowered(StagedValue::Number(1.0)), "1.0");
    assert_eq!(lowered(StagedValue::Number(0.1)), "0.1");
    assert_eq!(lowered(StagedValue::Number(-2.5)), "-2.5");
    assert_eq!(lowered(StagedValue::Number(1e100)), "1e100");
    assert_eq!(lowered(StagedValue::Number(f64::INFINITY)), "math.huge");
    assert_eq!(lowered(StagedValue::Number(f64::NEG_INFINITY)), "-math.huge");
    assert_eq!(lowered(StagedValue::Number(f64::NAN)), "(0 / 0)");
}

#[test]
fn lowers_tables_with_sorted_keys() {
    let table = StagedTable::from_pairs(vec![
        (string("name"), string("peasant")),
        (StagedValue::Integer(2), StagedValue::Integer(20)),
        (string("end"), StagedValue::Boolean(false)),
        (StagedValue::Integer(1), StagedValue::Integer(10)),
        (StagedValue::Integer(5), StagedValue::Integer(50)),
        (StagedValue::Boolean(true), string("yes")),
        (string("has space"), StagedValue::Nil),
    ]);
    assert_eq!(
        lowered(StagedValue::Table(table)),
        "{10, 20, [true] = \"yes\", [5] = 50, [\"end\"] = false, [\"has space\"] = nil, name = \"peasant\"}"
    );
}

#[test]
fn lowers_nested_tables() {
    let inner = StagedTable::from_pairs(vec![(StagedValue::Integer(1), StagedValue::Number(-0.5))]);
    let outer = StagedTable::from_pairs(vec![(string("inner"), StagedValue::Table(inner))]);
    assert_eq!(lowered(StagedValue::Table(outer)), "{inner = {-0.5}}");
}

#[test]
fn rejects_opaque_values_anywhere_in_the_tree() {
    let function = StagedValue::Opaque {
        type_name: "function".to_string(),
    };
    let err = lower_value(&function, Span::default()).unwrap_err();
    assert_eq!(err.reason, "a function value has no literal form");

    let table = StagedTable::from_pairs(vec![(string("f"), function)]);
    assert!(lower_value(&StagedValue::Table(table), Span::default()).is_err());
}
