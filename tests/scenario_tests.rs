//! Worked reshape scenarios on small tables

use tidyshape_core::prelude::*;
use tidyshape_operators::{Direction, Fill, Gather, Operator, Separate, Spread};

fn text(s: &str) -> Value {
    Value::from(s)
}

#[test]
fn test_scenario_a_gather() {
    let wide = Table::new(vec![
        Column::infer("country", vec![text("AF")]),
        Column::infer("1999", vec![745.into()]),
        Column::infer("2000", vec![2666.into()]),
    ])
    .unwrap();

    let long = Gather::new(Selector::names(["1999", "2000"]), "year", "cases")
        .apply(&wide)
        .unwrap();

    assert_eq!(long.column_names(), vec!["country", "year", "cases"]);
    assert_eq!(long.num_rows(), 2);
    assert_eq!(long.row(0).unwrap(), vec![text("AF"), text("1999"), 745.into()]);
    assert_eq!(long.row(1).unwrap(), vec![text("AF"), text("2000"), 2666.into()]);
}

#[test]
fn test_scenario_b_spread() {
    let long = Table::new(vec![
        Column::infer("country", vec![text("AF"), text("AF")]),
        Column::infer("year", vec![text("1999"), text("1999")]),
        Column::infer("key", vec![text("cases"), text("population")]),
        Column::infer("value", vec![745.into(), 19987071.into()]),
    ])
    .unwrap();

    let wide = Spread::new("key", "value").apply(&long).unwrap();

    assert_eq!(
        wide.column_names(),
        vec!["country", "year", "cases", "population"]
    );
    assert_eq!(wide.num_rows(), 1);
    assert_eq!(
        wide.row(0).unwrap(),
        vec![text("AF"), text("1999"), 745.into(), 19987071.into()]
    );
}

#[test]
fn test_scenario_c_separate_regex() {
    let t = Table::new(vec![Column::infer("rate", vec![text("745/19987071")])]).unwrap();

    let plain = Separate::new("rate", ["cases", "population"])
        .pattern("/")
        .apply(&t)
        .unwrap();
    assert_eq!(plain.row(0).unwrap(), vec![text("745"), text("19987071")]);
    assert_eq!(plain.column("cases").unwrap().data_type, DataType::Text);

    let typed = Separate::new("rate", ["cases", "population"])
        .pattern("/")
        .convert(true)
        .apply(&t)
        .unwrap();
    assert_eq!(
        typed.row(0).unwrap(),
        vec![Value::Integer(745), Value::Integer(19987071)]
    );
    assert_eq!(typed.column("population").unwrap().data_type, DataType::Integer);
}

#[test]
fn test_scenario_d_separate_position() {
    let t = Table::new(vec![Column::infer("year", vec![text("1999")])]).unwrap();

    let out = Separate::new("year", ["century", "year"])
        .positions(vec![2])
        .apply(&t)
        .unwrap();

    assert_eq!(out.column_names(), vec!["century", "year"]);
    assert_eq!(out.row(0).unwrap(), vec![text("19"), text("99")]);
}

#[test]
fn test_scenario_e_fill() {
    let t = Table::new(vec![Column::infer(
        "c",
        vec![text("A"), Value::Missing, Value::Missing, text("B")],
    )])
    .unwrap();

    let down = Fill::new(Selector::names(["c"])).apply(&t).unwrap();
    assert_eq!(
        down.column("c").unwrap().values,
        vec![text("A"), text("A"), text("A"), text("B")]
    );

    let up = Fill::new(Selector::names(["c"]))
        .direction(Direction::Up)
        .apply(&t)
        .unwrap();
    assert_eq!(
        up.column("c").unwrap().values,
        vec![text("A"), text("B"), text("B"), text("B")]
    );
}

#[test]
fn test_scenario_f_duplicate_key_error() {
    let t = Table::new(vec![
        Column::infer("id", vec![text("X"), text("X")]),
        Column::infer("year", vec![text("2020"), text("2020")]),
        Column::infer("key", vec![text("cases"), text("cases")]),
        Column::infer("value", vec![10.into(), 20.into()]),
    ])
    .unwrap();

    let err = Spread::new("key", "value").apply(&t).unwrap_err();
    assert!(matches!(err, Error::DuplicateKeyInGroup { .. }));
    assert!(err.to_string().contains("(X, 2020)"));
}
