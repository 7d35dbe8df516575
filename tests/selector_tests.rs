//! Selectors driving operator targets

use tidyshape_core::prelude::*;
use tidyshape_core::selector::ColumnPredicate;
use tidyshape_operators::{Gather, Operator, Unite};

fn billboard() -> Table {
    Table::new(vec![
        Column::infer("artist", vec![Value::from("2 Pac")]),
        Column::infer("track", vec![Value::from("Baby Don't Cry")]),
        Column::infer("wk1", vec![87.into()]),
        Column::infer("wk2", vec![82.into()]),
        Column::infer("wk3", vec![Value::Missing]),
    ])
    .unwrap()
}

fn gathered_keys(selector: Selector) -> Vec<Value> {
    let out = Gather::new(selector, "week", "rank")
        .apply(&billboard())
        .unwrap();
    out.column("week").unwrap().values.clone()
}

#[test]
fn test_range_selector() {
    assert_eq!(
        gathered_keys(Selector::range("wk1", "wk3")),
        vec![Value::from("wk1"), "wk2".into(), "wk3".into()]
    );
}

#[test]
fn test_reversed_range_walks_backwards() {
    assert_eq!(
        gathered_keys(Selector::range("wk2", "wk1")),
        vec![Value::from("wk2"), "wk1".into()]
    );
}

#[test]
fn test_predicate_selector() {
    let keys = gathered_keys(Selector::Predicate(ColumnPredicate::StartsWith("wk".into())));
    assert_eq!(keys.len(), 3);
    let keys = gathered_keys(Selector::Predicate(ColumnPredicate::Matches("^wk[12]$".into())));
    assert_eq!(keys.len(), 2);
}

#[test]
fn test_custom_predicate_sees_types() {
    let keys = gathered_keys(Selector::matching(|f| f.data_type == DataType::Integer));
    assert_eq!(keys, vec![Value::from("wk1"), "wk2".into()]);
}

#[test]
fn test_position_selector_counts_from_either_end() {
    assert_eq!(
        gathered_keys(Selector::positions([3, -1])),
        vec![Value::from("wk1"), "wk3".into()]
    );
    let err = Gather::new(Selector::positions([0]), "k", "v")
        .apply(&billboard())
        .unwrap_err();
    assert!(matches!(err, Error::UnknownColumn(_)));
}

#[test]
fn test_unknown_name_is_reported() {
    let err = Unite::new("x", Selector::names(["artist", "album"]))
        .apply(&billboard())
        .unwrap_err();
    match err {
        Error::UnknownColumn(name) => assert_eq!(name, "album"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_selector_deserializes() {
    let s: Selector = serde_json::from_str(r#"{"except": {"range": {"from": "artist", "to": "track"}}}"#)
        .unwrap();
    assert_eq!(gathered_keys(s).len(), 3);
}
