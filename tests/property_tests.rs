//! Structural properties that hold across operators

use tidyshape_core::prelude::*;
use tidyshape_operators::{Complete, Direction, Fill, Gather, Operator, Separate, Spread, Unite};

fn text(s: &str) -> Value {
    Value::from(s)
}

fn table1() -> Table {
    Table::new(vec![
        Column::infer("country", vec![text("AF"), text("BR"), text("CN")]),
        Column::infer("1999", vec![745.into(), 37737.into(), 212258.into()]),
        Column::infer("2000", vec![2666.into(), 80488.into(), 213766.into()]),
    ])
    .unwrap()
}

#[test]
fn test_gather_then_spread_round_trips() {
    let original = table1();
    let long = Gather::new(Selector::names(["1999", "2000"]), "key", "value")
        .apply(&original)
        .unwrap();
    let back = Spread::new("key", "value").apply(&long).unwrap();

    assert_eq!(back.num_rows(), original.num_rows());
    for col in original.columns() {
        let restored = back.column(&col.name).unwrap();
        assert_eq!(restored.values, col.values, "column {}", col.name);
        assert_eq!(restored.data_type, col.data_type);
    }
}

#[test]
fn test_round_trip_with_missing_cells() {
    let original = Table::new(vec![
        Column::infer("id", vec![text("a"), text("b")]),
        Column::infer("x", vec![Value::Missing, 2.5.into()]),
        Column::infer("y", vec![1.0.into(), Value::Missing]),
    ])
    .unwrap();
    let long = Gather::new(Selector::except(Selector::names(["id"])), "k", "v")
        .apply(&original)
        .unwrap();
    let back = Spread::new("k", "v").apply(&long).unwrap();
    assert_eq!(back, original);
}

#[test]
fn test_complete_is_idempotent() {
    let t = Table::new(vec![
        Column::infer("item", vec![text("a"), text("b"), text("b")]),
        Column::infer("yr", vec![1.into(), 2.into(), 3.into()]),
        Column::infer("n", vec![5.into(), Value::Missing, 7.into()]),
    ])
    .unwrap();
    for keys in [
        Selector::names(["item", "yr"]),
        Selector::names(["yr", "item"]),
        Selector::range("yr", "item"),
    ] {
        let once = Complete::new(keys.clone()).apply(&t).unwrap();
        let twice = Complete::new(keys).apply(&once).unwrap();

        assert_eq!(once.num_rows(), 6);
        assert_eq!(fingerprint(&once), fingerprint(&twice));
        assert_eq!(once.column("item").unwrap().data_type, DataType::Text);
        assert_eq!(once.column("yr").unwrap().data_type, DataType::Integer);
    }
}

#[test]
fn test_complete_keeps_keys_in_their_columns_for_any_selector_order() {
    let t = Table::new(vec![
        Column::infer("a", vec![text("x1"), text("x2")]),
        Column::infer("b", vec![text("y1"), text("y2")]),
        Column::infer("n", vec![1.into(), 2.into()]),
    ])
    .unwrap();
    let forward = Complete::new(Selector::names(["a", "b"])).apply(&t).unwrap();
    let backward = Complete::new(Selector::names(["b", "a"])).apply(&t).unwrap();

    let rows = |table: &Table| {
        let mut rows: Vec<Vec<Value>> = (0..table.num_rows()).map(|r| table.row(r).unwrap()).collect();
        rows.sort();
        rows
    };
    assert_eq!(rows(&forward), rows(&backward));
    assert!(rows(&backward).contains(&vec![text("x2"), text("y1"), Value::Missing]));
}

#[test]
fn test_separate_then_unite_restores_text() {
    let t = Table::new(vec![
        Column::infer("id", vec![1.into(), 2.into(), 3.into()]),
        Column::infer("c", vec![text("1999"), text("2000"), text("ab")]),
    ])
    .unwrap();
    let split = Separate::new("c", ["a", "b"])
        .positions(vec![2])
        .apply(&t)
        .unwrap();
    let joined = Unite::new("c2", Selector::names(["a", "b"]))
        .sep("")
        .apply(&split)
        .unwrap();

    assert_eq!(joined.column_names(), vec!["id", "c2"]);
    assert_eq!(
        joined.column("c2").unwrap().values,
        t.column("c").unwrap().values
    );
}

#[test]
fn test_fill_down_leaves_no_gap_after_first_value() {
    let t = Table::new(vec![
        Column::infer(
            "a",
            vec![Value::Missing, Value::Missing, 3.into(), Value::Missing, 5.into(), Value::Missing],
        ),
        Column::infer("b", vec![Value::Missing; 6]),
        Column::infer(
            "c",
            vec![text("x"), Value::Missing, Value::Missing, text("y"), Value::Missing, Value::Missing],
        ),
    ])
    .unwrap();
    let out = Fill::new(Selector::Everything)
        .direction(Direction::Down)
        .apply(&t)
        .unwrap();

    for col in out.columns() {
        let first = col.values.iter().position(|v| !v.is_missing());
        match first {
            None => assert_eq!(col.missing_count(), col.len()),
            Some(i) => assert!(
                col.values[i..].iter().all(|v| !v.is_missing()),
                "column {} still has a gap",
                col.name
            ),
        }
    }
}

#[test]
fn test_operators_never_mutate_input() {
    let t = table1();
    let before = fingerprint(&t);
    let _ = Gather::new(Selector::Everything, "k", "v").apply(&t).unwrap();
    let _ = Fill::new(Selector::Everything).apply(&t).unwrap();
    let _ = Complete::new(Selector::names(["country"])).apply(&t).unwrap();
    assert_eq!(fingerprint(&t), before);
}
