//! YAML pipeline parsing and end-to-end engine runs

use std::sync::Arc;

use tidyshape_core::prelude::*;
use tidyshape_exec::{verify_replay, Engine, ExecError};
use tidyshape_planner::{parse_yaml_pipeline, PlanError, Step};

fn text(s: &str) -> Value {
    Value::from(s)
}

/// Country/year table with the rate packed into one text column.
fn table3() -> Table {
    Table::new(vec![
        Column::infer("country", vec![text("AF"), text("AF"), text("BR")]),
        Column::infer("year", vec![text("1999"), text("2000"), text("1999")]),
        Column::infer(
            "rate",
            vec![text("745/19987071"), text("2666/20595360"), text("37737/172006362")],
        ),
    ])
    .unwrap()
}

#[test]
fn test_parse_simple_pipeline() {
    let yaml = r#"
steps:
  - op: separate
    column: rate
    into: [cases, population]
    sep: "/"
    convert: true
  - op: gather
    columns: { names: [cases, population] }
    key: type
    value: count
"#;
    let parsed = parse_yaml_pipeline(yaml).unwrap();
    assert_eq!(parsed.steps.len(), 2);
    assert!(matches!(parsed.steps[0], Step::Separate { .. }));
}

#[test]
fn test_unknown_op_is_rejected() {
    let yaml = r#"
steps:
  - op: pivot_wider
    names_from: key
"#;
    assert!(matches!(parse_yaml_pipeline(yaml), Err(PlanError::Yaml(_))));
}

#[test]
fn test_tidy_table3_round_trip() {
    let yaml = r#"
steps:
  - op: separate
    column: rate
    into: [cases, population]
    convert: true
  - op: gather
    columns: { names: [cases, population] }
    key: type
    value: count
  - op: spread
    key: type
    value: count
"#;
    let out = Engine::new(EngineConfig::default())
        .run_yaml(yaml, &table3())
        .unwrap();
    let t = out.table;
    assert_eq!(t.column_names(), vec!["country", "year", "cases", "population"]);
    assert_eq!(t.num_rows(), 3);
    assert_eq!(
        t.row(2).unwrap(),
        vec![text("BR"), text("1999"), 37737.into(), 172006362.into()]
    );
    assert_eq!(out.manifest.steps.len(), 3);
    assert_eq!(out.manifest.steps[1].rows_out, 6);
}

#[test]
fn test_spread_gather_then_drop_na() {
    let yaml = r#"
steps:
  - op: spread
    key: year
    value: rate
  - op: gather
    columns: { except: { names: [country] } }
    key: year
    value: rate
  - op: drop_na
    columns: { names: [rate] }
"#;
    let out = Engine::new(EngineConfig::default())
        .run_yaml(yaml, &table3())
        .unwrap();
    assert_eq!(out.table.num_rows(), 3);
    assert_eq!(out.manifest.steps[0].rows_out, 2);
    assert_eq!(out.manifest.steps[1].rows_out, 4);
}

#[test]
fn test_complete_fill_map_from_yaml() {
    let t = Table::new(vec![
        Column::infer("item", vec![text("a"), text("b")]),
        Column::infer("yr", vec![1.into(), 2.into()]),
        Column::infer("n", vec![5.into(), 6.into()]),
    ])
    .unwrap();
    let yaml = r#"
steps:
  - op: complete
    columns: { names: [item, yr] }
    fill: { n: 0 }
"#;
    let out = Engine::new(EngineConfig::default()).run_yaml(yaml, &t).unwrap();
    assert_eq!(
        out.table.column("n").unwrap().values,
        vec![Value::from(5), 0.into(), 0.into(), 6.into()]
    );
}

#[test]
fn test_calendar_collaborator_is_injected() {
    let t = Table::new(vec![
        Column::infer("id", vec![text("a"), text("b")]),
        Column::infer("when", vec![text("2020-01-31"), text("2020-02-01")]),
    ])
    .unwrap();
    let yaml = r#"
steps:
  - op: gather
    columns: { names: [when] }
    key: field
    value: at
    convert: true
"#;
    let plain = Engine::new(EngineConfig::default()).run_yaml(yaml, &t).unwrap();
    assert_eq!(plain.table.column("at").unwrap().data_type, DataType::Text);

    let parser = |s: &str| -> Option<CalendarValue> {
        let (y, rest) = s.split_once('-')?;
        let (m, d) = rest.split_once('-')?;
        let ordinal = y.parse::<i64>().ok()? * 372 + m.parse::<i64>().ok()? * 31 + d.parse::<i64>().ok()?;
        Some(CalendarValue::new(CalendarKind::Date, ordinal, s))
    };
    let with_calendar = Engine::new(EngineConfig::default())
        .with_calendar(Arc::new(parser))
        .run_yaml(yaml, &t)
        .unwrap();
    let at = with_calendar.table.column("at").unwrap();
    assert_eq!(at.data_type, DataType::Calendar);
    assert!(at.values[0] < at.values[1]);
}

#[cfg(feature = "chrono")]
#[test]
fn test_iso_calendar_engine() {
    let t = Table::new(vec![Column::infer(
        "ts",
        vec![text("2021-03-04T05:06:07"), Value::Missing],
    )])
    .unwrap();
    let yaml = r#"
steps:
  - op: gather
    columns: everything
    key: k
    value: v
    convert: true
"#;
    let out = Engine::new(EngineConfig::default())
        .with_iso_calendar()
        .run_yaml(yaml, &t)
        .unwrap();
    let v = out.table.column("v").unwrap();
    assert_eq!(v.data_type, DataType::Calendar);
    assert_eq!(v.values[0].to_string(), "2021-03-04 05:06:07");
}

#[test]
fn test_failing_step_reports_index() {
    let yaml = r#"
steps:
  - op: unite
    name: label
    columns: { names: [country, year] }
  - op: separate
    column: label
    into: [a, b]
    extra: error
    sep: "x"
    fill: error
"#;
    let err = Engine::new(EngineConfig::default())
        .run_yaml(yaml, &table3())
        .unwrap_err();
    match err {
        ExecError::Operator { step, op, source } => {
            assert_eq!(step, 1);
            assert_eq!(op, "separate");
            assert!(matches!(source, Error::TooFewPieces { row: 0, .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_manifest_replays() {
    let parsed = parse_yaml_pipeline(
        "steps:\n  - { op: separate, column: rate, into: [cases, population] }\n",
    )
    .unwrap();
    let engine = Engine::new(EngineConfig::default());
    let first = engine.run_pipeline(&parsed, &table3()).unwrap();
    let second = engine.run_pipeline(&parsed, &table3()).unwrap();
    assert_ne!(first.manifest.id, second.manifest.id);
    assert_eq!(first.manifest.output_digest, second.manifest.output_digest);
    assert!(verify_replay(&engine, &parsed, &table3(), &first.manifest).unwrap());
}

#[test]
fn test_manifest_serializes_to_json() {
    let out = Engine::new(EngineConfig::default())
        .run_yaml("steps:\n  - { op: fill, columns: everything }\n", &table3())
        .unwrap();
    let json = serde_json::to_value(&out.manifest).unwrap();
    assert_eq!(json["steps"][0]["op"], "fill");
    assert_eq!(json["engine_version"], tidyshape_core::VERSION);
}
