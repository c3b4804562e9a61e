//! Observation log behaviour tests
//!
//! Covers the accumulate-then-read-out workflow end to end.

use observation_log::{
    Derivation, Error, FieldType, LogState, ObservationLog, Schema, Value,
};

fn ab_sum_log() -> ObservationLog {
    let schema = Schema::builder().integer("a").integer("b").build().unwrap();
    ObservationLog::builder(schema)
        .derivation(Derivation::sum("sum", "a", "b"))
        .build()
        .unwrap()
}

fn row_values(log: &ObservationLog) -> Vec<Vec<Value>> {
    log.history()
        .rows()
        .iter()
        .map(|row| row.values().to_vec())
        .collect()
}

// =============================================================================
// Accumulation scenario
// =============================================================================

#[test]
fn test_sum_scenario() {
    let mut log = ab_sum_log();

    log.set("a", 2_i64).unwrap();
    log.set("b", 3_i64).unwrap();
    log.derive().unwrap();
    assert_eq!(log.get("sum").unwrap(), Some(Value::Integer(5)));

    log.record().unwrap();
    assert_eq!(
        row_values(&log),
        vec![vec![Value::Integer(2), Value::Integer(3), Value::Integer(5)]]
    );

    log.set("a", 10_i64).unwrap();
    log.derive().unwrap();
    log.record().unwrap();
    assert_eq!(
        row_values(&log),
        vec![
            vec![Value::Integer(2), Value::Integer(3), Value::Integer(5)],
            vec![Value::Integer(10), Value::Integer(3), Value::Integer(13)],
        ]
    );

    let json = serde_json::to_value(log.history()).unwrap();
    assert_eq!(
        json,
        serde_json::json!([
            {"a": 2, "b": 3, "sum": 5},
            {"a": 10, "b": 3, "sum": 13}
        ])
    );
}

#[test]
fn test_derive_before_set_is_missing_value() {
    let mut log = ab_sum_log();

    let err = log.derive().unwrap_err();
    assert!(matches!(err, Error::MissingValue { ref field } if field == "a"));
    assert_eq!(log.history().len(), 0);
    assert_eq!(log.get("sum").unwrap(), None);
}

#[test]
fn test_derive_with_one_input_unset() {
    let mut log = ab_sum_log();
    log.set("a", 1_i64).unwrap();

    let err = log.derive().unwrap_err();
    assert!(matches!(err, Error::MissingValue { ref field } if field == "b"));
}

#[test]
fn test_get_unset_returns_none() {
    let log = ab_sum_log();
    assert_eq!(log.get("a").unwrap(), None);
    assert_eq!(log.state(), LogState::Uninitialized);
}

// =============================================================================
// History invariants
// =============================================================================

#[test]
fn test_live_values_independent_of_history() {
    let mut log = ab_sum_log();
    log.set("a", 1_i64).unwrap();
    log.set("b", 1_i64).unwrap();
    log.derive().unwrap();
    log.record().unwrap();

    let before = log.history().rows()[0].clone();
    log.set("a", 99_i64).unwrap();
    log.derive().unwrap();
    log.unset("b").unwrap();

    assert_eq!(log.history().len(), 1);
    assert_eq!(log.history().rows()[0], before);
}

#[test]
fn test_rows_in_call_order() {
    let schema = Schema::builder().integer("time").build().unwrap();
    let mut log = ObservationLog::new(schema);
    for t in [5_i64, 1, 3] {
        log.set("time", t).unwrap();
        log.record().unwrap();
    }

    assert_eq!(
        log.history().column("time").unwrap(),
        [Value::Integer(5), Value::Integer(1), Value::Integer(3)]
    );
    let sequences: Vec<u64> = log.history().rows().iter().map(|r| r.sequence()).collect();
    assert_eq!(sequences, [0, 1, 2]);
}

#[test]
fn test_schema_change_after_record_rejected() {
    let mut log = ab_sum_log();
    log.set("a", 1_i64).unwrap();
    log.set("b", 2_i64).unwrap();
    log.derive().unwrap();
    log.record().unwrap();

    log.declare_field("c", FieldType::Float).unwrap();
    log.set("c", 0.5).unwrap();

    let err = log.record().unwrap_err();
    match err {
        Error::SchemaMismatch { expected, found } => {
            assert_eq!(expected, "a, b, sum");
            assert_eq!(found, "a, b, sum, c");
        }
        other => panic!("expected SchemaMismatch, got {other:?}"),
    }
    assert_eq!(log.history().len(), 1);
    assert_eq!(log.history().schema().len(), 3);
}

#[test]
fn test_declare_duplicate_field_rejected() {
    let mut log = ab_sum_log();
    assert!(matches!(
        log.declare_field("a", FieldType::Integer),
        Err(Error::InvalidSchema(_))
    ));
}

#[test]
fn test_into_history_outlives_log() {
    let mut log = ab_sum_log();
    log.set("a", 4_i64).unwrap();
    log.set("b", 4_i64).unwrap();
    log.derive().unwrap();
    log.record().unwrap();

    let history = log.into_history();
    assert_eq!(history.get(0).unwrap().get("sum"), Some(Value::Integer(8)));
}

// =============================================================================
// Derivations and inherited schemas
// =============================================================================

#[test]
fn test_difference_and_remainder() {
    let schema = Schema::builder().integer("x").integer("y").build().unwrap();

    let mut diff = ObservationLog::builder(schema.clone())
        .derivation(Derivation::difference("d", "x", "y"))
        .build()
        .unwrap();
    diff.set("x", 10_i64).unwrap();
    diff.set("y", 4_i64).unwrap();
    assert_eq!(diff.derive().unwrap(), Value::Integer(6));

    let mut rem = ObservationLog::builder(schema)
        .derivation(Derivation::remainder("r", "x", "y"))
        .build()
        .unwrap();
    rem.set("x", 10_i64).unwrap();
    rem.set("y", 4_i64).unwrap();
    assert_eq!(rem.derive().unwrap(), Value::Integer(2));
}

#[test]
fn test_derivation_with_undeclared_input_rejected() {
    let schema = Schema::builder().float("x").build().unwrap();
    let result = ObservationLog::builder(schema)
        .derivation(Derivation::sum("s", "x", "missing"))
        .build();
    assert!(matches!(result, Err(Error::InvalidSchema(_))));
}

#[test]
fn test_predeclared_integer_target_rejects_float_result() {
    let schema = Schema::builder()
        .float("x")
        .float("y")
        .integer("s")
        .build()
        .unwrap();
    let mut log = ObservationLog::builder(schema)
        .derivation(Derivation::sum("s", "x", "y"))
        .build()
        .unwrap();
    log.set("x", 0.5).unwrap();
    log.set("y", 0.5).unwrap();

    assert!(matches!(log.derive(), Err(Error::TypeMismatch { .. })));
    assert_eq!(log.get("s").unwrap(), None);
}

#[test]
fn test_child_schema_shares_parent_fields() {
    let parent = Schema::builder()
        .integer("time")
        .float("variable1")
        .float("variable2")
        .build()
        .unwrap();
    let child = Schema::builder().extend(&parent).build().unwrap();

    let mut log = ObservationLog::builder(child)
        .derivation(Derivation::sum("derived_sum", "variable1", "variable2"))
        .build()
        .unwrap();

    log.set("time", 0_i64).unwrap();
    log.set("variable1", 1.5).unwrap();
    log.set("variable2", 2.0).unwrap();
    log.derive().unwrap();
    log.record().unwrap();

    let names: Vec<&str> = log.history().schema().names().collect();
    assert_eq!(names, ["time", "variable1", "variable2", "derived_sum"]);
    assert_eq!(
        log.history().get(0).unwrap().get("derived_sum"),
        Some(Value::Float(3.5))
    );
}

#[test]
fn test_schema_from_json_is_validated() {
    let duplicate = r#"[{"name":"a","ty":"Integer"},{"name":"a","ty":"Float"}]"#;
    assert!(serde_json::from_str::<Schema>(duplicate).is_err());

    let valid = r#"[{"name":"a","ty":"Integer"},{"name":"b","ty":"Float"}]"#;
    let schema: Schema = serde_json::from_str(valid).unwrap();
    let mut log = ObservationLog::new(schema);
    log.set("a", 1_i64).unwrap();
    log.set("b", 0.5).unwrap();
    log.record().unwrap();
    assert_eq!(log.history().len(), 1);
}
