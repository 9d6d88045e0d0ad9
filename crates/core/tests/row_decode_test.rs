use bridgeql_core::{Error, ExecutionError, Row, Value};

fn sample_row() -> Row {
    Row {
        columns: vec![
            "name".to_string(),
            "is_unique".to_string(),
            "parent".to_string(),
        ],
        values: vec![
            Value::String("idx_singers_name".to_string()),
            Value::String("YES".to_string()),
            Value::Null,
        ],
    }
}

#[test]
fn values_resolve_by_column_name() {
    let row = sample_row();
    assert_eq!(
        row.str_value("name", "SELECT ...").unwrap(),
        "idx_singers_name"
    );
    assert_eq!(row.opt_str_value("parent", "SELECT ...").unwrap(), None);
}

#[test]
fn information_schema_string_flags_decode_as_bools() {
    let row = sample_row();
    assert!(row.bool_value("is_unique", "SELECT ...").unwrap());

    let no = Row {
        columns: vec!["flag".to_string()],
        values: vec![Value::String("NO".to_string())],
    };
    assert!(!no.bool_value("flag", "SELECT ...").unwrap());

    let native = Row {
        columns: vec!["flag".to_string()],
        values: vec![Value::Bool(true)],
    };
    assert!(native.bool_value("flag", "SELECT ...").unwrap());
}

#[test]
fn missing_columns_name_the_query() {
    let row = sample_row();
    let error = row
        .value("absent", "SELECT name FROM t")
        .expect_err("unknown column must fail");

    match error {
        Error::Execute(ExecutionError::MissingColumn { column, sql }) => {
            assert_eq!(column, "absent");
            assert_eq!(sql, "SELECT name FROM t");
        }
        other => panic!("expected a missing-column error, got {other:?}"),
    }
}

#[test]
fn statement_failures_keep_the_driver_error_as_source() {
    let source = std::io::Error::new(std::io::ErrorKind::TimedOut, "deadline exceeded");
    let error: Error = ExecutionError::statement_failed("UPDATE t SET x = 1", source).into();

    assert!(error.to_string().contains("UPDATE t SET x = 1"));
    let source = std::error::Error::source(&error).expect("source should be preserved");
    assert!(source.to_string().contains("deadline exceeded"));
}
