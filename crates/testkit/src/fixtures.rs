use bridgeql_core::{Column, DataType, ResultSet, Row, Table, Value};

/// The canonical two-column table most dialect tests start from.
pub fn singers_table() -> Table {
    Table::named("singers")
        .column(Column::new("singer_id", DataType::BigInt).not_null())
        .column(Column::new("name", DataType::Varchar { length: Some(20) }))
        .primary_key(["singer_id"])
}

/// A child of `singers`, keyed by the parent's primary key prefix. Callers
/// add the interleave options themselves so tests show the full spelling.
pub fn albums_table() -> Table {
    Table::named("albums")
        .column(Column::new("singer_id", DataType::BigInt).not_null())
        .column(Column::new("album_id", DataType::BigInt).not_null())
        .column(Column::new("title", DataType::Text))
        .primary_key(["singer_id", "album_id"])
}

/// Builds a row with matching column/value lists. Panics on length mismatch
/// so a bad fixture fails loudly.
pub fn row(columns: &[&str], values: Vec<Value>) -> Row {
    assert_eq!(
        columns.len(),
        values.len(),
        "fixture row has {} columns but {} values",
        columns.len(),
        values.len()
    );
    Row {
        columns: columns.iter().map(|name| (*name).to_string()).collect(),
        values,
    }
}

pub fn result_set(rows: Vec<Row>) -> ResultSet {
    ResultSet {
        rows,
        row_count: None,
    }
}

pub fn dml_result(row_count: i64) -> ResultSet {
    ResultSet {
        rows: Vec::new(),
        row_count: Some(row_count),
    }
}
