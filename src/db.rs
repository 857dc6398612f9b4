use rusqlite::Connection;
use rusqlite::types::ValueRef;
use serde_json::{Map, Number, Value};

use crate::compare::deep_contains;
use crate::error::AssertError;

/// All rows of a table as JSON objects keyed by column name.
///
/// INTEGER, REAL, TEXT and NULL map to their JSON kinds; BLOB columns render
/// as lowercase hex so they stay comparable as strings.
pub fn fetch_rows(conn: &Connection, table: &str) -> Result<Vec<Value>, AssertError> {
    let mut stmt = conn.prepare(&format!("SELECT * FROM {table}"))?;
    let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let mut object = Map::new();
        for (index, column) in columns.iter().enumerate() {
            object.insert(column.clone(), column_value(row.get_ref(index)?));
        }
        out.push(Value::Object(object));
    }
    Ok(out)
}

/// Assert that some row of `table` contains every expected column/value.
/// Extra columns never count against a row. The failure message dumps the
/// table's rows.
pub fn assert_row(conn: &Connection, table: &str, expected: &Value) -> Result<(), AssertError> {
    let rows = fetch_rows(conn, table)?;
    for row in &rows {
        if deep_contains(row, expected).is_ok() {
            return Ok(());
        }
    }
    Err(AssertError::RowNotFound {
        table: table.to_string(),
        rows: dump_rows(&rows),
    })
}

pub fn assert_no_row(conn: &Connection, table: &str, expected: &Value) -> Result<(), AssertError> {
    match assert_row(conn, table, expected) {
        Ok(()) => Err(AssertError::RowFound(table.to_string())),
        Err(AssertError::RowNotFound { .. }) => Ok(()),
        Err(other) => Err(other),
    }
}

/// Empty a table between scenarios.
pub fn reset_table(conn: &Connection, table: &str) -> Result<(), AssertError> {
    conn.execute(&format!("DELETE FROM {table}"), [])?;
    Ok(())
}

fn column_value(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        ValueRef::Text(text) => Value::String(String::from_utf8_lossy(text).into_owned()),
        ValueRef::Blob(blob) => Value::String(hex::encode(blob)),
    }
}

fn dump_rows(rows: &[Value]) -> String {
    if rows.is_empty() {
        return "-empty-".to_string();
    }
    rows.iter()
        .map(|row| row.to_string())
        .collect::<Vec<_>>()
        .join("\n  ")
}
