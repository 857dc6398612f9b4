use serde_json::{Map, Value};

use crate::error::AssertError;

/// Interpret a two-column table as ordered key/value pairs. Every row must
/// have exactly two cells and keys must be unique.
pub fn rows_hash(rows: &[Vec<String>]) -> Result<Vec<(String, String)>, AssertError> {
    let mut pairs: Vec<(String, String)> = Vec::with_capacity(rows.len());
    for row in rows {
        let [key, value] = row.as_slice() else {
            return Err(AssertError::BadTableRow(row.len()));
        };
        if pairs.iter().any(|(existing, _)| existing == key) {
            return Err(AssertError::DuplicateTableKey(key.clone()));
        }
        pairs.push((key.clone(), value.clone()));
    }
    Ok(pairs)
}

/// The same data as a JSON object of strings, ready for the deep comparator.
pub fn rows_hash_value(rows: &[Vec<String>]) -> Result<Value, AssertError> {
    let mut map = Map::new();
    for (key, value) in rows_hash(rows)? {
        map.insert(key, Value::String(value));
    }
    Ok(Value::Object(map))
}
