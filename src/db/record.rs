use rusqlite::types::ValueRef;
use rusqlite::Row;
use serde_json::{Map, Number, Value};

/// One table row as an ordered column -> value mapping
pub type Record = Map<String, Value>;

/// Convert a single SQLite value to JSON
pub fn to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Number(i.into()),
        ValueRef::Real(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        ValueRef::Text(t) => Value::String(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::Array(b.iter().map(|byte| Value::from(*byte)).collect()),
    }
}

/// Read every column of `row` into a [`Record`], keeping column order
pub fn read_record(row: &Row<'_>, columns: &[String]) -> rusqlite::Result<Record> {
    let mut record = Map::with_capacity(columns.len());
    for (idx, name) in columns.iter().enumerate() {
        record.insert(name.clone(), to_json(row.get_ref(idx)?));
    }
    Ok(record)
}

/// File stem used for a record's export file, derived from its dex value
pub fn file_stem(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i.to_string())
            } else {
                n.as_f64().map(|f| {
                    if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                        (f as i64).to_string()
                    } else {
                        f.to_string()
                    }
                })
            }
        }
        Value::String(s) if is_plain_file_name(s) => Some(s.clone()),
        _ => None,
    }
}

/// Text stems must name a file directly inside the output directory
fn is_plain_file_name(s: &str) -> bool {
    !s.is_empty() && s != "." && s != ".." && !s.contains(['/', '\\', '\0'])
}
