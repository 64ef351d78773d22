//! Dynamic records exchanged with the backend.
//!
//! A record is an insertion-ordered JSON object. An absent key means the
//! value was never set; an explicit `null` is a value like any other.

use serde_json::{Map, Value};

/// A single backend row or form payload.
pub type Record = Map<String, Value>;

/// Status flag value for active rows.
pub const ESTATUS_ACTIVE: i64 = 1;

/// Extract the record's `id` as a string, whether the backend sent a
/// string or a number.
pub fn record_id(record: &Record) -> Option<String> {
    match record.get("id")? {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

/// Whether a value counts as "not provided" for validation purposes.
pub fn is_empty_value(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

/// Text form of a value, as a text input would show it.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
