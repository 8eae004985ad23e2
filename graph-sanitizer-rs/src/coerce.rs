//! String coercion of loosely-typed JSON values
//!
//! Element ids, labels and types are compared and rendered as strings. The
//! coercion follows the conventions of the browser runtime the graph payloads
//! were designed for, so `1` and `"1"` name the same node and an absent value
//! becomes the literal `"undefined"`.

use serde_json::{Number, Value};

/// Coerce an optional JSON value to its display string.
///
/// `None` stands for an absent field.
pub fn coerce_string(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(Value::Null) => "null".to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => coerce_number(n),
        Some(Value::String(s)) => s.clone(),
        // null entries inside arrays render as empty strings
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => coerce_string(Some(other)),
            })
            .collect::<Vec<_>>()
            .join(","),
        Some(Value::Object(_)) => "[object Object]".to_string(),
    }
}

/// True when the value is absent or JSON `null`
pub fn is_nullish(value: Option<&Value>) -> bool {
    matches!(value, None | Some(Value::Null))
}

fn coerce_number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }

    match n.as_f64() {
        Some(f) if f == 0.0 => "0".to_string(),
        Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e21 => format!("{:.0}", f),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}
