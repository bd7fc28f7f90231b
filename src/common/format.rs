use serde_json::Value;

pub fn two_decimals(value: f64) -> String {
    format!("{value:.2}")
}

/// Text shown for a single JSON value in the values table. Strings are shown without quotes.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}
