//! Field-name normalization for raw health documents.

use serde_json::{Map, Value};

/// Canonical spelling of the sleep field.
pub const SLEEP_KEY: &str = "horasDeSueno";
/// Historical spelling still present in older documents.
pub const LEGACY_SLEEP_KEY: &str = "horasDeSue\u{f1}o";

/// Collapse both sleep spellings into [`SLEEP_KEY`].
///
/// The canonical value wins when truthy, then any non-null legacy value,
/// then `0`. The legacy key is always removed.
pub fn normalize(record: &Map<String, Value>) -> Map<String, Value> {
    let mut normalized = record.clone();
    let legacy = normalized.remove(LEGACY_SLEEP_KEY);
    let current = normalized.remove(SLEEP_KEY);

    let sleep = match (current, legacy) {
        (Some(value), _) if is_truthy(&value) => value,
        (_, Some(value)) if !value.is_null() => value,
        _ => Value::from(0),
    };

    normalized.insert(SLEEP_KEY.to_string(), sleep);
    normalized
}

/// Normalize and drop every `null` field so nothing empty reaches the store.
pub fn prepare_for_save(record: &Map<String, Value>) -> Map<String, Value> {
    let mut cleaned = normalize(record);
    cleaned.retain(|_, value| !value.is_null());
    cleaned
}

/// JSON truthiness as the stored documents were historically written against.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number
            .as_f64()
            .map_or(false, |v| v != 0.0 && !v.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
