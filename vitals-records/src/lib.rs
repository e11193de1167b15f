//! Health documents to `DailySummary`: normalization, parsing, daily
//! reconciliation and the admin roll-ups.

pub mod assessment;
pub mod document;
pub mod normalize;
pub mod overview;
pub mod reconcile;

use serde_json::{Map, Value};
use vitals_core::{DailySummary, VitalsConfig, VitalsError};

pub use document::{admin_record, event_to_document, parse_event, user_profile, Document};
pub use normalize::{normalize, prepare_for_save, LEGACY_SLEEP_KEY, SLEEP_KEY};
pub use reconcile::{absorb, reconcile, reconcile_documents};

/// Summarize health documents from a JSON string.
pub fn summarize_records_str(
    records_json: &str,
    config: &VitalsConfig,
) -> Result<DailySummary, VitalsError> {
    let value: Value =
        serde_json::from_str(records_json).map_err(|err| VitalsError::Parse(err.to_string()))?;
    summarize_records_value(&value, config)
}

/// Summarize health documents from a `serde_json::Value`.
///
/// Accepts an array whose items are either bare field maps or
/// `{"id": ..., "data": {...}}` wrappers.
pub fn summarize_records_value(
    records: &Value,
    config: &VitalsConfig,
) -> Result<DailySummary, VitalsError> {
    let entries = records.as_array().ok_or_else(|| {
        VitalsError::Parse("expected an array of health documents".to_string())
    })?;

    let documents: Vec<Document> = entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| document_from_entry(index, entry))
        .collect();

    Ok(reconcile_documents(&documents, config.window_days))
}

fn document_from_entry(index: usize, entry: &Value) -> Option<Document> {
    let fields = entry.as_object()?;

    if let Some(data) = fields.get("data").and_then(Value::as_object) {
        let id = fields
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("record-{index}"));
        return Some(Document::new(id, data.clone()));
    }

    let mut data: Map<String, Value> = fields.clone();
    let id = match data.remove("id") {
        Some(Value::String(id)) => id,
        _ => format!("record-{index}"),
    };
    Some(Document::new(id, data))
}
