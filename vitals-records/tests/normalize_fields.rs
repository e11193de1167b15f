use serde_json::{json, Map, Value};
use vitals_records::{normalize, parse_event, prepare_for_save, LEGACY_SLEEP_KEY, SLEEP_KEY};

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

#[test]
fn legacy_spelling_is_folded_into_canonical_key() {
    let record = object(json!({
        "fecha": "2025-12-01",
        "horasDeSueño": 7.5,
        "frecuenciaCardiaca": 75,
    }));

    let normalized = normalize(&record);

    assert_eq!(normalized.get(SLEEP_KEY), Some(&json!(7.5)));
    assert!(!normalized.contains_key(LEGACY_SLEEP_KEY));
    assert_eq!(normalized.get("frecuenciaCardiaca"), Some(&json!(75)));
}

#[test]
fn canonical_spelling_wins_when_both_exist() {
    let record = object(json!({ "horasDeSueno": 6.0, "horasDeSueño": 8.0 }));
    let normalized = normalize(&record);
    assert_eq!(normalized.get(SLEEP_KEY), Some(&json!(6.0)));
    assert!(!normalized.contains_key(LEGACY_SLEEP_KEY));
}

#[test]
fn falsy_canonical_value_falls_back_to_legacy() {
    let record = object(json!({ "horasDeSueno": 0, "horasDeSueño": 5.5 }));
    assert_eq!(normalize(&record).get(SLEEP_KEY), Some(&json!(5.5)));
}

#[test]
fn empty_record_gets_zero_sleep() {
    let normalized = normalize(&Map::new());
    assert_eq!(normalized.get(SLEEP_KEY), Some(&json!(0)));
    assert_eq!(normalized.len(), 1);
}

#[test]
fn null_legacy_value_is_treated_as_absent() {
    let record = object(json!({ "horasDeSueño": null }));
    let normalized = normalize(&record);
    assert_eq!(normalized.get(SLEEP_KEY), Some(&json!(0)));
    assert!(!normalized.contains_key(LEGACY_SLEEP_KEY));
}

#[test]
fn prepare_for_save_strips_absent_values() {
    let record = object(json!({
        "fecha": "2025-12-01",
        "horasDeSueño": 7.0,
        "frecuenciaCardiaca": 80,
        "nivelDeEstres": 30,
        "pasosDiarios": null,
        "peso": null,
    }));

    let saved = prepare_for_save(&normalize(&record));

    assert_eq!(saved.get(SLEEP_KEY), Some(&json!(7.0)));
    assert_eq!(saved.get("frecuenciaCardiaca"), Some(&json!(80)));
    assert_eq!(saved.get("nivelDeEstres"), Some(&json!(30)));
    assert!(saved.values().all(|value| !value.is_null()));
    assert!(!saved.contains_key("pasosDiarios"));
    assert!(!saved.contains_key(LEGACY_SLEEP_KEY));
}

#[test]
fn parsing_treats_wrong_types_as_absent() {
    let record = object(json!({
        "fecha": "2025-11-26",
        "saturacionOxigeno": "NaN",
        "pasosDiarios": "4200",
        "frecuenciaCardiaca": true,
        "relojColocado": true,
        "createdAt": { "_seconds": 1764168000, "_nanoseconds": 0 },
    }));

    let event = parse_event(Some("doc-1"), &record);

    assert_eq!(event.id.as_deref(), Some("doc-1"));
    assert_eq!(event.oxygen_saturation, None);
    assert_eq!(event.daily_steps, Some(4200.0));
    assert_eq!(event.heart_rate, None);
    assert_eq!(event.watch_worn, Some(true));
    assert_eq!(event.sleep_hours, Some(0.0));
    assert_eq!(
        event.created_at.map(|ts| ts.to_rfc3339()),
        Some("2025-11-26T14:40:00+00:00".to_string())
    );
}
