//! Conversion between schemaless store documents and typed records.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use vitals_core::{AdminHealthRecord, HealthEvent, UserProfile, VitalsError};

use crate::normalize::{normalize, prepare_for_save, SLEEP_KEY};

pub const DATE_KEY: &str = "fecha";
pub const RECORDED_TIME_KEY: &str = "horaRegistro";
pub const HEART_RATE_KEY: &str = "frecuenciaCardiaca";
pub const HEART_RATE_MIN_KEY: &str = "frecuenciaCardiacaMin";
pub const HEART_RATE_MAX_KEY: &str = "frecuenciaCardiacaMax";
pub const STRESS_KEY: &str = "nivelDeEstres";
pub const OXYGEN_KEY: &str = "saturacionOxigeno";
pub const STEPS_KEY: &str = "pasosDiarios";
pub const HEIGHT_KEY: &str = "altura";
pub const WEIGHT_KEY: &str = "peso";
pub const WATCH_WORN_KEY: &str = "relojColocado";
pub const SCREEN_TIME_KEY: &str = "tiempoPantalla";
pub const CREATED_AT_KEY: &str = "createdAt";
pub const LAST_UPDATED_KEY: &str = "lastUpdated";
pub const EVENT_TIMESTAMP_KEY: &str = "event_timestamp";

pub const NO_EMAIL: &str = "Sin email";
pub const NO_NAME: &str = "Sin nombre";
pub const NOT_REGISTERED: &str = "No registrado";
pub const NOT_SPECIFIED: &str = "No especificado";

/// A stored document: server-assigned id plus its field map.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    pub id: String,
    pub data: Map<String, Value>,
}

impl Document {
    pub fn new(id: impl Into<String>, data: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }

    /// Typed view of a health-record document.
    pub fn to_event(&self) -> HealthEvent {
        parse_event(Some(&self.id), &self.data)
    }
}

/// Parse one raw health document. The sleep field is normalized first;
/// values of the wrong type are treated as absent.
pub fn parse_event(id: Option<&str>, data: &Map<String, Value>) -> HealthEvent {
    let data = normalize(data);

    HealthEvent {
        id: id.map(str::to_string),
        date: string_field(&data, DATE_KEY),
        recorded_time: string_field(&data, RECORDED_TIME_KEY),
        sleep_hours: number_field(&data, SLEEP_KEY),
        heart_rate: number_field(&data, HEART_RATE_KEY),
        heart_rate_min: number_field(&data, HEART_RATE_MIN_KEY),
        heart_rate_max: number_field(&data, HEART_RATE_MAX_KEY),
        stress_level: number_field(&data, STRESS_KEY),
        oxygen_saturation: number_field(&data, OXYGEN_KEY),
        daily_steps: number_field(&data, STEPS_KEY),
        height: number_field(&data, HEIGHT_KEY),
        weight: number_field(&data, WEIGHT_KEY),
        watch_worn: data.get(WATCH_WORN_KEY).and_then(Value::as_bool),
        screen_time: number_field(&data, SCREEN_TIME_KEY),
        created_at: timestamp_field(&data, CREATED_AT_KEY),
        last_updated: timestamp_field(&data, LAST_UPDATED_KEY),
        event_timestamp: timestamp_field(&data, EVENT_TIMESTAMP_KEY),
    }
}

/// Field map ready for `add_doc`: normalized, without `id` and without nulls.
pub fn event_to_document(event: &HealthEvent) -> Result<Map<String, Value>, VitalsError> {
    let value = serde_json::to_value(event).map_err(|err| VitalsError::Parse(err.to_string()))?;
    let Value::Object(mut fields) = value else {
        return Err(VitalsError::Parse(
            "health record did not serialize to an object".to_string(),
        ));
    };
    fields.remove("id");
    Ok(prepare_for_save(&fields))
}

/// Reduced record for the admin roll-ups; absent metrics become 0.
pub fn admin_record(data: &Map<String, Value>) -> AdminHealthRecord {
    let data = normalize(data);
    AdminHealthRecord {
        date: string_field(&data, DATE_KEY).unwrap_or_default(),
        sleep_hours: number_field(&data, SLEEP_KEY).unwrap_or(0.0),
        heart_rate: number_field(&data, HEART_RATE_KEY).unwrap_or(0.0),
        stress_level: number_field(&data, STRESS_KEY).unwrap_or(0.0),
        daily_steps: number_field(&data, STEPS_KEY).unwrap_or(0.0),
        oxygen_saturation: number_field(&data, OXYGEN_KEY).unwrap_or(0.0),
    }
}

/// Profile document from the `users` collection with display defaults.
pub fn user_profile(id: &str, data: &Map<String, Value>) -> UserProfile {
    let text = |key: &str, fallback: &str| {
        string_field(data, key).unwrap_or_else(|| fallback.to_string())
    };

    UserProfile {
        id: id.to_string(),
        email: text("email", NO_EMAIL),
        name: text("name", NO_NAME),
        emergency_contact: text("emergencyContact", NOT_REGISTERED),
        dob: text("dob", NOT_REGISTERED),
        height: number_field(data, "height").unwrap_or(0.0),
        weight: number_field(data, "weight").unwrap_or(0.0),
        sex: number_field(data, "sex").map_or(0, |sex| sex as i64),
        goal: text("goal", NOT_SPECIFIED),
        creation_date: timestamp_field(data, "creationDate"),
    }
}

fn string_field(data: &Map<String, Value>, key: &str) -> Option<String> {
    data.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

fn number_field(data: &Map<String, Value>, key: &str) -> Option<f64> {
    let number = match data.get(key)? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|value| value.is_finite())
}

/// Accepts RFC 3339 strings, exported store timestamps
/// (`{"seconds", "nanoseconds"}`, optionally underscore-prefixed) and epoch
/// milliseconds.
fn timestamp_field(data: &Map<String, Value>, key: &str) -> Option<DateTime<Utc>> {
    match data.get(key)? {
        Value::String(text) => parse_datetime(text),
        Value::Number(number) => number
            .as_i64()
            .and_then(DateTime::<Utc>::from_timestamp_millis),
        Value::Object(obj) => {
            let seconds = obj
                .get("seconds")
                .or_else(|| obj.get("_seconds"))
                .and_then(Value::as_i64)?;
            let nanos = obj
                .get("nanoseconds")
                .or_else(|| obj.get("_nanoseconds"))
                .and_then(Value::as_u64)
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(0);
            DateTime::<Utc>::from_timestamp(seconds, nanos)
        }
        _ => None,
    }
}

fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|naive| naive.and_utc())
        })
}
