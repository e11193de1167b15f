//! Shared data model for health records, daily summaries and the admin overview.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default number of distinct dates kept in the dashboard window.
pub const DEFAULT_WINDOW_DAYS: usize = 7;
/// Default number of raw documents requested per fetch.
pub const DEFAULT_FETCH_LIMIT: usize = 200;
/// Default address allowed into the admin overview.
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@samsung.cl";

/// Runtime settings for fetching, windowing and the admin gate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VitalsConfig {
    /// Number of most recent distinct dates returned by the reconciler.
    pub window_days: usize,
    /// Maximum raw documents requested from the store per fetch.
    pub fetch_limit: usize,
    /// Email of the single identity allowed into the admin overview.
    pub admin_email: String,
}

impl Default for VitalsConfig {
    fn default() -> Self {
        Self {
            window_days: DEFAULT_WINDOW_DAYS,
            fetch_limit: DEFAULT_FETCH_LIMIT,
            admin_email: DEFAULT_ADMIN_EMAIL.to_string(),
        }
    }
}

impl VitalsConfig {
    /// Build a config from `VITALS_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Unset keys keep their
    /// defaults; unparsable numbers are ignored with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(days) = parse_count(&lookup, "VITALS_WINDOW_DAYS") {
            config.window_days = days;
        }
        if let Some(limit) = parse_count(&lookup, "VITALS_FETCH_LIMIT") {
            config.fetch_limit = limit;
        }
        if let Some(email) = lookup("VITALS_ADMIN_EMAIL") {
            let email = email.trim();
            if !email.is_empty() {
                config.admin_email = email.to_string();
            }
        }

        config
    }
}

fn parse_count<F>(lookup: &F, key: &str) -> Option<usize>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<usize>() {
        Ok(value) if value > 0 => Some(value),
        _ => {
            tracing::warn!(key, value = %raw, "ignoring invalid configuration value");
            None
        }
    }
}

/// One health document as written by a device or the generator.
///
/// Field names on the wire follow the document store schema. Every value is
/// optional; absence is distinct from zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HealthEvent {
    /// Store-assigned document id, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Calendar date key (`YYYY-MM-DD`).
    #[serde(rename = "fecha", default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Local wall-clock time of the reading (`HH:MM`).
    #[serde(rename = "horaRegistro", default, skip_serializing_if = "Option::is_none")]
    pub recorded_time: Option<String>,
    #[serde(rename = "horasDeSueno", default, skip_serializing_if = "Option::is_none")]
    pub sleep_hours: Option<f64>,
    #[serde(rename = "frecuenciaCardiaca", default, skip_serializing_if = "Option::is_none")]
    pub heart_rate: Option<f64>,
    #[serde(rename = "frecuenciaCardiacaMin", default, skip_serializing_if = "Option::is_none")]
    pub heart_rate_min: Option<f64>,
    #[serde(rename = "frecuenciaCardiacaMax", default, skip_serializing_if = "Option::is_none")]
    pub heart_rate_max: Option<f64>,
    #[serde(rename = "nivelDeEstres", default, skip_serializing_if = "Option::is_none")]
    pub stress_level: Option<f64>,
    #[serde(rename = "saturacionOxigeno", default, skip_serializing_if = "Option::is_none")]
    pub oxygen_saturation: Option<f64>,
    #[serde(rename = "pasosDiarios", default, skip_serializing_if = "Option::is_none")]
    pub daily_steps: Option<f64>,
    #[serde(rename = "altura", default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(rename = "peso", default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(rename = "relojColocado", default, skip_serializing_if = "Option::is_none")]
    pub watch_worn: Option<bool>,
    #[serde(rename = "tiempoPantalla", default, skip_serializing_if = "Option::is_none")]
    pub screen_time: Option<f64>,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "lastUpdated", default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(rename = "event_timestamp", default, skip_serializing_if = "Option::is_none")]
    pub event_timestamp: Option<DateTime<Utc>>,
}

impl HealthEvent {
    /// Write timestamp used to find the freshest event: `lastUpdated`, then
    /// `createdAt`, then `event_timestamp`.
    pub fn write_timestamp(&self) -> Option<DateTime<Utc>> {
        self.last_updated
            .or(self.created_at)
            .or(self.event_timestamp)
    }

    /// Date key with surrounding whitespace removed; empty keys count as missing.
    pub fn date_key(&self) -> Option<&str> {
        self.date
            .as_deref()
            .map(str::trim)
            .filter(|date| !date.is_empty())
    }
}

/// The single reconciled record for one calendar date.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DailyRecord {
    #[serde(rename = "fecha")]
    pub date: String,
    #[serde(rename = "horasDeSueno")]
    pub sleep_hours: f64,
    #[serde(rename = "frecuenciaCardiaca")]
    pub heart_rate: f64,
    #[serde(rename = "frecuenciaCardiacaMin")]
    pub heart_rate_min: f64,
    #[serde(rename = "frecuenciaCardiacaMax")]
    pub heart_rate_max: f64,
    #[serde(rename = "pasosDiarios")]
    pub daily_steps: f64,
    #[serde(rename = "nivelDeEstres", default)]
    pub stress_level: Option<f64>,
    #[serde(rename = "saturacionOxigeno", default)]
    pub oxygen_saturation: Option<f64>,
    #[serde(rename = "horaRegistro", default)]
    pub recorded_time: Option<String>,
    #[serde(rename = "altura", default)]
    pub height: Option<f64>,
    #[serde(rename = "peso", default)]
    pub weight: Option<f64>,
    #[serde(rename = "relojColocado", default)]
    pub watch_worn: Option<bool>,
    #[serde(rename = "tiempoPantalla", default)]
    pub screen_time: Option<f64>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "lastUpdated", default)]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(rename = "event_timestamp", default)]
    pub event_timestamp: Option<DateTime<Utc>>,
}

impl DailyRecord {
    /// Record with no samples for `date`; the starting point of the daily fold.
    pub fn empty(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            ..Self::default()
        }
    }
}

/// Output of one reconciliation pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailySummary {
    pub generated_at: DateTime<Utc>,
    /// Trailing window of canonical records in ascending date order.
    pub days: Vec<DailyRecord>,
    /// Event with the latest write timestamp, regardless of its date.
    pub latest_written: Option<HealthEvent>,
    /// Documents dropped because they carried no date key.
    #[serde(default)]
    pub skipped: usize,
}

impl DailySummary {
    pub fn new(
        days: Vec<DailyRecord>,
        latest_written: Option<HealthEvent>,
        skipped: usize,
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            days,
            latest_written,
            skipped,
        }
    }

    /// Mean sleep over days that recorded any sleep.
    pub fn average_sleep(&self) -> Option<f64> {
        let slept: Vec<f64> = self
            .days
            .iter()
            .map(|day| day.sleep_hours)
            .filter(|hours| *hours > 0.0)
            .collect();
        if slept.is_empty() {
            None
        } else {
            Some(slept.iter().sum::<f64>() / slept.len() as f64)
        }
    }

    /// Values shown as "current": the freshest write if known, otherwise the
    /// last day of the window.
    pub fn current(&self) -> Option<CurrentReading> {
        if let Some(event) = &self.latest_written {
            return Some(CurrentReading::Written(event.clone()));
        }
        self.days.last().cloned().map(CurrentReading::Daily)
    }
}

/// Source of the "current" values on the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case", tag = "source", content = "record")]
pub enum CurrentReading {
    Written(HealthEvent),
    Daily(DailyRecord),
}

/// Stress classification shown next to the stress chart.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum StressBand {
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl StressBand {
    pub fn from_level(level: f64) -> Self {
        match level {
            l if l <= 25.0 => StressBand::Low,
            l if l <= 50.0 => StressBand::Moderate,
            l if l <= 75.0 => StressBand::High,
            _ => StressBand::VeryHigh,
        }
    }
}

/// Authenticated caller as reported by the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub email: Option<String>,
}

impl Identity {
    pub fn new(user_id: impl Into<String>, email: Option<String>) -> Self {
        Self {
            user_id: user_id.into(),
            email,
        }
    }
}

/// Decides whether an identity may open the admin overview.
pub trait AuthorizationPolicy: Send + Sync {
    fn is_authorized(&self, identity: &Identity) -> bool;
}

/// Grants access to exactly one email address. No domain or case folding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminEmailPolicy {
    email: String,
}

impl AdminEmailPolicy {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }

    pub fn from_config(config: &VitalsConfig) -> Self {
        Self::new(config.admin_email.clone())
    }

    /// Check a raw email as delivered by the identity provider.
    pub fn is_admin(&self, email: Option<&str>) -> bool {
        matches!(email, Some(candidate) if !candidate.is_empty() && candidate == self.email)
    }
}

impl AuthorizationPolicy for AdminEmailPolicy {
    fn is_authorized(&self, identity: &Identity) -> bool {
        self.is_admin(identity.email.as_deref())
    }
}

/// Profile fields as stored in the `users` collection, with display defaults
/// already applied.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub name: String,
    pub emergency_contact: String,
    pub dob: String,
    pub height: f64,
    pub weight: f64,
    pub sex: i64,
    pub goal: String,
    pub creation_date: Option<DateTime<Utc>>,
}

/// Reduced health record used by the admin roll-ups. Absent metrics are 0.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AdminHealthRecord {
    #[serde(rename = "fecha")]
    pub date: String,
    #[serde(rename = "horasDeSueno")]
    pub sleep_hours: f64,
    #[serde(rename = "frecuenciaCardiaca")]
    pub heart_rate: f64,
    #[serde(rename = "nivelDeEstres")]
    pub stress_level: f64,
    #[serde(rename = "pasosDiarios")]
    pub daily_steps: f64,
    #[serde(rename = "saturacionOxigeno")]
    pub oxygen_saturation: f64,
}

/// One user row of the admin overview: profile plus full health history,
/// newest first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserOverview {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub last_health_record: Option<AdminHealthRecord>,
    pub all_health_records: Vec<AdminHealthRecord>,
}

/// Errors surfaced by the vitals crates.
#[derive(Debug, thiserror::Error)]
pub enum VitalsError {
    #[error("Record is missing its date key")]
    MissingDate,
    #[error("Identity {0} is not allowed to open the admin overview")]
    Unauthorized(String),
    #[error("Unknown health profile: {0}")]
    UnknownProfile(String),
    #[error("Could not read input: {0}")]
    Parse(String),
    #[error("Document store failure: {0}")]
    Store(String),
}

/// Empty summary used before the first fetch completes and after a failed one.
pub fn empty_summary() -> DailySummary {
    DailySummary::new(Vec::new(), None, 0)
}
