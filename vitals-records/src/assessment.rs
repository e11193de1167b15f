//! Range checks and anomaly flags for a single set of readings.

use std::fmt;

use serde::{Deserialize, Serialize};
use vitals_core::AdminHealthRecord;

/// Readings to range-check; absent values are not checked.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MetricReadings {
    pub sleep_hours: Option<f64>,
    pub heart_rate: Option<f64>,
    pub stress_level: Option<f64>,
    pub oxygen_saturation: Option<f64>,
    pub daily_steps: Option<f64>,
}

/// A reading outside its physiological range.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "metric", content = "value", rename_all = "snake_case")]
pub enum MetricIssue {
    SleepHours(f64),
    HeartRate(f64),
    StressLevel(f64),
    OxygenSaturation(f64),
    DailySteps(f64),
}

impl fmt::Display for MetricIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricIssue::SleepHours(v) => write!(f, "sleep hours must be between 0 and 24 (got {v})"),
            MetricIssue::HeartRate(v) => {
                write!(f, "heart rate must be between 30 and 220 bpm (got {v})")
            }
            MetricIssue::StressLevel(v) => {
                write!(f, "stress level must be between 0 and 100% (got {v})")
            }
            MetricIssue::OxygenSaturation(v) => {
                write!(f, "oxygen saturation must be between 70 and 100% (got {v})")
            }
            MetricIssue::DailySteps(v) => write!(f, "daily steps cannot be negative (got {v})"),
        }
    }
}

pub fn validate_metrics(readings: &MetricReadings) -> Vec<MetricIssue> {
    let mut issues = Vec::new();

    if let Some(v) = readings.sleep_hours.filter(|v| !(0.0..=24.0).contains(v)) {
        issues.push(MetricIssue::SleepHours(v));
    }
    if let Some(v) = readings.heart_rate.filter(|v| !(30.0..=220.0).contains(v)) {
        issues.push(MetricIssue::HeartRate(v));
    }
    if let Some(v) = readings.stress_level.filter(|v| !(0.0..=100.0).contains(v)) {
        issues.push(MetricIssue::StressLevel(v));
    }
    if let Some(v) = readings
        .oxygen_saturation
        .filter(|v| !(70.0..=100.0).contains(v))
    {
        issues.push(MetricIssue::OxygenSaturation(v));
    }
    if let Some(v) = readings.daily_steps.filter(|v| *v < 0.0) {
        issues.push(MetricIssue::DailySteps(v));
    }

    issues
}

/// Readings used for anomaly detection.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VitalSigns {
    pub sleep_hours: f64,
    pub heart_rate: f64,
    pub stress_level: f64,
    pub oxygen_saturation: f64,
}

impl From<&AdminHealthRecord> for VitalSigns {
    fn from(record: &AdminHealthRecord) -> Self {
        Self {
            sleep_hours: record.sleep_hours,
            heart_rate: record.heart_rate,
            stress_level: record.stress_level,
            oxygen_saturation: record.oxygen_saturation,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Anomaly {
    InsufficientSleep,
    ElevatedHeartRate,
    LowHeartRate,
    HighStress,
    LowOxygen,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnomalyReport {
    pub anomalies: Vec<Anomaly>,
    pub risk: RiskLevel,
}

impl AnomalyReport {
    pub fn has_anomalies(&self) -> bool {
        !self.anomalies.is_empty()
    }
}

pub fn detect_anomalies(signs: &VitalSigns) -> AnomalyReport {
    let mut anomalies = Vec::new();

    if signs.sleep_hours < 5.0 {
        anomalies.push(Anomaly::InsufficientSleep);
    }
    if signs.heart_rate > 100.0 {
        anomalies.push(Anomaly::ElevatedHeartRate);
    }
    if signs.heart_rate < 50.0 {
        anomalies.push(Anomaly::LowHeartRate);
    }
    if signs.stress_level > 60.0 {
        anomalies.push(Anomaly::HighStress);
    }
    if signs.oxygen_saturation < 95.0 {
        anomalies.push(Anomaly::LowOxygen);
    }

    let risk = match anomalies.len() {
        0 => RiskLevel::Low,
        1 | 2 => RiskLevel::Medium,
        _ => RiskLevel::High,
    };

    AnomalyReport { anomalies, risk }
}
