//! Folding per-event health documents into one record per calendar date.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::debug;
use vitals_core::{DailyRecord, DailySummary, HealthEvent};

use crate::document::Document;

/// Merge one event into the record for its date.
///
/// Seeding is the same step applied to [`DailyRecord::empty`], so a record
/// built from a single event follows the same per-field rules as a merge.
pub fn absorb(mut record: DailyRecord, event: &HealthEvent) -> DailyRecord {
    // A zero or missing sleep sample never replaces one that was reported.
    if let Some(sleep) = finite(event.sleep_hours).filter(|hours| *hours > 0.0) {
        record.sleep_hours = record.sleep_hours.max(sleep);
    }

    record.heart_rate = max_sample(record.heart_rate, event.heart_rate);
    record.heart_rate_max = max_sample(record.heart_rate_max, event.heart_rate_max);
    record.daily_steps = max_sample(record.daily_steps, event.daily_steps);

    if let Some(min) = finite(event.heart_rate_min).filter(|bpm| *bpm > 0.0) {
        record.heart_rate_min = if record.heart_rate_min > 0.0 {
            record.heart_rate_min.min(min)
        } else {
            min
        };
    }

    if let Some(stress) = finite(event.stress_level).filter(|level| *level >= 0.0) {
        record.stress_level = Some(stress);
    }
    if let Some(spo2) = finite(event.oxygen_saturation).filter(|level| *level >= 0.0) {
        record.oxygen_saturation = Some(spo2);
    }

    record.recorded_time = event.recorded_time.clone();
    record.height = event.height;
    record.weight = event.weight;
    record.watch_worn = event.watch_worn;
    record.screen_time = event.screen_time;
    record.created_at = event.created_at;
    record.last_updated = event.last_updated;
    record.event_timestamp = event.event_timestamp;

    record
}

/// Reconcile events into the trailing `window_days` dates, ascending.
///
/// Events without a date key are skipped and counted. The freshest write is
/// tracked over every dated event, independent of the window.
pub fn reconcile<I>(events: I, window_days: usize) -> DailySummary
where
    I: IntoIterator<Item = HealthEvent>,
{
    let mut by_date: BTreeMap<String, DailyRecord> = BTreeMap::new();
    let mut latest = LatestWrite::default();
    let mut skipped = 0usize;

    for event in events {
        let Some(date) = event.date_key().map(str::to_string) else {
            debug!(id = ?event.id, "skipping health record without date");
            skipped += 1;
            continue;
        };

        let slot = by_date
            .entry(date)
            .or_insert_with_key(|date| DailyRecord::empty(date.as_str()));
        *slot = absorb(std::mem::take(slot), &event);

        latest.observe(event);
    }

    debug!(
        dates = by_date.len(),
        skipped,
        "reconciled health records by date"
    );

    let mut days: Vec<DailyRecord> = by_date.into_values().collect();
    let start = days.len().saturating_sub(window_days);
    let days = days.split_off(start);

    DailySummary::new(days, latest.event, skipped)
}

/// Parse and reconcile raw store documents.
pub fn reconcile_documents(documents: &[Document], window_days: usize) -> DailySummary {
    reconcile(documents.iter().map(Document::to_event), window_days)
}

#[derive(Default)]
struct LatestWrite {
    timestamp: Option<DateTime<Utc>>,
    event: Option<HealthEvent>,
}

impl LatestWrite {
    /// Keeps the first event seen among equal timestamps.
    fn observe(&mut self, event: HealthEvent) {
        let Some(candidate) = event.write_timestamp() else {
            return;
        };
        let newer = match self.timestamp {
            Some(current) => candidate > current,
            None => true,
        };
        if newer {
            self.timestamp = Some(candidate);
            self.event = Some(event);
        }
    }
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

fn max_sample(current: f64, incoming: Option<f64>) -> f64 {
    finite(incoming).map_or(current, |value| current.max(value))
}
