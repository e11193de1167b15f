//! Hourly synthetic readings for a profile.

use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;
use tracing::debug;
use vitals_core::HealthEvent;

use crate::profile::{Profile, ProfileParams};

/// First hour of the day that gets a reading.
pub const FIRST_HOUR: u32 = 8;
/// Last hour of the day that gets a reading.
pub const LAST_HOUR: u32 = 23;
/// Hours up to and including this one use the morning stress range.
pub const MORNING_LAST_HOUR: u32 = 11;

/// How far below the base heart rate the hourly minimum falls.
const HEART_RATE_DROP: (u32, u32) = (5, 10);
/// How far above the base heart rate the hourly maximum climbs.
const HEART_RATE_RISE: (u32, u32) = (10, 20);

/// Readings for every day in `start..=end`, one per hour from
/// [`FIRST_HOUR`] to [`LAST_HOUR`].
///
/// A reversed range yields nothing.
pub fn generate<R: Rng + ?Sized>(
    profile: Profile,
    start: NaiveDate,
    end: NaiveDate,
    rng: &mut R,
) -> Vec<HealthEvent> {
    let mut events = Vec::new();
    let mut days = 0usize;

    for date in start.iter_days().take_while(|date| *date <= end) {
        events.extend(generate_day(profile, date, rng));
        days += 1;
    }

    debug!(%profile, days, records = events.len(), "generated synthetic health records");
    events
}

/// Readings for a single day.
///
/// Sleep is drawn once and repeated on every hour; steps accumulate from
/// zero across the day.
pub fn generate_day<R: Rng + ?Sized>(
    profile: Profile,
    date: NaiveDate,
    rng: &mut R,
) -> Vec<HealthEvent> {
    let params = profile.params();
    let date_key = date.format("%Y-%m-%d").to_string();
    let sleep_hours = round_tenth(rng.gen_range(params.sleep_hours.0..=params.sleep_hours.1));
    let mut steps = 0u32;
    let mut events = Vec::with_capacity(crate::READINGS_PER_DAY);

    for hour in FIRST_HOUR..=LAST_HOUR {
        steps += sample(rng, params.steps_per_hour);
        events.push(hourly_event(&params, &date_key, date, hour, sleep_hours, steps, rng));
    }
    events
}

fn hourly_event<R: Rng + ?Sized>(
    params: &ProfileParams,
    date_key: &str,
    date: NaiveDate,
    hour: u32,
    sleep_hours: f64,
    steps: u32,
    rng: &mut R,
) -> HealthEvent {
    let heart_rate = sample(rng, params.heart_rate);
    let heart_rate_min = heart_rate.saturating_sub(sample(rng, HEART_RATE_DROP));
    let heart_rate_max = heart_rate + sample(rng, HEART_RATE_RISE);
    let stress = if hour <= MORNING_LAST_HOUR {
        sample(rng, params.stress_morning)
    } else {
        sample(rng, params.stress_rest)
    };
    let written_at = written_at(date, hour, rng);

    HealthEvent {
        id: None,
        date: Some(date_key.to_string()),
        recorded_time: Some(format!("{hour:02}:00")),
        sleep_hours: Some(sleep_hours),
        heart_rate: Some(f64::from(heart_rate)),
        heart_rate_min: Some(f64::from(heart_rate_min)),
        heart_rate_max: Some(f64::from(heart_rate_max)),
        stress_level: Some(f64::from(stress)),
        oxygen_saturation: Some(f64::from(sample(rng, params.oxygen_saturation))),
        daily_steps: Some(f64::from(steps)),
        height: None,
        weight: None,
        watch_worn: Some(true),
        screen_time: None,
        created_at: written_at,
        last_updated: written_at,
        event_timestamp: None,
    }
}

/// UTC timestamp at `hour` with random minutes and seconds.
pub(crate) fn written_at<R: Rng + ?Sized>(
    date: NaiveDate,
    hour: u32,
    rng: &mut R,
) -> Option<DateTime<Utc>> {
    let minute = rng.gen_range(0..60);
    let second = rng.gen_range(0..60);
    date.and_hms_opt(hour, minute, second)
        .map(|naive| naive.and_utc())
}

/// Uniform integer in the closed range.
pub(crate) fn sample<R: Rng + ?Sized>(rng: &mut R, (low, high): (u32, u32)) -> u32 {
    rng.gen_range(low..=high)
}

pub(crate) fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
