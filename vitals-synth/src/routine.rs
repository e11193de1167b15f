//! A weekly routine: exercise on fixed weekdays, quieter weekends, seven
//! readings a day.

use chrono::{Datelike, NaiveDate, Weekday};
use rand::Rng;
use tracing::debug;
use vitals_core::HealthEvent;

use crate::generator::{round_tenth, sample, written_at};

/// Hours of the day that get a reading.
pub const ROUTINE_HOURS: [u32; 7] = [7, 9, 12, 15, 18, 21, 23];
/// Weekdays with an afternoon workout.
pub const EXERCISE_DAYS: [Weekday; 4] = [Weekday::Mon, Weekday::Wed, Weekday::Fri, Weekday::Sat];

const EXERCISE_HOURS: (u32, u32) = (16, 18);
const WORK_HOURS: (u32, u32) = (9, 18);
const MORNING_LAST_HOUR: u32 = 9;
const NIGHT_FIRST_HOUR: u32 = 21;

/// Heart-rate ranges for one kind of hour: base, minimum, maximum.
struct HeartRateBand {
    base: (u32, u32),
    min: (u32, u32),
    max: (u32, u32),
}

const EXERCISE_BAND: HeartRateBand = HeartRateBand {
    base: (120, 150),
    min: (100, 120),
    max: (150, 175),
};
const MORNING_BAND: HeartRateBand = HeartRateBand {
    base: (58, 68),
    min: (52, 58),
    max: (68, 78),
};
const NIGHT_BAND: HeartRateBand = HeartRateBand {
    base: (55, 65),
    min: (50, 55),
    max: (65, 72),
};
const DAY_BAND: HeartRateBand = HeartRateBand {
    base: (65, 85),
    min: (58, 65),
    max: (85, 100),
};

/// Routine readings for every day in `start..=end`.
pub fn generate_routine<R: Rng + ?Sized>(
    start: NaiveDate,
    end: NaiveDate,
    rng: &mut R,
) -> Vec<HealthEvent> {
    let mut events = Vec::new();
    for date in start.iter_days().take_while(|date| *date <= end) {
        events.extend(routine_day(date, rng));
    }
    debug!(records = events.len(), "generated weekly routine records");
    events
}

/// Routine readings for one day.
///
/// Steps are a running daily total that grows by time of day. Sleep is
/// reported on the morning readings only; later readings carry zero.
pub fn routine_day<R: Rng + ?Sized>(date: NaiveDate, rng: &mut R) -> Vec<HealthEvent> {
    let weekday = date.weekday();
    let exercise_day = EXERCISE_DAYS.contains(&weekday);
    let weekend = matches!(weekday, Weekday::Sat | Weekday::Sun);
    let date_key = date.format("%Y-%m-%d").to_string();

    let mut events = Vec::with_capacity(ROUTINE_HOURS.len());
    for hour in ROUTINE_HOURS {
        let exercising = exercise_day && in_range(hour, EXERCISE_HOURS);
        let morning = hour <= MORNING_LAST_HOUR;

        let band = if exercising {
            &EXERCISE_BAND
        } else if morning {
            &MORNING_BAND
        } else if hour >= NIGHT_FIRST_HOUR {
            &NIGHT_BAND
        } else {
            &DAY_BAND
        };

        let stress = if exercising {
            sample(rng, (5, 20))
        } else if weekend {
            sample(rng, (5, 30))
        } else if in_range(hour, WORK_HOURS) {
            sample(rng, (20, 50))
        } else {
            sample(rng, (10, 40))
        };

        let oxygen = if exercising {
            sample(rng, (95, 97))
        } else {
            sample(rng, (96, 99))
        };

        let sleep = match (morning, weekend) {
            (false, _) => 0.0,
            (true, true) => round_tenth(rng.gen_range(7.5..=9.0)),
            (true, false) => round_tenth(rng.gen_range(6.0..=8.0)),
        };

        let steps = sample(rng, steps_range(hour, exercise_day));
        let heart_rate = sample(rng, band.base);
        let heart_rate_min = sample(rng, band.min);
        let heart_rate_max = sample(rng, band.max);
        let minute = sample(rng, (0, 59));
        let written_at = written_at(date, hour, rng);

        events.push(HealthEvent {
            date: Some(date_key.clone()),
            recorded_time: Some(format!("{hour:02}:{minute:02}")),
            sleep_hours: Some(sleep),
            heart_rate: Some(f64::from(heart_rate)),
            heart_rate_min: Some(f64::from(heart_rate_min)),
            heart_rate_max: Some(f64::from(heart_rate_max)),
            stress_level: Some(f64::from(stress)),
            oxygen_saturation: Some(f64::from(oxygen)),
            daily_steps: Some(f64::from(steps)),
            watch_worn: Some(true),
            created_at: written_at,
            last_updated: written_at,
            ..HealthEvent::default()
        });
    }
    events
}

fn steps_range(hour: u32, exercise_day: bool) -> (u32, u32) {
    match hour {
        0..=9 => (500, 2000),
        10..=12 => (3000, 5000),
        13..=15 => (5000, 7000),
        16..=18 if exercise_day => (10000, 14000),
        16..=18 => (6000, 8000),
        19..=21 if exercise_day => (12000, 16000),
        19..=21 => (7000, 10000),
        _ if exercise_day => (13000, 18000),
        _ => (8000, 12000),
    }
}

fn in_range(hour: u32, (first, last): (u32, u32)) -> bool {
    (first..=last).contains(&hour)
}
