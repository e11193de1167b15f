use vitals_core::{DailyRecord, HealthEvent};
use vitals_records::{absorb, event_to_document, parse_event, reconcile};

fn event(date: &str) -> HealthEvent {
    HealthEvent {
        date: Some(date.to_string()),
        ..HealthEvent::default()
    }
}

#[test]
fn zero_sleep_does_not_overwrite_reported_sleep() {
    let first = HealthEvent {
        sleep_hours: Some(6.0),
        ..event("2025-11-26")
    };
    let second = HealthEvent {
        sleep_hours: Some(0.0),
        heart_rate: Some(80.0),
        ..event("2025-11-26")
    };

    let summary = reconcile(vec![first, second], 7);

    assert_eq!(summary.days.len(), 1);
    let day = &summary.days[0];
    assert_eq!(day.date, "2025-11-26");
    assert_eq!(day.sleep_hours, 6.0);
    assert_eq!(day.heart_rate, 80.0);
}

#[test]
fn sleep_is_max_of_positive_samples() {
    let samples = [Some(0.0), Some(5.5), None, Some(7.25), Some(-3.0), Some(6.0)];
    let events = samples.iter().map(|sleep| HealthEvent {
        sleep_hours: *sleep,
        ..event("2025-11-20")
    });

    let summary = reconcile(events, 7);
    assert_eq!(summary.days[0].sleep_hours, 7.25);

    let none_positive = reconcile(
        vec![
            HealthEvent {
                sleep_hours: Some(0.0),
                ..event("2025-11-20")
            },
            event("2025-11-20"),
        ],
        7,
    );
    assert_eq!(none_positive.days[0].sleep_hours, 0.0);
}

#[test]
fn peaks_take_maximum_and_minimum_takes_positive_floor() {
    let readings = [
        (Some(70.0), Some(90.0), Some(0.0), Some(1200.0)),
        (Some(95.0), Some(130.0), Some(62.0), Some(5400.0)),
        (None, Some(110.0), Some(55.0), Some(3000.0)),
        (Some(82.0), None, None, None),
    ];
    let events = readings.iter().map(|(hr, max, min, steps)| HealthEvent {
        heart_rate: *hr,
        heart_rate_max: *max,
        heart_rate_min: *min,
        daily_steps: *steps,
        ..event("2025-11-21")
    });

    let day = &reconcile(events, 7).days[0];
    assert_eq!(day.heart_rate, 95.0);
    assert_eq!(day.heart_rate_max, 130.0);
    assert_eq!(day.heart_rate_min, 55.0);
    assert_eq!(day.daily_steps, 5400.0);
}

#[test]
fn minimum_without_positive_samples_is_zero() {
    let events = vec![
        HealthEvent {
            heart_rate_min: Some(0.0),
            ..event("2025-11-21")
        },
        HealthEvent {
            heart_rate_min: Some(-4.0),
            ..event("2025-11-21")
        },
    ];
    assert_eq!(reconcile(events, 7).days[0].heart_rate_min, 0.0);
}

#[test]
fn stress_and_oxygen_take_last_valid_write() {
    let seed = absorb(
        DailyRecord::empty("2025-11-22"),
        &HealthEvent {
            stress_level: Some(30.0),
            oxygen_saturation: Some(97.0),
            ..event("2025-11-22")
        },
    );

    let merged = absorb(
        seed,
        &HealthEvent {
            stress_level: Some(0.0),
            oxygen_saturation: Some(f64::NAN),
            ..event("2025-11-22")
        },
    );
    assert_eq!(merged.stress_level, Some(0.0));
    assert_eq!(merged.oxygen_saturation, Some(97.0));

    let kept = absorb(merged, &event("2025-11-22"));
    assert_eq!(kept.stress_level, Some(0.0));
    assert_eq!(kept.oxygen_saturation, Some(97.0));
}

#[test]
fn other_fields_follow_last_write() {
    let first = HealthEvent {
        recorded_time: Some("08:10".to_string()),
        weight: Some(71.5),
        watch_worn: Some(true),
        ..event("2025-11-23")
    };
    let second = HealthEvent {
        recorded_time: Some("21:45".to_string()),
        ..event("2025-11-23")
    };

    let day = &reconcile(vec![first, second], 7).days[0];
    assert_eq!(day.recorded_time.as_deref(), Some("21:45"));
    assert_eq!(day.weight, None);
    assert_eq!(day.watch_worn, None);
}

#[test]
fn window_keeps_largest_dates_ascending() {
    let dates = [
        "2025-11-09", "2025-11-15", "2025-11-01", "2025-11-12", "2025-11-10", "2025-11-14",
        "2025-11-13", "2025-11-11", "2025-11-15", "2025-11-08",
    ];
    let events = dates.iter().map(|date| event(date));

    let summary = reconcile(events, 7);
    let kept: Vec<&str> = summary.days.iter().map(|day| day.date.as_str()).collect();

    assert_eq!(
        kept,
        [
            "2025-11-09",
            "2025-11-10",
            "2025-11-11",
            "2025-11-12",
            "2025-11-13",
            "2025-11-14",
            "2025-11-15",
        ]
    );
}

#[test]
fn fewer_dates_than_window_are_all_returned() {
    let summary = reconcile(vec![event("2025-11-02"), event("2025-11-01")], 7);
    assert_eq!(summary.days.len(), 2);
    assert_eq!(summary.days[0].date, "2025-11-01");
}

#[test]
fn undated_events_are_skipped_and_never_latest() {
    let undated = HealthEvent {
        created_at: Some("2025-12-01T00:00:00Z".parse().unwrap()),
        sleep_hours: Some(9.0),
        ..HealthEvent::default()
    };
    let blank = HealthEvent {
        date: Some("  ".to_string()),
        ..HealthEvent::default()
    };
    let dated = HealthEvent {
        created_at: Some("2025-11-20T10:00:00Z".parse().unwrap()),
        ..event("2025-11-20")
    };

    let summary = reconcile(vec![undated, blank, dated], 7);

    assert_eq!(summary.skipped, 2);
    assert_eq!(summary.days.len(), 1);
    assert_eq!(
        summary
            .latest_written
            .and_then(|latest| latest.date),
        Some("2025-11-20".to_string())
    );
}

#[test]
fn latest_write_uses_timestamp_preference_and_first_on_ties() {
    let ts = |text: &str| Some(text.parse().unwrap());
    let events = vec![
        HealthEvent {
            id: Some("old-date-late-write".to_string()),
            event_timestamp: ts("2025-11-30T12:00:00Z"),
            ..event("2025-11-01")
        },
        HealthEvent {
            id: Some("updated-wins-over-created".to_string()),
            created_at: ts("2025-12-05T00:00:00Z"),
            last_updated: ts("2025-11-29T00:00:00Z"),
            ..event("2025-11-29")
        },
        HealthEvent {
            id: Some("tie".to_string()),
            event_timestamp: ts("2025-11-30T12:00:00Z"),
            ..event("2025-11-30")
        },
    ];

    let summary = reconcile(events, 1);

    assert_eq!(summary.days.len(), 1);
    assert_eq!(summary.days[0].date, "2025-11-30");
    assert_eq!(
        summary.latest_written.and_then(|latest| latest.id),
        Some("old-date-late-write".to_string())
    );
}

#[test]
fn generated_documents_round_trip_unchanged() {
    let original = HealthEvent {
        id: Some("ignored".to_string()),
        sleep_hours: Some(7.4),
        heart_rate: Some(72.0),
        heart_rate_min: Some(65.0),
        heart_rate_max: Some(88.0),
        stress_level: Some(18.0),
        oxygen_saturation: Some(98.0),
        daily_steps: Some(640.0),
        recorded_time: Some("08:31".to_string()),
        watch_worn: Some(true),
        created_at: Some("2025-11-11T08:31:12Z".parse().unwrap()),
        last_updated: Some("2025-11-11T08:31:12Z".parse().unwrap()),
        ..event("2025-11-11")
    };

    let document = event_to_document(&original).expect("serializes");
    assert!(!document.contains_key("id"));

    let parsed = parse_event(None, &document);
    assert_eq!(
        parsed,
        HealthEvent {
            id: None,
            ..original
        }
    );
}
