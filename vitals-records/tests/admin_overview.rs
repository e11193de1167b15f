use vitals_core::{AdminHealthRecord, UserOverview, UserProfile};
use vitals_records::assessment::{
    detect_anomalies, validate_metrics, Anomaly, MetricIssue, MetricReadings, RiskLevel,
    VitalSigns,
};
use vitals_records::overview::{
    filter_users, global_averages, sex_distribution, sleep_distribution, steps_comparison,
    stress_distribution, user_stats, weekly_trends, AdminOverview,
};

fn user(id: &str, name: &str, email: &str, contact: &str) -> UserOverview {
    UserOverview {
        profile: UserProfile {
            id: id.to_string(),
            email: email.to_string(),
            name: name.to_string(),
            emergency_contact: contact.to_string(),
            dob: "No registrado".to_string(),
            height: 0.0,
            weight: 0.0,
            sex: 0,
            goal: "No especificado".to_string(),
            creation_date: None,
        },
        last_health_record: None,
        all_health_records: Vec::new(),
    }
}

fn record(date: &str, sleep: f64, stress: f64, steps: f64) -> AdminHealthRecord {
    AdminHealthRecord {
        date: date.to_string(),
        sleep_hours: sleep,
        heart_rate: 72.0,
        stress_level: stress,
        daily_steps: steps,
        oxygen_saturation: 97.0,
    }
}

fn with_history(mut user: UserOverview, history: Vec<AdminHealthRecord>) -> UserOverview {
    user.last_health_record = history.first().cloned();
    user.all_health_records = history;
    user
}

fn directory() -> Vec<UserOverview> {
    vec![
        user("u1", "Juan Pérez", "juan@test.com", "+56912345678"),
        user("u2", "María García", "maria@test.com", "+56987654321"),
        user("u3", "Carlos López", "carlos@empresa.cl", "No registrado"),
    ]
}

#[test]
fn filter_matches_name_case_insensitively() {
    let users = directory();
    let result = filter_users(&users, "juan");
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].profile.name, "Juan Pérez");

    assert_eq!(filter_users(&users, "MARÍA").len(), 1);
}

#[test]
fn filter_matches_email_and_contact() {
    let users = directory();

    let by_email = filter_users(&users, "empresa.cl");
    assert_eq!(by_email.len(), 1);
    assert_eq!(by_email[0].profile.name, "Carlos López");

    let by_phone = filter_users(&users, "+56912345678");
    assert_eq!(by_phone.len(), 1);
    assert_eq!(by_phone[0].profile.id, "u1");

    assert!(filter_users(&users, "xyz123").is_empty());
    assert_eq!(filter_users(&users, "").len(), 3);
}

#[test]
fn stats_count_health_contacts_and_high_stress() {
    let users = vec![
        with_history(
            user("a", "Ana", "a@x.cl", "+561"),
            vec![record("2025-11-20", 7.0, 25.0, 5000.0)],
        ),
        with_history(
            user("b", "Bea", "b@x.cl", "+562"),
            vec![record("2025-11-20", 4.0, 55.0, 2000.0)],
        ),
        user("c", "Cris", "c@x.cl", "No registrado"),
        with_history(
            user("d", "Dani", "d@x.cl", "No registrado"),
            vec![record("2025-11-20", 3.0, 80.0, 800.0)],
        ),
    ];

    let stats = user_stats(&users);
    assert_eq!(stats.total, 4);
    assert_eq!(stats.with_health_data, 3);
    assert_eq!(stats.with_emergency_contact, 2);
    assert_eq!(stats.high_stress, 2);

    let stress = stress_distribution(&users);
    assert_eq!((stress.low, stress.medium, stress.high, stress.very_high), (0, 1, 1, 1));

    let sleep = sleep_distribution(&users);
    assert_eq!((sleep.poor, sleep.fair, sleep.good, sleep.excellent), (2, 0, 1, 0));

    let averages = global_averages(&users).expect("users with data");
    assert!((averages.sleep_hours - 14.0 / 3.0).abs() < 1e-9);
    assert_eq!(averages.heart_rate, 72.0);

    assert!(global_averages(&directory()).is_none());
}

#[test]
fn weekly_trends_average_per_date_over_last_dates() {
    let users = vec![
        with_history(
            user("a", "Ana Ruiz", "a@x.cl", "+561"),
            vec![
                record("2025-11-03", 8.0, 20.0, 6000.0),
                record("2025-11-02", 6.0, 30.0, 4000.0),
                record("2025-11-01", 5.0, 10.0, 1000.0),
            ],
        ),
        with_history(
            user("b", "Bea Soto", "b@x.cl", "+562"),
            vec![record("2025-11-03", 6.0, 40.0, 2000.0)],
        ),
    ];

    let trends = weekly_trends(&users, 2);
    assert_eq!(trends.dates, ["2025-11-02", "2025-11-03"]);
    assert_eq!(trends.avg_sleep, [6.0, 7.0]);
    assert_eq!(trends.avg_stress, [30.0, 30.0]);
    assert_eq!(trends.avg_steps, [4000.0, 4000.0]);

    let steps = steps_comparison(&users);
    assert_eq!(steps.names, ["Ana", "Bea"]);
    assert_eq!(steps.steps, [6000.0, 2000.0]);
}

#[test]
fn sex_distribution_buckets_unknown_codes_as_other() {
    let mut users = directory();
    users[0].profile.sex = 1;
    users[1].profile.sex = 2;
    users[2].profile.sex = 7;

    let sex = sex_distribution(&users);
    assert_eq!((sex.male, sex.female, sex.other), (1, 1, 1));
}

#[test]
fn validation_reports_each_out_of_range_metric() {
    let normal = MetricReadings {
        sleep_hours: Some(7.5),
        heart_rate: Some(75.0),
        stress_level: Some(25.0),
        oxygen_saturation: Some(98.0),
        daily_steps: Some(8000.0),
    };
    assert!(validate_metrics(&normal).is_empty());

    let invalid = MetricReadings {
        sleep_hours: Some(25.0),
        heart_rate: Some(250.0),
        stress_level: Some(150.0),
        oxygen_saturation: None,
        daily_steps: Some(-100.0),
    };
    assert_eq!(
        validate_metrics(&invalid),
        [
            MetricIssue::SleepHours(25.0),
            MetricIssue::HeartRate(250.0),
            MetricIssue::StressLevel(150.0),
            MetricIssue::DailySteps(-100.0),
        ]
    );
}

#[test]
fn anomalies_grade_risk() {
    let healthy = detect_anomalies(&VitalSigns {
        sleep_hours: 7.5,
        heart_rate: 72.0,
        stress_level: 20.0,
        oxygen_saturation: 98.0,
    });
    assert!(!healthy.has_anomalies());
    assert_eq!(healthy.risk, RiskLevel::Low);

    let hypoxemic = detect_anomalies(&VitalSigns {
        sleep_hours: 7.0,
        heart_rate: 75.0,
        stress_level: 20.0,
        oxygen_saturation: 90.0,
    });
    assert_eq!(hypoxemic.anomalies, [Anomaly::LowOxygen]);
    assert_eq!(hypoxemic.risk, RiskLevel::Medium);

    let sick = detect_anomalies(&VitalSigns {
        sleep_hours: 3.0,
        heart_rate: 115.0,
        stress_level: 75.0,
        oxygen_saturation: 91.0,
    });
    assert_eq!(sick.anomalies.len(), 4);
    assert_eq!(sick.risk, RiskLevel::High);
}

#[test]
fn overview_collects_risk_for_users_with_data() {
    let users = vec![
        with_history(
            user("a", "Ana", "a@x.cl", "+561"),
            vec![record("2025-11-20", 3.0, 80.0, 500.0)],
        ),
        user("b", "Bea", "b@x.cl", "+562"),
    ];

    let overview = AdminOverview::build(&users, 7);
    assert_eq!(overview.stats.total, 2);
    assert_eq!(overview.risks.len(), 1);
    assert_eq!(overview.risks[0].id, "a");
    assert_eq!(overview.risks[0].risk, RiskLevel::Medium);
}
