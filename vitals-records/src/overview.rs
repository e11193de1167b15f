//! Roll-ups for the admin overview across all users.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use vitals_core::{AdminHealthRecord, UserOverview};

use crate::assessment::{detect_anomalies, RiskLevel, VitalSigns};
use crate::document::NOT_REGISTERED;

/// Stress above this level counts as high in [`UserStats`].
pub const HIGH_STRESS_THRESHOLD: f64 = 40.0;
/// Number of users shown in the step comparison.
pub const STEPS_COMPARISON_LIMIT: usize = 10;

/// Users whose name or email contains `term` (case-insensitive) or whose
/// emergency contact contains it verbatim.
pub fn filter_users<'a>(users: &'a [UserOverview], term: &str) -> Vec<&'a UserOverview> {
    let needle = term.to_lowercase();
    users
        .iter()
        .filter(|user| {
            let profile = &user.profile;
            profile.name.to_lowercase().contains(&needle)
                || profile.email.to_lowercase().contains(&needle)
                || profile.emergency_contact.contains(term)
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserStats {
    pub total: usize,
    pub with_health_data: usize,
    pub with_emergency_contact: usize,
    pub high_stress: usize,
}

pub fn user_stats(users: &[UserOverview]) -> UserStats {
    UserStats {
        total: users.len(),
        with_health_data: users
            .iter()
            .filter(|user| user.last_health_record.is_some())
            .count(),
        with_emergency_contact: users
            .iter()
            .filter(|user| user.profile.emergency_contact != NOT_REGISTERED)
            .count(),
        high_stress: latest_records(users)
            .filter(|record| record.stress_level > HIGH_STRESS_THRESHOLD)
            .count(),
    }
}

/// Mean of each metric over every user's latest record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GlobalAverages {
    pub sleep_hours: f64,
    pub stress_level: f64,
    pub daily_steps: f64,
    pub heart_rate: f64,
    pub oxygen_saturation: f64,
}

pub fn global_averages(users: &[UserOverview]) -> Option<GlobalAverages> {
    let latest: Vec<&AdminHealthRecord> = latest_records(users).collect();
    if latest.is_empty() {
        return None;
    }

    let average = |metric: fn(&AdminHealthRecord) -> f64| {
        latest.iter().map(|record| metric(record)).sum::<f64>() / latest.len() as f64
    };

    Some(GlobalAverages {
        sleep_hours: average(|r| r.sleep_hours),
        stress_level: average(|r| r.stress_level),
        daily_steps: average(|r| r.daily_steps),
        heart_rate: average(|r| r.heart_rate),
        oxygen_saturation: average(|r| r.oxygen_saturation),
    })
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StressDistribution {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    pub very_high: usize,
}

pub fn stress_distribution(users: &[UserOverview]) -> StressDistribution {
    latest_records(users).fold(StressDistribution::default(), |mut acc, record| {
        match record.stress_level {
            level if level <= 20.0 => acc.low += 1,
            level if level <= 40.0 => acc.medium += 1,
            level if level <= 60.0 => acc.high += 1,
            _ => acc.very_high += 1,
        }
        acc
    })
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SleepDistribution {
    pub poor: usize,
    pub fair: usize,
    pub good: usize,
    pub excellent: usize,
}

pub fn sleep_distribution(users: &[UserOverview]) -> SleepDistribution {
    latest_records(users).fold(SleepDistribution::default(), |mut acc, record| {
        match record.sleep_hours {
            hours if hours < 5.0 => acc.poor += 1,
            hours if hours < 7.0 => acc.fair += 1,
            hours if hours < 8.0 => acc.good += 1,
            _ => acc.excellent += 1,
        }
        acc
    })
}

/// Per-date means across all users' records for the most recent dates.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WeeklyTrends {
    pub dates: Vec<String>,
    pub avg_sleep: Vec<f64>,
    pub avg_stress: Vec<f64>,
    pub avg_steps: Vec<f64>,
}

pub fn weekly_trends(users: &[UserOverview], window_days: usize) -> WeeklyTrends {
    #[derive(Default)]
    struct Bucket {
        sleep: Vec<f64>,
        stress: Vec<f64>,
        steps: Vec<f64>,
    }

    let mut by_date: BTreeMap<&str, Bucket> = BTreeMap::new();
    for record in users.iter().flat_map(|user| &user.all_health_records) {
        let bucket = by_date.entry(record.date.as_str()).or_default();
        bucket.sleep.push(record.sleep_hours);
        bucket.stress.push(record.stress_level);
        bucket.steps.push(record.daily_steps);
    }

    let skip = by_date.len().saturating_sub(window_days);
    let mut trends = WeeklyTrends::default();
    for (date, bucket) in by_date.into_iter().skip(skip) {
        trends.dates.push(date.to_string());
        trends.avg_sleep.push(mean(&bucket.sleep));
        trends.avg_stress.push(mean(&bucket.stress));
        trends.avg_steps.push(mean(&bucket.steps));
    }
    trends
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StepsComparison {
    pub names: Vec<String>,
    pub steps: Vec<f64>,
}

/// Latest step count for the first users with health data, by first name.
pub fn steps_comparison(users: &[UserOverview]) -> StepsComparison {
    let mut comparison = StepsComparison::default();
    for user in users
        .iter()
        .filter(|user| user.last_health_record.is_some())
        .take(STEPS_COMPARISON_LIMIT)
    {
        let first_name = user
            .profile
            .name
            .split(' ')
            .next()
            .unwrap_or_default()
            .to_string();
        comparison.names.push(first_name);
        comparison.steps.push(
            user.last_health_record
                .as_ref()
                .map_or(0.0, |record| record.daily_steps),
        );
    }
    comparison
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SexDistribution {
    pub male: usize,
    pub female: usize,
    pub other: usize,
}

pub fn sex_distribution(users: &[UserOverview]) -> SexDistribution {
    users
        .iter()
        .fold(SexDistribution::default(), |mut acc, user| {
            match user.profile.sex {
                1 => acc.male += 1,
                2 => acc.female += 1,
                _ => acc.other += 1,
            }
            acc
        })
}

pub fn sex_label(sex: i64) -> &'static str {
    match sex {
        0 => "Unspecified",
        1 => "Male",
        2 => "Female",
        _ => "Other",
    }
}

/// Risk level of one user's latest record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserRisk {
    pub id: String,
    pub name: String,
    pub risk: RiskLevel,
}

/// Everything the admin page renders, computed in one pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdminOverview {
    pub stats: UserStats,
    pub averages: Option<GlobalAverages>,
    pub stress: StressDistribution,
    pub sleep: SleepDistribution,
    pub trends: WeeklyTrends,
    pub steps: StepsComparison,
    pub sex: SexDistribution,
    pub risks: Vec<UserRisk>,
}

impl AdminOverview {
    pub fn build(users: &[UserOverview], window_days: usize) -> Self {
        let risks = users
            .iter()
            .filter_map(|user| {
                let record = user.last_health_record.as_ref()?;
                Some(UserRisk {
                    id: user.profile.id.clone(),
                    name: user.profile.name.clone(),
                    risk: detect_anomalies(&VitalSigns::from(record)).risk,
                })
            })
            .collect();

        Self {
            stats: user_stats(users),
            averages: global_averages(users),
            stress: stress_distribution(users),
            sleep: sleep_distribution(users),
            trends: weekly_trends(users, window_days),
            steps: steps_comparison(users),
            sex: sex_distribution(users),
            risks,
        }
    }
}

fn latest_records(users: &[UserOverview]) -> impl Iterator<Item = &AdminHealthRecord> {
    users
        .iter()
        .filter_map(|user| user.last_health_record.as_ref())
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
