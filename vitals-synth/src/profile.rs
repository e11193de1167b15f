//! Named parameter sets for synthetic data.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use vitals_core::VitalsError;

/// Physiological profile driving the generated ranges.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Profile {
    Healthy,
    Sick,
}

/// Closed ranges sampled by the hourly generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileParams {
    /// Hours slept, drawn once per day and rounded to one decimal.
    pub sleep_hours: (f64, f64),
    /// Base heart rate in bpm.
    pub heart_rate: (u32, u32),
    /// SpO2 in percent.
    pub oxygen_saturation: (u32, u32),
    /// Stress level for morning hours.
    pub stress_morning: (u32, u32),
    /// Stress level for the rest of the day.
    pub stress_rest: (u32, u32),
    /// Steps added to the running daily total each hour.
    pub steps_per_hour: (u32, u32),
}

impl Profile {
    pub fn params(self) -> ProfileParams {
        match self {
            Profile::Healthy => ProfileParams {
                sleep_hours: (6.0, 9.0),
                heart_rate: (60, 100),
                oxygen_saturation: (96, 99),
                stress_morning: (5, 20),
                stress_rest: (10, 35),
                steps_per_hour: (300, 800),
            },
            Profile::Sick => ProfileParams {
                sleep_hours: (2.0, 4.5),
                heart_rate: (90, 130),
                oxygen_saturation: (88, 94),
                stress_morning: (40, 65),
                stress_rest: (50, 85),
                steps_per_hour: (20, 150),
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Profile::Healthy => "healthy",
            Profile::Sick => "sick",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Profile {
    type Err = VitalsError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "healthy" => Ok(Profile::Healthy),
            "sick" => Ok(Profile::Sick),
            other => Err(VitalsError::UnknownProfile(other.to_string())),
        }
    }
}
