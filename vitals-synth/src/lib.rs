//! Synthetic health records for demos and tests.
//!
//! Every generator takes the random source as a parameter so a seeded
//! `StdRng` reproduces the same records.

pub mod generator;
pub mod profile;
pub mod routine;

pub use generator::{generate, generate_day, FIRST_HOUR, LAST_HOUR, MORNING_LAST_HOUR};
pub use profile::{Profile, ProfileParams};
pub use routine::{generate_routine, routine_day, EXERCISE_DAYS, ROUTINE_HOURS};

/// Readings produced per day by [`generate_day`].
pub const READINGS_PER_DAY: usize = (LAST_HOUR - FIRST_HOUR + 1) as usize;
