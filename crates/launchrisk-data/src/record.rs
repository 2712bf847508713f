use chrono::{DateTime, Datelike as _, Utc};
use serde::{Deserialize, Serialize};

/// A single launch in the canonical schema.
///
/// Records only exist for rows that passed normalization, so `launch_date`
/// is always present. `launch_year` and `launch_decade` are derived from it
/// and kept alongside for the processed artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchRecord {
    pub company: String,
    pub location: String,
    pub rocket: String,
    pub mission_status: String,
    pub launch_date: DateTime<Utc>,
    pub launch_year: i32,
    pub launch_decade: i32,
    pub failure: bool,
}

impl LaunchRecord {
    /// Builds a record, deriving year and decade from `launch_date`.
    #[must_use]
    pub fn new(
        company: impl Into<String>,
        location: impl Into<String>,
        rocket: impl Into<String>,
        mission_status: impl Into<String>,
        launch_date: DateTime<Utc>,
        failure: bool,
    ) -> Self {
        let launch_year = launch_date.year();
        Self {
            company: company.into(),
            location: location.into(),
            rocket: rocket.into(),
            mission_status: mission_status.into(),
            launch_date,
            launch_year,
            launch_decade: decade_of(launch_year),
            failure,
        }
    }

    /// Failure flag as a numeric outcome (`1.0` for failure).
    #[must_use]
    pub fn failure_value(&self) -> f64 {
        f64::from(u8::from(self.failure))
    }
}

/// Start year of the decade containing `year` (`10 * floor(year / 10)`).
///
/// ```
/// assert_eq!(launchrisk_data::record::decade_of(1969), 1960);
/// assert_eq!(launchrisk_data::record::decade_of(2020), 2020);
/// ```
#[must_use]
pub fn decade_of(year: i32) -> i32 {
    year.div_euclid(10) * 10
}
