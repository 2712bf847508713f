//! Feature engineering for launch failure prediction.
//!
//! This crate turns normalized [`LaunchRecord`](launchrisk_data::LaunchRecord)s
//! into model-ready [`FeatureVector`]s, and re-applies the same fitted
//! transformations to single hypothetical launches at inference time.
//!
//! # Overview
//!
//! The engine has two modes that share one feature definition:
//!
//! ## Fit mode (batch)
//!
//! [`FeatureEngine::fit_transform`] consumes the *complete* historical record
//! set and produces one vector per record plus a [`FittedArtifacts`] bundle:
//!
//! 1. **Aggregate statistics** ([`aggregate::AggregateStats`]): failure rate and
//!    launch count per rocket and per company over the whole corpus
//! 2. **Expanding history** ([`expanding::ExpandingHistory`]): per-company running
//!    failure rate in launch-date order
//! 3. **Encodings** ([`encoding::EncodingTables`]): dense codes for company,
//!    location, and rocket, assigned by sorted unique value
//!
//! ## Transform mode (single row)
//!
//! [`FittedArtifacts::transform_one`] builds the vector for one
//! [`transform::Scenario`] using only the fitted tables. Unknown categories and
//! (company, rocket) pairs without history are reported as
//! [`TransformError`]s rather than mapped to made-up values.
//!
//! # Feature Schema
//!
//! | index | feature               | source                                  |
//! |-------|-----------------------|-----------------------------------------|
//! | 0     | `launch_year`         | launch date                             |
//! | 1     | `launch_decade`       | `10 * floor(year / 10)`                 |
//! | 2     | `rocket_failure_rate` | mean failure of the rocket, full corpus |
//! | 3     | `rocket_launch_count` | launches of the rocket, full corpus     |
//! | 4     | `org_failure_rate`    | mean failure of the company             |
//! | 5     | `past_failure_rate`   | company expanding history               |
//! | 6     | `company_code`        | company encoding                        |
//! | 7     | `location_code`       | location encoding                       |
//! | 8     | `rocket_code`         | rocket encoding                         |
//!
//! The order is defined once in [`schema::FeatureId::ALL`].
//!
//! # Reproducibility
//!
//! Fitted artifacts are immutable. They are saved next to the trained model and
//! loaded back for every inference request; loading rejects artifacts whose
//! feature list does not match the compiled schema.

pub use self::{
    artifacts::{ArtifactError, FittedArtifacts},
    engine::{EngineeredRecord, EngineeredSet, FeatureEngine, FeatureEngineConfig, FitError},
    expanding::ExpandingPolicy,
    schema::{FEATURE_COUNT, FeatureId, FeatureVector},
    transform::{Scenario, ScenarioFeatures, ScenarioWarning, TransformError},
};

pub mod aggregate;
pub mod artifacts;
pub mod encoding;
pub mod engine;
pub mod expanding;
pub mod processed;
pub mod schema;
pub mod transform;

#[cfg(test)]
pub(crate) mod test_util {
    use chrono::{TimeZone as _, Utc};
    use launchrisk_data::LaunchRecord;

    pub(crate) fn launch(
        company: &str,
        rocket: &str,
        location: &str,
        (year, month, day): (i32, u32, u32),
        failure: bool,
    ) -> LaunchRecord {
        let date = Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap();
        let status = if failure { "Failure" } else { "Success" };
        LaunchRecord::new(company, location, rocket, status, date, failure)
    }

    /// Small corpus with two companies, three rockets, and one shared site.
    pub(crate) fn sample_records() -> Vec<LaunchRecord> {
        vec![
            launch("SpaceX", "Falcon 1", "Omelek", (2006, 3, 24), true),
            launch("SpaceX", "Falcon 1", "Omelek", (2008, 9, 28), false),
            launch("SpaceX", "Falcon 9", "SLC-40", (2010, 6, 4), false),
            launch("SpaceX", "Falcon 9", "LC-39A", (2017, 2, 19), false),
            launch("ISRO", "PSLV", "Sriharikota", (1993, 9, 20), true),
            launch("ISRO", "PSLV", "Sriharikota", (1994, 10, 15), false),
            launch("ISRO", "PSLV", "Sriharikota", (1996, 3, 21), false),
            launch("ISRO", "PSLV", "Sriharikota", (2017, 8, 31), true),
        ]
    }
}
