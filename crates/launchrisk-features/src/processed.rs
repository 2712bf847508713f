//! The processed table handed from feature engineering to training.
//!
//! One row per normalized launch: the [`LaunchRecord`] fields followed by the
//! model features in schema order (`launch_year` and `launch_decade` appear
//! once, as they belong to both). The header written by [`write_processed`]
//! is checked by [`read_processed`], so a table produced under a different
//! feature schema is rejected instead of silently misaligned.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use launchrisk_data::{LaunchRecord, table};
use serde::{Deserialize, Serialize};

use crate::{
    engine::EngineeredRecord,
    schema::{FEATURE_COUNT, FeatureId, FeatureVector, SchemaMismatch},
};

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ProcessedError {
    #[display("failed to read processed table {}", path.display())]
    Read { path: PathBuf, source: csv::Error },
    #[display("failed to write processed table {}", path.display())]
    Write { path: PathBuf, source: csv::Error },
    #[display("failed to prepare processed table {}", path.display())]
    Prepare {
        path: PathBuf,
        source: table::TableError,
    },
    #[display("processed table {} has an unexpected header", path.display())]
    Header { path: PathBuf, source: SchemaMismatch },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProcessedRow {
    company: String,
    location: String,
    rocket: String,
    mission_status: String,
    launch_date: DateTime<Utc>,
    launch_year: i32,
    launch_decade: i32,
    failure: bool,
    rocket_failure_rate: f64,
    rocket_launch_count: f64,
    org_failure_rate: f64,
    past_failure_rate: f64,
    company_code: f64,
    location_code: f64,
    rocket_code: f64,
}

const RECORD_COLUMNS: [&str; 8] = [
    "company",
    "location",
    "rocket",
    "mission_status",
    "launch_date",
    "launch_year",
    "launch_decade",
    "failure",
];

/// Expected header of the processed table.
#[must_use]
pub fn processed_header() -> Vec<String> {
    RECORD_COLUMNS
        .iter()
        .copied()
        .chain(
            FeatureId::ALL
                .iter()
                .filter(|f| !matches!(f, FeatureId::LaunchYear | FeatureId::LaunchDecade))
                .map(|f| f.name()),
        )
        .map(str::to_owned)
        .collect()
}

impl From<&EngineeredRecord> for ProcessedRow {
    fn from(row: &EngineeredRecord) -> Self {
        let r = &row.record;
        let f = &row.features;
        Self {
            company: r.company.clone(),
            location: r.location.clone(),
            rocket: r.rocket.clone(),
            mission_status: r.mission_status.clone(),
            launch_date: r.launch_date,
            launch_year: r.launch_year,
            launch_decade: r.launch_decade,
            failure: r.failure,
            rocket_failure_rate: f.get(FeatureId::RocketFailureRate),
            rocket_launch_count: f.get(FeatureId::RocketLaunchCount),
            org_failure_rate: f.get(FeatureId::OrgFailureRate),
            past_failure_rate: f.get(FeatureId::PastFailureRate),
            company_code: f.get(FeatureId::CompanyCode),
            location_code: f.get(FeatureId::LocationCode),
            rocket_code: f.get(FeatureId::RocketCode),
        }
    }
}

impl From<ProcessedRow> for EngineeredRecord {
    fn from(row: ProcessedRow) -> Self {
        let mut features = FeatureVector::from_values([0.0; FEATURE_COUNT]);
        features.set(FeatureId::LaunchYear, f64::from(row.launch_year));
        features.set(FeatureId::LaunchDecade, f64::from(row.launch_decade));
        features.set(FeatureId::RocketFailureRate, row.rocket_failure_rate);
        features.set(FeatureId::RocketLaunchCount, row.rocket_launch_count);
        features.set(FeatureId::OrgFailureRate, row.org_failure_rate);
        features.set(FeatureId::PastFailureRate, row.past_failure_rate);
        features.set(FeatureId::CompanyCode, row.company_code);
        features.set(FeatureId::LocationCode, row.location_code);
        features.set(FeatureId::RocketCode, row.rocket_code);

        let record = LaunchRecord {
            company: row.company,
            location: row.location,
            rocket: row.rocket,
            mission_status: row.mission_status,
            launch_date: row.launch_date,
            launch_year: row.launch_year,
            launch_decade: row.launch_decade,
            failure: row.failure,
        };
        Self { record, features }
    }
}

/// Writes engineered rows to `path`, creating parent directories.
///
/// # Errors
///
/// Returns [`ProcessedError`] if the file cannot be written.
pub fn write_processed<P>(path: P, rows: &[EngineeredRecord]) -> Result<(), ProcessedError>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    table::create_parent_dir(path).map_err(|source| ProcessedError::Prepare {
        path: path.to_owned(),
        source,
    })?;
    let wrap = |source| ProcessedError::Write {
        path: path.to_owned(),
        source,
    };
    let mut writer = csv::Writer::from_path(path).map_err(wrap)?;
    for row in rows {
        writer.serialize(ProcessedRow::from(row)).map_err(wrap)?;
    }
    writer.flush().map_err(|e| wrap(e.into()))
}

/// Reads a processed table written by [`write_processed`].
///
/// # Errors
///
/// Returns [`ProcessedError::Header`] when the header differs from
/// [`processed_header`], or [`ProcessedError::Read`] on malformed rows.
pub fn read_processed<P>(path: P) -> Result<Vec<EngineeredRecord>, ProcessedError>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let wrap = |source| ProcessedError::Read {
        path: path.to_owned(),
        source,
    };
    let mut reader = csv::Reader::from_path(path).map_err(wrap)?;

    let found = reader
        .headers()
        .map_err(wrap)?
        .iter()
        .map(str::to_owned)
        .collect::<Vec<_>>();
    let expected = processed_header();
    if found != expected {
        return Err(ProcessedError::Header {
            path: path.to_owned(),
            source: SchemaMismatch { expected, found },
        });
    }

    reader
        .deserialize::<ProcessedRow>()
        .map(|row| row.map(EngineeredRecord::from))
        .collect::<Result<Vec<_>, _>>()
        .map_err(wrap)
}
