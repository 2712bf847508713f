//! Batch feature engineering over a full historical corpus.

use chrono::Utc;
use launchrisk_data::LaunchRecord;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    aggregate::AggregateStats,
    artifacts::FittedArtifacts,
    encoding::{CategoricalColumn, EncodingTable, EncodingTables, UnseenCategory},
    expanding::{ExpandingHistory, ExpandingPolicy},
    schema::{self, FeatureVector},
    transform::FeatureInputs,
};

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum FitError {
    #[display("cannot fit features on an empty record set")]
    EmptyInput,
    #[display("fitted tables do not cover the corpus")]
    Uncovered(UnseenCategory),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureEngineConfig {
    pub expanding_policy: ExpandingPolicy,
}

/// A normalized record paired with its model features.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineeredRecord {
    pub record: LaunchRecord,
    pub features: FeatureVector,
}

/// Output of [`FeatureEngine::fit_transform`].
#[derive(Debug, Clone)]
pub struct EngineeredSet {
    /// Rows in input order.
    pub rows: Vec<EngineeredRecord>,
    pub artifacts: FittedArtifacts,
}

/// Fits feature statistics and encodings on a full corpus.
///
/// Fitting is a snapshot of exactly the records passed in. Calling it on a
/// subset produces statistics that are not comparable with a fit on the full
/// history, so callers must always supply the complete record set.
#[derive(Debug, Default, Clone)]
pub struct FeatureEngine {
    config: FeatureEngineConfig,
}

impl FeatureEngine {
    #[must_use]
    pub fn new(config: FeatureEngineConfig) -> Self {
        Self { config }
    }

    /// Fits all tables on `records` and computes every row's feature vector.
    ///
    /// # Errors
    ///
    /// Returns [`FitError::EmptyInput`] when `records` is empty.
    pub fn fit_transform(&self, records: &[LaunchRecord]) -> Result<EngineeredSet, FitError> {
        let aggregates = AggregateStats::from_records(records).ok_or(FitError::EmptyInput)?;
        debug!(
            rockets = aggregates.by_rocket.len(),
            companies = aggregates.by_company.len(),
            global_failure_rate = aggregates.global_failure_rate,
            "aggregate statistics computed"
        );

        let (past_failure_rates, history) = ExpandingHistory::compute(
            records,
            self.config.expanding_policy,
            aggregates.global_failure_rate,
        );

        let encodings = EncodingTables {
            company: EncodingTable::fit(
                CategoricalColumn::Company,
                records.iter().map(|r| r.company.as_str()),
            ),
            location: EncodingTable::fit(
                CategoricalColumn::Location,
                records.iter().map(|r| r.location.as_str()),
            ),
            rocket: EncodingTable::fit(
                CategoricalColumn::Rocket,
                records.iter().map(|r| r.rocket.as_str()),
            ),
        };

        let rows = records
            .iter()
            .zip(past_failure_rates)
            .map(|(record, past_failure_rate)| {
                let inputs = FeatureInputs {
                    company: &record.company,
                    location: &record.location,
                    rocket: &record.rocket,
                    launch_year: record.launch_year,
                    past_failure_rate,
                };
                let features = inputs.assemble(&aggregates, &encodings)?;
                Ok(EngineeredRecord {
                    record: record.clone(),
                    features,
                })
            })
            .collect::<Result<Vec<_>, UnseenCategory>>()
            .map_err(FitError::Uncovered)?;

        info!(
            records = records.len(),
            policy = ?self.config.expanding_policy,
            "feature engineering completed"
        );

        let artifacts = FittedArtifacts {
            feature_names: schema::feature_names(),
            fitted_at: Utc::now(),
            encodings,
            aggregates,
            history,
        };
        Ok(EngineeredSet { rows, artifacts })
    }
}
