//! Single-row inference transform for hypothetical launch scenarios.
//!
//! [`FittedArtifacts::transform_one`] re-applies a finished fit to one
//! scenario. It reads the fitted tables and never mutates or recomputes them:
//! group statistics come from the aggregate snapshot, the historical failure
//! rate covers every fitted launch of the company, and categories are encoded
//! with the fitted tables.
//!
//! Two conditions are reported instead of fabricating values:
//!
//! - [`TransformError::UnseenCategory`]: the company, rocket, or location was
//!   not part of the fitting corpus
//! - [`TransformError::InsufficientHistory`]: the (company, rocket) pair has no
//!   historical launches, so there is nothing to extrapolate from
//!
//! Scenario years outside the fitted year range still produce a vector, with a
//! [`ScenarioWarning`] the caller should surface.

use launchrisk_data::record::decade_of;
use serde::{Deserialize, Serialize};

use crate::{
    aggregate::AggregateStats,
    artifacts::FittedArtifacts,
    encoding::{CategoricalColumn, EncodingTables, UnseenCategory},
    schema::{FEATURE_COUNT, FeatureId, FeatureVector},
};

/// A hypothetical launch to score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub company: String,
    pub rocket: String,
    pub launch_year: i32,
    /// Launch site; defaults to the pair's most recent site.
    pub location: Option<String>,
}

impl Scenario {
    #[must_use]
    pub fn new(company: impl Into<String>, rocket: impl Into<String>, launch_year: i32) -> Self {
        Self {
            company: company.into(),
            rocket: rocket.into(),
            launch_year,
            location: None,
        }
    }

    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::IsVariant)]
pub enum TransformError {
    #[display("{_0}")]
    UnseenCategory(UnseenCategory),
    #[display("no historical launches of rocket '{rocket}' by '{company}'")]
    InsufficientHistory { company: String, rocket: String },
}

impl From<UnseenCategory> for TransformError {
    fn from(err: UnseenCategory) -> Self {
        Self::UnseenCategory(err)
    }
}

/// A recoverable condition attached to an otherwise successful transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum ScenarioWarning {
    #[display("launch year {year} is beyond the historical data (last year {last_year})")]
    YearAfterHistory { year: i32, last_year: i32 },
    #[display("launch year {year} precedes the historical data (first year {first_year})")]
    YearBeforeHistory { year: i32, first_year: i32 },
}

/// Result of [`FittedArtifacts::transform_one`].
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioFeatures {
    pub vector: FeatureVector,
    /// The launch site actually encoded.
    pub location: String,
    /// Historical launches sharing the scenario's (company, rocket) pair.
    pub pair_launch_count: usize,
    pub warnings: Vec<ScenarioWarning>,
}

impl FittedArtifacts {
    /// Builds the feature vector of one hypothetical launch.
    ///
    /// Calling this twice with the same scenario yields identical results.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::UnseenCategory`] for any category absent
    /// from the fit, and [`TransformError::InsufficientHistory`] when the pair
    /// has never flown together.
    pub fn transform_one(&self, scenario: &Scenario) -> Result<ScenarioFeatures, TransformError> {
        let Scenario {
            company,
            rocket,
            launch_year,
            location,
        } = scenario;

        self.encodings.encode(CategoricalColumn::Company, company)?;
        self.encodings.encode(CategoricalColumn::Rocket, rocket)?;
        if let Some(location) = location {
            self.encodings.encode(CategoricalColumn::Location, location)?;
        }

        let pair = self
            .aggregates
            .pair(company, rocket)
            .ok_or_else(|| TransformError::InsufficientHistory {
                company: company.clone(),
                rocket: rocket.clone(),
            })?;
        let location = location.as_deref().unwrap_or(&pair.latest_location);

        let past_failure_rate = self.history.latest(company).ok_or_else(|| UnseenCategory {
            column: CategoricalColumn::Company,
            value: company.clone(),
        })?;

        let inputs = FeatureInputs {
            company,
            location,
            rocket,
            launch_year: *launch_year,
            past_failure_rate,
        };
        let vector = inputs.assemble(&self.aggregates, &self.encodings)?;

        let mut warnings = vec![];
        if *launch_year > self.aggregates.last_year {
            warnings.push(ScenarioWarning::YearAfterHistory {
                year: *launch_year,
                last_year: self.aggregates.last_year,
            });
        } else if *launch_year < self.aggregates.first_year {
            warnings.push(ScenarioWarning::YearBeforeHistory {
                year: *launch_year,
                first_year: self.aggregates.first_year,
            });
        }

        Ok(ScenarioFeatures {
            vector,
            location: location.to_owned(),
            pair_launch_count: pair.launch_count,
            warnings,
        })
    }
}

/// Raw ingredients of one feature vector.
///
/// Shared by the batch and single-row paths so both assemble vectors the
/// same way.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FeatureInputs<'a> {
    pub(crate) company: &'a str,
    pub(crate) location: &'a str,
    pub(crate) rocket: &'a str,
    pub(crate) launch_year: i32,
    pub(crate) past_failure_rate: f64,
}

impl FeatureInputs<'_> {
    #[expect(clippy::cast_precision_loss)]
    pub(crate) fn assemble(
        &self,
        aggregates: &AggregateStats,
        encodings: &EncodingTables,
    ) -> Result<FeatureVector, UnseenCategory> {
        let unseen = |column: CategoricalColumn, value: &str| UnseenCategory {
            column,
            value: value.to_owned(),
        };
        let rocket = aggregates
            .rocket(self.rocket)
            .ok_or_else(|| unseen(CategoricalColumn::Rocket, self.rocket))?;
        let company = aggregates
            .company(self.company)
            .ok_or_else(|| unseen(CategoricalColumn::Company, self.company))?;

        let mut vector = FeatureVector::from_values([0.0; FEATURE_COUNT]);
        vector.set(FeatureId::LaunchYear, f64::from(self.launch_year));
        vector.set(FeatureId::LaunchDecade, f64::from(decade_of(self.launch_year)));
        vector.set(FeatureId::RocketFailureRate, rocket.failure_rate);
        vector.set(FeatureId::RocketLaunchCount, rocket.launch_count as f64);
        vector.set(FeatureId::OrgFailureRate, company.failure_rate);
        vector.set(FeatureId::PastFailureRate, self.past_failure_rate);
        vector.set(
            FeatureId::CompanyCode,
            f64::from(encodings.encode(CategoricalColumn::Company, self.company)?),
        );
        vector.set(
            FeatureId::LocationCode,
            f64::from(encodings.encode(CategoricalColumn::Location, self.location)?),
        );
        vector.set(
            FeatureId::RocketCode,
            f64::from(encodings.encode(CategoricalColumn::Rocket, self.rocket)?),
        );
        Ok(vector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{engine::FeatureEngine, test_util::sample_records};

    fn fitted() -> (Vec<crate::EngineeredRecord>, FittedArtifacts) {
        let set = FeatureEngine::default().fit_transform(&sample_records()).unwrap();
        (set.rows, set.artifacts)
    }

    #[test]
    fn test_scenario_uses_fitted_tables() {
        let (_, artifacts) = fitted();
        let out = artifacts
            .transform_one(&Scenario::new("SpaceX", "Falcon 9", 2025))
            .unwrap();
        let v = out.vector;

        assert_eq!(out.location, "LC-39A");
        assert_eq!(out.pair_launch_count, 2);
        assert_eq!(v.get(FeatureId::LaunchYear), 2025.0);
        assert_eq!(v.get(FeatureId::LaunchDecade), 2020.0);
        assert_eq!(v.get(FeatureId::RocketFailureRate), 0.0);
        assert_eq!(v.get(FeatureId::RocketLaunchCount), 2.0);
        assert!((v.get(FeatureId::OrgFailureRate) - 0.25).abs() < 1e-12);
        assert!((v.get(FeatureId::PastFailureRate) - 0.25).abs() < 1e-12);
        assert_eq!(v.get(FeatureId::CompanyCode), 1.0);
        assert_eq!(v.get(FeatureId::LocationCode), 0.0);
        assert_eq!(v.get(FeatureId::RocketCode), 1.0);
        assert_eq!(
            out.warnings,
            vec![ScenarioWarning::YearAfterHistory {
                year: 2025,
                last_year: 2017
            }]
        );
    }

    #[test]
    fn test_matches_batch_row_except_history() {
        let (rows, artifacts) = fitted();
        let latest_isro = &rows[7];
        let scenario = Scenario::new("ISRO", "PSLV", 2017).with_location("Sriharikota");
        let out = artifacts.transform_one(&scenario).unwrap();
        assert!(out.warnings.is_empty());
        for id in FeatureId::ALL {
            if id == FeatureId::PastFailureRate {
                continue;
            }
            assert_eq!(out.vector.get(id), latest_isro.features.get(id), "{id}");
        }
        // batch row sees 3 prior launches; the scenario also sees the 2017 failure
        assert!((latest_isro.features.get(FeatureId::PastFailureRate) - 1.0 / 3.0).abs() < 1e-12);
        assert!((out.vector.get(FeatureId::PastFailureRate) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_single_launch_company_uses_own_outcome() {
        let mut records = sample_records();
        records.push(crate::test_util::launch("Vega Co", "Vega", "Kourou", (2012, 2, 13), false));
        let set = FeatureEngine::default().fit_transform(&records).unwrap();
        let out = set
            .artifacts
            .transform_one(&Scenario::new("Vega Co", "Vega", 2013))
            .unwrap();
        assert_eq!(out.vector.get(FeatureId::PastFailureRate), 0.0);
    }

    #[test]
    fn test_idempotent_and_side_effect_free() {
        let (_, artifacts) = fitted();
        let before = artifacts.clone();
        let scenario = Scenario::new("ISRO", "PSLV", 1990);
        let first = artifacts.transform_one(&scenario).unwrap();
        let second = artifacts.transform_one(&scenario).unwrap();
        assert_eq!(first, second);
        assert_eq!(artifacts, before);
        assert_eq!(
            first.warnings,
            vec![ScenarioWarning::YearBeforeHistory {
                year: 1990,
                first_year: 1993
            }]
        );
    }

    #[test]
    fn test_unseen_rocket() {
        let (_, artifacts) = fitted();
        let err = artifacts
            .transform_one(&Scenario::new("SpaceX", "Starship", 2025))
            .unwrap_err();
        assert_eq!(
            err,
            TransformError::UnseenCategory(UnseenCategory {
                column: CategoricalColumn::Rocket,
                value: "Starship".to_owned(),
            })
        );
    }

    #[test]
    fn test_unseen_company_and_location() {
        let (_, artifacts) = fitted();
        let err = artifacts
            .transform_one(&Scenario::new("Rocket Lab", "PSLV", 2025))
            .unwrap_err();
        assert!(err.is_unseen_category());

        let scenario = Scenario::new("SpaceX", "Falcon 9", 2025).with_location("Mahia");
        let err = artifacts.transform_one(&scenario).unwrap_err();
        assert!(err.to_string().contains("unseen location 'Mahia'"));
    }

    #[test]
    fn test_insufficient_history() {
        let (_, artifacts) = fitted();
        let err = artifacts
            .transform_one(&Scenario::new("ISRO", "Falcon 9", 2025))
            .unwrap_err();
        assert_eq!(
            err,
            TransformError::InsufficientHistory {
                company: "ISRO".to_owned(),
                rocket: "Falcon 9".to_owned(),
            }
        );
    }
}
