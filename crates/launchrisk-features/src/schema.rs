//! The single ordered definition of the model's input features.
//!
//! Every component that builds or reads a [`FeatureVector`] goes through
//! [`FeatureId`], so training, inference, artifacts, and the processed table
//! cannot drift apart. Persisted artifacts record [`feature_names()`] and are
//! rejected on load if the list differs from the compiled schema.

use std::{fmt, iter};

use serde::{Deserialize, Serialize};

/// Number of features in a [`FeatureVector`].
pub const FEATURE_COUNT: usize = FeatureId::ALL.len();

/// One model input, in schema order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureId {
    LaunchYear,
    LaunchDecade,
    RocketFailureRate,
    RocketLaunchCount,
    OrgFailureRate,
    PastFailureRate,
    CompanyCode,
    LocationCode,
    RocketCode,
}

impl FeatureId {
    /// All features in vector order.
    pub const ALL: [Self; 9] = [
        Self::LaunchYear,
        Self::LaunchDecade,
        Self::RocketFailureRate,
        Self::RocketLaunchCount,
        Self::OrgFailureRate,
        Self::PastFailureRate,
        Self::CompanyCode,
        Self::LocationCode,
        Self::RocketCode,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::LaunchYear => "launch_year",
            Self::LaunchDecade => "launch_decade",
            Self::RocketFailureRate => "rocket_failure_rate",
            Self::RocketLaunchCount => "rocket_launch_count",
            Self::OrgFailureRate => "org_failure_rate",
            Self::PastFailureRate => "past_failure_rate",
            Self::CompanyCode => "company_code",
            Self::LocationCode => "location_code",
            Self::RocketCode => "rocket_code",
        }
    }

    /// Position of this feature inside a [`FeatureVector`].
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Feature names in schema order, as recorded in persisted artifacts.
#[must_use]
pub fn feature_names() -> Vec<String> {
    FeatureId::ALL.iter().map(|f| f.name().to_owned()).collect()
}

/// A persisted feature list does not match the compiled schema.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("feature schema mismatch: expected [{}], found [{}]", expected.join(", "), found.join(", "))]
pub struct SchemaMismatch {
    pub expected: Vec<String>,
    pub found: Vec<String>,
}

/// Checks that `names` is exactly the compiled feature list, in order.
///
/// # Errors
///
/// Returns [`SchemaMismatch`] on any difference in names or order.
pub fn check_feature_names(names: &[String]) -> Result<(), SchemaMismatch> {
    let expected = feature_names();
    if names == expected.as_slice() {
        Ok(())
    } else {
        Err(SchemaMismatch {
            expected,
            found: names.to_vec(),
        })
    }
}

/// A fixed-order tuple of model inputs.
///
/// A vector is only meaningful together with the fitted artifacts it was
/// derived from; codes and group statistics refer to that fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    #[must_use]
    pub fn from_values(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    #[must_use]
    pub fn get(&self, feature: FeatureId) -> f64 {
        self.0[feature.index()]
    }

    pub fn set(&mut self, feature: FeatureId, value: f64) {
        self.0[feature.index()] = value;
    }

    #[must_use]
    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }

    /// Iterates `(feature, value)` pairs in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (FeatureId, f64)> + '_ {
        iter::zip(FeatureId::ALL, self.0)
    }
}
