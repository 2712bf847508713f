//! Capability traits for classifiers and attribution providers.
//!
//! The rest of the workspace depends only on these traits. Any model that can
//! estimate a failure probability for a [`FeatureVector`] can be scored, and
//! any provider that can split a prediction into per-feature contributions can
//! feed the top-driver summary.

use std::fmt;

use launchrisk_features::{FEATURE_COUNT, FeatureVector};

/// Per-feature attribution values of one sample, in schema order.
pub type Attribution = [f64; FEATURE_COUNT];

/// A binary classifier for mission failure.
pub trait Classifier: fmt::Debug + Send + Sync {
    /// Probability in `[0, 1]` that the launch fails.
    #[must_use]
    fn predict_probability(&self, features: &FeatureVector) -> f64;

    /// Hard prediction: `true` for the failure class.
    #[must_use]
    fn predict(&self, features: &FeatureVector) -> bool {
        self.predict_probability(features) >= 0.5
    }
}

/// Explains classifier outputs as additive per-feature contributions.
pub trait Attributor: fmt::Debug + Send + Sync {
    /// One attribution row per sample, aligned with `sample`.
    #[must_use]
    fn attribute(&self, sample: &[FeatureVector]) -> Vec<Attribution>;
}
