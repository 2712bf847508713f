//! Logistic regression on standardized features.
//!
//! The model stores per-feature standardization (training mean and standard
//! deviation) and one weight per feature plus an intercept:
//!
//! ```text
//! z_i = (x_i - mean_i) / std_i
//! p   = sigmoid(intercept + Σ w_i · z_i)
//! ```
//!
//! Fitting uses full-batch gradient descent on the L2-penalized log loss.
//! Training is deterministic for a given data set and configuration.
//!
//! # Attribution
//!
//! Because standardized features have zero mean over the training set, the
//! log-odds contribution of feature `i` relative to the average training
//! launch is exactly `w_i · z_i`. [`LogisticModel`] reports these values
//! through [`Attributor`]; they sum to the sample's log-odds minus the
//! log-odds of the average launch.

use std::iter;

use launchrisk_features::{FEATURE_COUNT, FeatureVector};
use launchrisk_stats::descriptive::DescriptiveStats;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::capability::{Attribution, Attributor, Classifier};

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ModelError {
    #[display("cannot train on an empty data set")]
    EmptyTrainingSet,
    #[display("training labels contain a single class; both outcomes are required")]
    SingleClass,
    #[display("{features} feature rows but {labels} labels")]
    LengthMismatch { features: usize, labels: usize },
    #[display("training diverged (non-finite weights); lower the learning rate")]
    Diverged,
}

/// Hyper-parameters for [`LogisticModel::fit`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub epochs: usize,
    pub learning_rate: f64,
    /// L2 penalty on weights (not the intercept).
    pub l2: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            epochs: 1000,
            learning_rate: 0.1,
            l2: 1e-3,
        }
    }
}

/// Mean and standard deviation of one training column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Standardizer {
    pub mean: f64,
    pub std_dev: f64,
}

impl Standardizer {
    fn apply(self, value: f64) -> f64 {
        if self.std_dev <= f64::EPSILON {
            0.0
        } else {
            (value - self.mean) / self.std_dev
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    pub standardizers: Vec<Standardizer>,
    pub weights: Vec<f64>,
    pub intercept: f64,
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

impl LogisticModel {
    /// Fits a model on `features` with failure `labels`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] for empty, single-class, or misaligned input,
    /// and when gradient descent diverges.
    #[expect(clippy::cast_precision_loss)]
    pub fn fit(
        config: &TrainingConfig,
        features: &[FeatureVector],
        labels: &[bool],
    ) -> Result<Self, ModelError> {
        if features.len() != labels.len() {
            return Err(ModelError::LengthMismatch {
                features: features.len(),
                labels: labels.len(),
            });
        }
        if features.is_empty() {
            return Err(ModelError::EmptyTrainingSet);
        }
        if labels.iter().all(|l| *l) || labels.iter().all(|l| !*l) {
            return Err(ModelError::SingleClass);
        }

        let standardizers = (0..FEATURE_COUNT)
            .map(|i| {
                let stats = DescriptiveStats::new(features.iter().map(|f| f.values()[i]))
                    .ok_or(ModelError::EmptyTrainingSet)?;
                Ok(Standardizer {
                    mean: stats.mean,
                    std_dev: if stats.is_constant() { 0.0 } else { stats.std_dev },
                })
            })
            .collect::<Result<Vec<_>, ModelError>>()?;

        let rows = features
            .iter()
            .map(|f| standardize(&standardizers, f))
            .collect::<Vec<_>>();
        let targets = labels
            .iter()
            .map(|l| f64::from(u8::from(*l)))
            .collect::<Vec<_>>();
        let n = rows.len() as f64;

        let mut weights = vec![0.0; FEATURE_COUNT];
        // start from the base rate so early epochs only learn feature effects
        let base_rate = targets.iter().sum::<f64>() / n;
        let mut intercept = (base_rate / (1.0 - base_rate)).ln();

        for epoch in 0..config.epochs {
            let mut grad_w = vec![0.0; FEATURE_COUNT];
            let mut grad_b = 0.0;
            let mut loss = 0.0;
            for (z, y) in iter::zip(&rows, &targets) {
                let p = sigmoid(intercept + dot(&weights, z));
                let err = p - y;
                for (g, zi) in iter::zip(&mut grad_w, z) {
                    *g += err * zi;
                }
                grad_b += err;
                loss -= y * p.max(f64::MIN_POSITIVE).ln() + (1.0 - y) * (1.0 - p).max(f64::MIN_POSITIVE).ln();
            }
            for (w, g) in iter::zip(&mut weights, &grad_w) {
                *w -= config.learning_rate * (g / n + config.l2 * *w);
            }
            intercept -= config.learning_rate * grad_b / n;

            if epoch % 100 == 0 {
                debug!(epoch, loss = loss / n, "gradient descent");
            }
        }

        if !intercept.is_finite() || weights.iter().any(|w| !w.is_finite()) {
            return Err(ModelError::Diverged);
        }
        Ok(Self {
            standardizers,
            weights,
            intercept,
        })
    }

    /// Log-odds of failure for `features`.
    #[must_use]
    pub fn decision_function(&self, features: &FeatureVector) -> f64 {
        self.intercept + dot(&self.weights, &standardize(&self.standardizers, features))
    }

    /// Whether the stored vectors match the compiled feature count.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.weights.len() == FEATURE_COUNT
            && self.standardizers.len() == FEATURE_COUNT
            && self.intercept.is_finite()
            && self.weights.iter().all(|w| w.is_finite())
    }
}

fn standardize(standardizers: &[Standardizer], features: &FeatureVector) -> Vec<f64> {
    iter::zip(standardizers, features.values())
        .map(|(s, v)| s.apply(*v))
        .collect()
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    iter::zip(a, b).map(|(x, y)| x * y).sum()
}

impl Classifier for LogisticModel {
    fn predict_probability(&self, features: &FeatureVector) -> f64 {
        sigmoid(self.decision_function(features))
    }
}

impl Attributor for LogisticModel {
    fn attribute(&self, sample: &[FeatureVector]) -> Vec<Attribution> {
        sample
            .iter()
            .map(|features| {
                let z = standardize(&self.standardizers, features);
                let mut attribution = [0.0; FEATURE_COUNT];
                for ((a, w), zi) in attribution.iter_mut().zip(&self.weights).zip(z) {
                    *a = w * zi;
                }
                attribution
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use launchrisk_features::FeatureId;

    use super::*;

    /// Failures are driven entirely by the rocket failure rate.
    fn separable() -> (Vec<FeatureVector>, Vec<bool>) {
        let mut features = vec![];
        let mut labels = vec![];
        for i in 0..40_u32 {
            let rate = f64::from(i) / 40.0;
            let mut values = [0.0; FEATURE_COUNT];
            values[FeatureId::LaunchYear.index()] = 2000.0 + f64::from(i % 7);
            values[FeatureId::RocketFailureRate.index()] = rate;
            features.push(FeatureVector::from_values(values));
            labels.push(rate > 0.5);
        }
        (features, labels)
    }

    #[test]
    fn test_learns_separable_signal() {
        let (features, labels) = separable();
        let model = LogisticModel::fit(&TrainingConfig::default(), &features, &labels).unwrap();
        assert!(model.is_well_formed());

        let rate_weight = model.weights[FeatureId::RocketFailureRate.index()];
        assert!(rate_weight > 1.0, "{rate_weight}");

        let correct = iter::zip(&features, &labels)
            .filter(|(f, l)| model.predict(f) == **l)
            .count();
        assert!(correct >= 38, "{correct}/40");
    }

    #[test]
    fn test_constant_feature_gets_no_weight() {
        let (features, labels) = separable();
        let model = LogisticModel::fit(&TrainingConfig::default(), &features, &labels).unwrap();
        assert_eq!(model.weights[FeatureId::CompanyCode.index()], 0.0);
    }

    #[test]
    fn test_attributions_sum_to_log_odds_shift() {
        let (features, labels) = separable();
        let model = LogisticModel::fit(&TrainingConfig::default(), &features, &labels).unwrap();
        let attributions = model.attribute(&features[..5]);
        assert_eq!(attributions.len(), 5);
        for (f, a) in iter::zip(&features, &attributions) {
            let shift = model.decision_function(f) - model.intercept;
            assert!((a.iter().sum::<f64>() - shift).abs() < 1e-9);
            assert_eq!(a[FeatureId::CompanyCode.index()], 0.0);
        }
    }

    #[test]
    fn test_rejects_bad_input() {
        let (features, labels) = separable();
        let config = TrainingConfig::default();
        assert_eq!(
            LogisticModel::fit(&config, &[], &[]),
            Err(ModelError::EmptyTrainingSet)
        );
        assert_eq!(
            LogisticModel::fit(&config, &features, &labels[..3]),
            Err(ModelError::LengthMismatch {
                features: 40,
                labels: 3
            })
        );
        assert_eq!(
            LogisticModel::fit(&config, &features, &vec![true; 40]),
            Err(ModelError::SingleClass)
        );
    }
}
