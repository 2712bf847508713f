//! Holdout evaluation of a [`Classifier`].

use std::fmt;

use launchrisk_features::FeatureVector;
use launchrisk_stats::classification;
use serde::{Deserialize, Serialize};

use crate::capability::Classifier;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub samples: usize,
    pub failures: usize,
    pub accuracy: f64,
    /// `None` when the evaluated set holds a single class.
    pub roc_auc: Option<f64>,
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "samples={} failures={} accuracy={:.4}",
            self.samples, self.failures, self.accuracy
        )?;
        match self.roc_auc {
            Some(auc) => write!(f, " roc_auc={auc:.4}"),
            None => write!(f, " roc_auc=n/a"),
        }
    }
}

/// Scores `classifier` on labelled vectors.
///
/// Returns `None` for an empty or misaligned set.
#[must_use]
pub fn evaluate<C>(classifier: &C, features: &[FeatureVector], labels: &[bool]) -> Option<Evaluation>
where
    C: Classifier + ?Sized,
{
    if features.len() != labels.len() {
        return None;
    }
    let scores = features
        .iter()
        .map(|f| classifier.predict_probability(f))
        .collect::<Vec<_>>();
    let predictions = scores.iter().map(|p| *p >= 0.5).collect::<Vec<_>>();
    Some(Evaluation {
        samples: labels.len(),
        failures: labels.iter().filter(|l| **l).count(),
        accuracy: classification::accuracy(labels, &predictions)?,
        roc_auc: classification::roc_auc(labels, &scores),
    })
}

#[cfg(test)]
mod tests {
    use launchrisk_features::{FEATURE_COUNT, FeatureId};

    use super::*;

    /// Predicts the rocket failure rate as the failure probability.
    #[derive(Debug)]
    struct RateEcho;

    impl Classifier for RateEcho {
        fn predict_probability(&self, features: &FeatureVector) -> f64 {
            features.get(FeatureId::RocketFailureRate)
        }
    }

    fn vector(rate: f64) -> FeatureVector {
        let mut v = FeatureVector::from_values([0.0; FEATURE_COUNT]);
        v.set(FeatureId::RocketFailureRate, rate);
        v
    }

    #[test]
    fn test_evaluate() {
        let features = [vector(0.1), vector(0.4), vector(0.6), vector(0.9)];
        let labels = [false, true, false, true];
        let eval = evaluate(&RateEcho, &features, &labels).unwrap();
        assert_eq!(eval.samples, 4);
        assert_eq!(eval.failures, 2);
        assert!((eval.accuracy - 0.5).abs() < 1e-12);
        assert!((eval.roc_auc.unwrap() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_evaluate_single_class() {
        let eval = evaluate(&RateEcho, &[vector(0.2)], &[false]).unwrap();
        assert_eq!(eval.roc_auc, None);
        assert!(evaluate(&RateEcho, &[], &[]).is_none());
    }
}
