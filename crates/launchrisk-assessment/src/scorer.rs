//! Failure probability and confidence tier of one feature vector.

use launchrisk_features::FeatureVector;
use launchrisk_model::Classifier;
use serde::{Deserialize, Serialize};

/// How much history backs a prediction for a (company, rocket) pair.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
pub enum ConfidenceTier {
    Low,
    Medium,
    High,
}

impl ConfidenceTier {
    /// Pairs with more than this many launches are [`ConfidenceTier::High`].
    pub const HIGH_THRESHOLD: usize = 100;
    /// Pairs with more than this many launches are at least
    /// [`ConfidenceTier::Medium`].
    pub const MEDIUM_THRESHOLD: usize = 30;

    /// Tier for a pair with `launch_count` historical launches.
    ///
    /// Thresholds are strict: exactly 100 launches is still `Medium`.
    #[must_use]
    pub fn from_history(launch_count: usize) -> Self {
        if launch_count > Self::HIGH_THRESHOLD {
            Self::High
        } else if launch_count > Self::MEDIUM_THRESHOLD {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// One tier lower, saturating at `Low`.
    #[must_use]
    pub fn downgrade(self) -> Self {
        match self {
            Self::High => Self::Medium,
            Self::Medium | Self::Low => Self::Low,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Score {
    /// `100 * P(failure)`, in `[0, 100]`.
    pub probability_percent: f64,
    pub confidence_tier: ConfidenceTier,
}

/// Scores `features` with `classifier`.
///
/// `pair_launch_count` is the number of historical launches sharing the
/// scenario's (company, rocket) pair.
#[must_use]
pub fn score<C>(features: &FeatureVector, classifier: &C, pair_launch_count: usize) -> Score
where
    C: Classifier + ?Sized,
{
    let probability = classifier.predict_probability(features).clamp(0.0, 1.0);
    Score {
        probability_percent: probability * 100.0,
        confidence_tier: ConfidenceTier::from_history(pair_launch_count),
    }
}

#[cfg(test)]
mod tests {
    use launchrisk_features::FEATURE_COUNT;

    use super::*;

    #[derive(Debug)]
    struct Fixed(f64);

    impl Classifier for Fixed {
        fn predict_probability(&self, _features: &FeatureVector) -> f64 {
            self.0
        }
    }

    #[test]
    fn test_confidence_tiers() {
        assert_eq!(ConfidenceTier::from_history(150), ConfidenceTier::High);
        assert_eq!(ConfidenceTier::from_history(101), ConfidenceTier::High);
        assert_eq!(ConfidenceTier::from_history(100), ConfidenceTier::Medium);
        assert_eq!(ConfidenceTier::from_history(50), ConfidenceTier::Medium);
        assert_eq!(ConfidenceTier::from_history(31), ConfidenceTier::Medium);
        assert_eq!(ConfidenceTier::from_history(30), ConfidenceTier::Low);
        assert_eq!(ConfidenceTier::from_history(5), ConfidenceTier::Low);
        assert_eq!(ConfidenceTier::from_history(0), ConfidenceTier::Low);
    }

    #[test]
    fn test_downgrade() {
        assert_eq!(ConfidenceTier::High.downgrade(), ConfidenceTier::Medium);
        assert_eq!(ConfidenceTier::Medium.downgrade(), ConfidenceTier::Low);
        assert_eq!(ConfidenceTier::Low.downgrade(), ConfidenceTier::Low);
    }

    #[test]
    fn test_score() {
        let features = FeatureVector::from_values([0.0; FEATURE_COUNT]);
        let score = score(&features, &Fixed(0.125), 40);
        assert!((score.probability_percent - 12.5).abs() < 1e-12);
        assert_eq!(score.confidence_tier, ConfidenceTier::Medium);
    }

    #[test]
    fn test_score_clamps_out_of_range_probability() {
        let features = FeatureVector::from_values([0.0; FEATURE_COUNT]);
        assert!((score(&features, &Fixed(1.5), 0).probability_percent - 100.0).abs() < 1e-12);
        assert_eq!(score(&features, &Fixed(-0.1), 0).probability_percent, 0.0);
    }
}
