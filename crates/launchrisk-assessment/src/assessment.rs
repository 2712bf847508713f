//! End-to-end assessment of one hypothetical launch.
//!
//! [`assess`] chains the single-row feature transform, the scorer, and the
//! explanation rules. Fitted artifacts and the classifier are only read, so
//! independent requests can share them freely.

use launchrisk_features::{
    FeatureId, FittedArtifacts, Scenario, ScenarioFeatures, ScenarioWarning, TransformError,
};
use launchrisk_model::Classifier;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    explanation::{self, RiskLevel},
    scorer::{self, ConfidenceTier},
};

/// Outcome of scoring one scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// `100 * P(failure)`, in `[0, 100]`.
    pub probability_percent: f64,
    pub confidence_tier: ConfidenceTier,
    pub risk_level: RiskLevel,
    pub explanation_text: String,
    /// Model-wide top driver, when attributions were available.
    pub top_driver_feature: Option<FeatureId>,
}

/// A [`RiskAssessment`] plus the context it was computed from.
#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentOutcome {
    pub assessment: RiskAssessment,
    pub features: ScenarioFeatures,
}

impl AssessmentOutcome {
    #[must_use]
    pub fn warnings(&self) -> &[ScenarioWarning] {
        &self.features.warnings
    }
}

/// Scores `scenario` against fitted artifacts and a classifier.
///
/// A launch year after the fitted range lowers the confidence tier by one
/// step, since the model is extrapolating.
///
/// # Errors
///
/// Propagates [`TransformError`] when the scenario names an unseen category
/// or a (company, rocket) pair without history. No assessment is produced in
/// that case.
pub fn assess<C>(
    artifacts: &FittedArtifacts,
    classifier: &C,
    scenario: &Scenario,
    top_driver: Option<FeatureId>,
) -> Result<AssessmentOutcome, TransformError>
where
    C: Classifier + ?Sized,
{
    let features = artifacts.transform_one(scenario)?;
    let score = scorer::score(&features.vector, classifier, features.pair_launch_count);

    let mut confidence_tier = score.confidence_tier;
    for warning in &features.warnings {
        warn!(company = %scenario.company, rocket = %scenario.rocket, "{warning}");
        if matches!(warning, ScenarioWarning::YearAfterHistory { .. }) {
            confidence_tier = confidence_tier.downgrade();
        }
    }
    if confidence_tier == ConfidenceTier::Low {
        warn!(
            pair_launch_count = features.pair_launch_count,
            "low confidence prediction"
        );
    }

    let explanation = explanation::explain(&features.vector, score.probability_percent);
    Ok(AssessmentOutcome {
        assessment: RiskAssessment {
            probability_percent: score.probability_percent,
            confidence_tier,
            risk_level: explanation.risk_level,
            explanation_text: explanation.text,
            top_driver_feature: top_driver,
        },
        features,
    })
}
