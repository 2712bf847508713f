//! Global feature importance from attribution values.
//!
//! The ranking describes the model's behavior over a sample of launches. It is
//! not an explanation of any single prediction.

use launchrisk_features::{FEATURE_COUNT, FeatureId};
use launchrisk_model::Attribution;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub feature: FeatureId,
    pub mean_abs_attribution: f64,
}

/// Mean absolute attribution per feature, largest first.
///
/// Ties keep schema order. Returns an empty ranking for an empty sample.
#[must_use]
#[expect(clippy::cast_precision_loss)]
pub fn rank_features(attributions: &[Attribution]) -> Vec<FeatureImportance> {
    if attributions.is_empty() {
        return vec![];
    }
    let mut totals = [0.0; FEATURE_COUNT];
    for row in attributions {
        for (total, value) in totals.iter_mut().zip(row) {
            *total += value.abs();
        }
    }
    let n = attributions.len() as f64;
    let mut ranking = FeatureId::ALL
        .iter()
        .zip(totals)
        .map(|(feature, total)| FeatureImportance {
            feature: *feature,
            mean_abs_attribution: total / n,
        })
        .collect::<Vec<_>>();
    ranking.sort_by(|a, b| b.mean_abs_attribution.total_cmp(&a.mean_abs_attribution));
    ranking
}

/// The feature with the largest mean absolute attribution.
#[must_use]
pub fn top_driver(attributions: &[Attribution]) -> Option<FeatureId> {
    rank_features(attributions).first().map(|i| i.feature)
}
