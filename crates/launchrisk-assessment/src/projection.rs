//! Expected failures and financial loss over a planned campaign.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ProjectionError {
    #[display("probability must be within 0..=100, got {_0}")]
    Probability(#[error(not(source))] f64),
    #[display("planned mission count must not be negative, got {_0}")]
    MissionCount(#[error(not(source))] f64),
    #[display("cost per mission must not be negative, got {_0}")]
    CostPerMission(#[error(not(source))] f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub planned_missions: f64,
    pub cost_per_mission: f64,
    pub expected_failures: f64,
    pub expected_financial_loss: f64,
}

/// Projects `probability_percent` over `planned_missions` launches.
///
/// # Errors
///
/// Returns [`ProjectionError`] for negative or non-finite inputs, or a
/// probability above 100.
pub fn project(
    probability_percent: f64,
    planned_missions: f64,
    cost_per_mission: f64,
) -> Result<Projection, ProjectionError> {
    if !(0.0..=100.0).contains(&probability_percent) {
        return Err(ProjectionError::Probability(probability_percent));
    }
    if !(planned_missions.is_finite() && planned_missions >= 0.0) {
        return Err(ProjectionError::MissionCount(planned_missions));
    }
    if !(cost_per_mission.is_finite() && cost_per_mission >= 0.0) {
        return Err(ProjectionError::CostPerMission(cost_per_mission));
    }
    let expected_failures = planned_missions * probability_percent / 100.0;
    Ok(Projection {
        planned_missions,
        cost_per_mission,
        expected_failures,
        expected_financial_loss: expected_failures * cost_per_mission,
    })
}
