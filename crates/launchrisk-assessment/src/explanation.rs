//! Rule-based rationale for a risk score.
//!
//! Each rule compares one feature against a fixed threshold. All rules are
//! evaluated independently and every triggered reason is reported, in rule
//! order, joined with `" and "`.

use launchrisk_features::{FeatureId, FeatureVector};
use serde::{Deserialize, Serialize};

/// Reason reported when no rule triggers.
pub const STRONG_HISTORY_REASON: &str = "historical performance is strong";

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
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    /// `High` above 60%, `Moderate` above 30%, otherwise `Low`.
    #[must_use]
    pub fn from_probability(probability_percent: f64) -> Self {
        if probability_percent > 60.0 {
            Self::High
        } else if probability_percent > 30.0 {
            Self::Moderate
        } else {
            Self::Low
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Comparison {
    Above,
    Below,
}

/// A threshold test on one feature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExplanationRule {
    pub feature: FeatureId,
    comparison: Comparison,
    pub threshold: f64,
    pub reason: &'static str,
}

impl ExplanationRule {
    #[must_use]
    pub fn is_triggered(&self, features: &FeatureVector) -> bool {
        let value = features.get(self.feature);
        match self.comparison {
            Comparison::Above => value > self.threshold,
            Comparison::Below => value < self.threshold,
        }
    }
}

/// Rules in reporting order.
pub const RULES: [ExplanationRule; 4] = [
    ExplanationRule {
        feature: FeatureId::RocketFailureRate,
        comparison: Comparison::Above,
        threshold: 0.25,
        reason: "rocket has a high historical failure rate",
    },
    ExplanationRule {
        feature: FeatureId::RocketLaunchCount,
        comparison: Comparison::Below,
        threshold: 5.0,
        reason: "rocket has limited operational history",
    },
    ExplanationRule {
        feature: FeatureId::OrgFailureRate,
        comparison: Comparison::Above,
        threshold: 0.30,
        reason: "organization has higher-than-average failures",
    },
    ExplanationRule {
        feature: FeatureId::PastFailureRate,
        comparison: Comparison::Above,
        threshold: 0.35,
        reason: "recent missions show increasing failures",
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Explanation {
    pub risk_level: RiskLevel,
    /// Triggered reasons, or [`STRONG_HISTORY_REASON`] alone.
    pub reasons: Vec<&'static str>,
    pub text: String,
}

#[must_use]
pub fn explain(features: &FeatureVector, probability_percent: f64) -> Explanation {
    let mut reasons = RULES
        .iter()
        .filter(|rule| rule.is_triggered(features))
        .map(|rule| rule.reason)
        .collect::<Vec<_>>();
    if reasons.is_empty() {
        reasons.push(STRONG_HISTORY_REASON);
    }
    Explanation {
        risk_level: RiskLevel::from_probability(probability_percent),
        text: reasons.join(" and "),
        reasons,
    }
}

#[cfg(test)]
mod tests {
    use launchrisk_features::FEATURE_COUNT;

    use super::*;

    fn features(rocket_rate: f64, rocket_count: f64, org_rate: f64, past_rate: f64) -> FeatureVector {
        let mut v = FeatureVector::from_values([0.0; FEATURE_COUNT]);
        v.set(FeatureId::RocketFailureRate, rocket_rate);
        v.set(FeatureId::RocketLaunchCount, rocket_count);
        v.set(FeatureId::OrgFailureRate, org_rate);
        v.set(FeatureId::PastFailureRate, past_rate);
        v
    }

    #[test]
    fn test_risk_levels() {
        assert_eq!(RiskLevel::from_probability(70.0), RiskLevel::High);
        assert_eq!(RiskLevel::from_probability(60.0), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_probability(30.5), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_probability(30.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_probability(0.0), RiskLevel::Low);
    }

    #[test]
    fn test_two_rules_are_joined() {
        let explanation = explain(&features(0.30, 3.0, 0.10, 0.10), 70.0);
        assert_eq!(explanation.risk_level, RiskLevel::High);
        assert_eq!(
            explanation.text,
            "rocket has a high historical failure rate and rocket has limited operational history"
        );
        assert!(!explanation.text.contains("organization"));
        assert!(!explanation.text.contains("recent missions"));
    }

    #[test]
    fn test_all_rules_in_order() {
        let explanation = explain(&features(0.9, 1.0, 0.9, 0.9), 10.0);
        assert_eq!(
            explanation.reasons,
            RULES.iter().map(|r| r.reason).collect::<Vec<_>>()
        );
        assert_eq!(explanation.text.matches(" and ").count(), 3);
    }

    #[test]
    fn test_no_rule_triggers() {
        let explanation = explain(&features(0.25, 5.0, 0.30, 0.35), 10.0);
        assert_eq!(explanation.reasons, vec![STRONG_HISTORY_REASON]);
        assert_eq!(explanation.text, STRONG_HISTORY_REASON);
        assert_eq!(explanation.risk_level, RiskLevel::Low);
    }
}
