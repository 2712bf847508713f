//! Risk scoring, explanation, and reporting for hypothetical launches.
//!
//! # Overview
//!
//! Given fitted feature artifacts and any [`Classifier`](launchrisk_model::Classifier),
//! this crate answers "how risky is this launch?":
//!
//! - [`scorer`]: failure probability in percent and a [`ConfidenceTier`]
//!   from the amount of (company, rocket) history
//! - [`explanation`]: fixed threshold rules that turn feature values into a
//!   [`RiskLevel`] and a sentence
//! - [`driver`]: the model-wide top driver from attribution values
//! - [`projection`]: expected failures and loss over a planned campaign
//! - [`assessment`]: the end-to-end [`assess`] call
//!
//! Two side outputs sit on top:
//!
//! - [`audit`]: the append-only CSV log of scoring requests
//! - [`report`]: one Markdown report per request
//!
//! # Design Decisions
//!
//! Scoring never mutates fitted state. Scenarios the fit cannot support
//! (unseen categories, pairs without history) are refused with a
//! [`TransformError`](launchrisk_features::TransformError) instead of being
//! scored with made-up inputs.

pub use self::{
    assessment::{AssessmentOutcome, RiskAssessment, assess},
    audit::{AuditEntry, AuditError, AuditLog},
    driver::{FeatureImportance, rank_features, top_driver},
    explanation::{Explanation, RiskLevel, explain},
    projection::{Projection, ProjectionError, project},
    report::MissionReport,
    scorer::{ConfidenceTier, Score, score},
};

pub mod assessment;
pub mod audit;
pub mod driver;
pub mod explanation;
pub mod projection;
pub mod report;
pub mod scorer;
