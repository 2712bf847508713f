//! Failure classifiers and their training.
//!
//! # Overview
//!
//! The scoring side of the workspace talks to models only through the
//! [`Classifier`] and [`Attributor`] capability traits. This crate provides one
//! concrete implementation, [`LogisticModel`], plus everything needed to
//! produce and persist it:
//!
//! - [`training`]: seeded stratified train/holdout split and index sampling
//! - [`logistic`]: standardized logistic regression with L2 penalty
//! - [`evaluation`]: accuracy and ROC AUC of any [`Classifier`]
//! - [`artifact`]: the versioned model file
//!
//! # Examples
//!
//! ```
//! use launchrisk_features::{FEATURE_COUNT, FeatureId, FeatureVector};
//! use launchrisk_model::{Classifier, LogisticModel, TrainingConfig};
//!
//! let features = (0..20)
//!     .map(|i| {
//!         let mut v = FeatureVector::from_values([0.0; FEATURE_COUNT]);
//!         v.set(FeatureId::RocketFailureRate, f64::from(i) / 20.0);
//!         v
//!     })
//!     .collect::<Vec<_>>();
//! let labels = (0..20).map(|i| i >= 10).collect::<Vec<_>>();
//!
//! let model = LogisticModel::fit(&TrainingConfig::default(), &features, &labels)?;
//! assert!(model.predict(&features[19]));
//! assert!(!model.predict(&features[0]));
//! # Ok::<(), launchrisk_model::ModelError>(())
//! ```

pub use self::{
    artifact::{ArtifactMismatch, DEFAULT_MODEL_VERSION, ModelArtifact, ModelLoadError},
    capability::{Attribution, Attributor, Classifier},
    evaluation::{Evaluation, evaluate},
    logistic::{LogisticModel, ModelError, TrainingConfig},
    training::{DEFAULT_SEED, Split, sample_indices, stratified_split},
};

pub mod artifact;
pub mod capability;
pub mod evaluation;
pub mod logistic;
pub mod training;
