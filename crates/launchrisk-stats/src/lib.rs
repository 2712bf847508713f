//! Statistical utilities for the launch risk pipeline.
//!
//! This crate provides the small set of numeric tools the rest of the
//! workspace builds on:
//!
//! - **Descriptive statistics**: mean, variance, standard deviation, min/max
//! - **Running means**: expanding (prefix) means over time-ordered outcomes
//! - **Classification metrics**: accuracy and ROC AUC for binary classifiers
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//! - [`running`]: Expanding means with inclusive or exclusive windows
//! - [`classification`]: Evaluation metrics for binary predictions
//!
//! # Examples
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use launchrisk_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! ```
//!
//! ## Computing an expanding mean
//!
//! ```
//! use launchrisk_stats::running::{Window, expanding_mean};
//!
//! let outcomes = [1.0, 0.0, 0.0, 1.0];
//! let means = expanding_mean(&outcomes, Window::Inclusive);
//! assert_eq!(means, vec![Some(1.0), Some(0.5), Some(1.0 / 3.0), Some(0.5)]);
//! ```
//!
//! ## Scoring a classifier
//!
//! ```
//! use launchrisk_stats::classification;
//!
//! let labels = [false, false, true, true];
//! let scores = [0.1, 0.4, 0.35, 0.8];
//! assert_eq!(classification::roc_auc(&labels, &scores), Some(0.75));
//! ```

pub mod classification;
pub mod descriptive;
pub mod running;

/// Arithmetic mean of an iterator of values.
///
/// Returns `None` for an empty input.
///
/// ```
/// assert_eq!(launchrisk_stats::mean([1.0, 0.0, 1.0, 0.0]), Some(0.5));
/// assert_eq!(launchrisk_stats::mean(std::iter::empty()), None);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0_usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}
