//! Evaluation metrics for binary classifiers.
//!
//! Labels are `true` for the positive class (a mission failure in this
//! workspace) and scores are predicted probabilities of the positive class.

/// Fraction of predictions that match their labels.
///
/// Returns `None` when the inputs are empty.
///
/// # Panics
///
/// Panics if `labels` and `predictions` have different lengths.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn accuracy(labels: &[bool], predictions: &[bool]) -> Option<f64> {
    assert_eq!(labels.len(), predictions.len());
    if labels.is_empty() {
        return None;
    }
    let correct = std::iter::zip(labels, predictions)
        .filter(|(l, p)| l == p)
        .count();
    Some(correct as f64 / labels.len() as f64)
}

/// Area under the ROC curve.
///
/// Computed with the rank-sum (Mann-Whitney U) formulation: the probability
/// that a randomly chosen positive is scored above a randomly chosen negative,
/// counting ties as one half. Tied scores share their average rank.
///
/// Returns `None` if either class is absent, since the curve is undefined.
///
/// # Panics
///
/// Panics if `labels` and `scores` have different lengths.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn roc_auc(labels: &[bool], scores: &[f64]) -> Option<f64> {
    assert_eq!(labels.len(), scores.len());
    let positives = labels.iter().filter(|l| **l).count();
    let negatives = labels.len() - positives;
    if positives == 0 || negatives == 0 {
        return None;
    }

    let mut order = (0..scores.len()).collect::<Vec<_>>();
    order.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));

    let mut positive_rank_sum = 0.0;
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && scores[order[end]] == scores[order[start]] {
            end += 1;
        }
        // ranks are 1-based; the tie group occupies ranks start+1..=end
        let average_rank = (start + 1 + end) as f64 / 2.0;
        let tied_positives = order[start..end].iter().filter(|&&i| labels[i]).count();
        positive_rank_sum += average_rank * tied_positives as f64;
        start = end;
    }

    let p = positives as f64;
    let n = negatives as f64;
    Some((positive_rank_sum - p * (p + 1.0) / 2.0) / (p * n))
}
