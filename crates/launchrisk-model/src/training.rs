//! Seeded data partitioning.
//!
//! All randomness in training flows through a [`Pcg64Mcg`] seeded from the
//! configured seed, so a given data set always yields the same split and the
//! same attribution sample.

use rand::{SeedableRng as _, seq::SliceRandom as _};
use rand_pcg::Pcg64Mcg;

/// Seed used when none is configured.
pub const DEFAULT_SEED: u64 = 42;

/// Row indices of a train/holdout partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Splits `labels` into train and test indices, stratified by class.
///
/// Each class contributes `round(len * test_fraction)` rows to the test side,
/// keeping at least one row of every class in training. Indices on each side
/// are returned in ascending order.
#[must_use]
#[expect(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn stratified_split(labels: &[bool], test_fraction: f64, seed: u64) -> Split {
    let mut rng = Pcg64Mcg::seed_from_u64(seed);
    let fraction = test_fraction.clamp(0.0, 1.0);
    let mut train = vec![];
    let mut test = vec![];

    for class in [false, true] {
        let mut indices = labels
            .iter()
            .enumerate()
            .filter(|(_, label)| **label == class)
            .map(|(i, _)| i)
            .collect::<Vec<_>>();
        if indices.is_empty() {
            continue;
        }
        indices.shuffle(&mut rng);
        let n_test = ((indices.len() as f64 * fraction).round() as usize).min(indices.len() - 1);
        test.extend_from_slice(&indices[..n_test]);
        train.extend_from_slice(&indices[n_test..]);
    }

    train.sort_unstable();
    test.sort_unstable();
    Split { train, test }
}

/// Picks up to `amount` distinct indices out of `0..len`, sorted.
#[must_use]
pub fn sample_indices(len: usize, amount: usize, seed: u64) -> Vec<usize> {
    let mut rng = Pcg64Mcg::seed_from_u64(seed);
    let mut indices = rand::seq::index::sample(&mut rng, len, amount.min(len)).into_vec();
    indices.sort_unstable();
    indices
}
