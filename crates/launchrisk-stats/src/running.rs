//! Expanding (running) means over ordered observations.
//!
//! An expanding mean at position `i` averages a growing prefix of the input.
//! Two window policies are supported:
//!
//! - [`Window::Inclusive`]: the prefix `0..=i`, so position `i` sees its own value
//! - [`Window::Exclusive`]: the prefix `0..i`, so position `i` only sees strictly
//!   earlier values; the first position has no history and yields `None`
//!
//! The caller is responsible for ordering the input. These functions never sort.

/// Window policy for [`expanding_mean`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Window {
    /// Include the current observation in its own mean.
    Inclusive,
    /// Use only strictly earlier observations.
    #[default]
    Exclusive,
}

/// Computes the expanding mean of `values` under the given window policy.
///
/// The returned vector has the same length as `values`. An entry is `None`
/// only when its window is empty (the first position under
/// [`Window::Exclusive`]).
///
/// # Examples
///
/// ```
/// use launchrisk_stats::running::{Window, expanding_mean};
///
/// let outcomes = [1.0, 0.0, 1.0];
/// assert_eq!(
///     expanding_mean(&outcomes, Window::Exclusive),
///     vec![None, Some(1.0), Some(0.5)]
/// );
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn expanding_mean(values: &[f64], window: Window) -> Vec<Option<f64>> {
    let mut sum = 0.0;
    let mut means = Vec::with_capacity(values.len());
    for (i, value) in values.iter().enumerate() {
        match window {
            Window::Inclusive => {
                sum += value;
                means.push(Some(sum / (i + 1) as f64));
            }
            Window::Exclusive => {
                means.push((i > 0).then(|| sum / i as f64));
                sum += value;
            }
        }
    }
    means
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_empty_input() {
        assert!(expanding_mean(&[], Window::Inclusive).is_empty());
        assert!(expanding_mean(&[], Window::Exclusive).is_empty());
    }

    #[test]
    fn test_inclusive_sees_own_value() {
        let means = expanding_mean(&[0.0, 1.0, 1.0, 0.0], Window::Inclusive);
        assert_eq!(means, vec![Some(0.0), Some(0.5), Some(2.0 / 3.0), Some(0.5)]);
    }

    #[test]
    fn test_exclusive_is_shifted_inclusive() {
        let values = [1.0, 1.0, 0.0, 0.0, 1.0];
        let inclusive = expanding_mean(&values, Window::Inclusive);
        let exclusive = expanding_mean(&values, Window::Exclusive);
        assert_eq!(exclusive[0], None);
        assert_eq!(&exclusive[1..], &inclusive[..values.len() - 1]);
    }

    proptest! {
        #[test]
        fn test_prefix_mean_matches_direct_mean(
            values in prop::collection::vec(prop::bool::ANY, 1..64)
        ) {
            let values = values.into_iter().map(f64::from).collect::<Vec<_>>();
            let means = expanding_mean(&values, Window::Inclusive);
            for (i, m) in means.iter().enumerate() {
                let direct = crate::mean(values[..=i].iter().copied()).unwrap();
                prop_assert!((m.unwrap() - direct).abs() < 1e-9);
            }
        }
    }
}
