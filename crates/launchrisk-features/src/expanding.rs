//! Per-company expanding failure history.
//!
//! For each company, launches are ordered by ascending `launch_date` (ties
//! keep input order) and the failure flag is averaged over a growing prefix.
//! Ordering across companies does not matter; ordering within one company
//! does, so the sort happens here and never in callers.
//!
//! # Window policy
//!
//! [`ExpandingPolicy::Exclusive`] (the default) averages strictly earlier
//! launches only, so a record's own outcome never leaks into its feature.
//! [`ExpandingPolicy::Inclusive`] includes the current launch and reproduces
//! the historical pipeline's values.
//!
//! Positions without any history (a company's first launch under the
//! exclusive policy) take the global mean failure rate of the corpus.
//!
//! The inference snapshot is the mean over all of a company's fitted
//! outcomes. A hypothetical launch comes after every fitted record, so its
//! strictly prior history is the whole company history under either policy.

use std::collections::BTreeMap;

use launchrisk_data::LaunchRecord;
use launchrisk_stats::running::{self, Window};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpandingPolicy {
    Inclusive,
    #[default]
    Exclusive,
}

impl From<ExpandingPolicy> for Window {
    fn from(policy: ExpandingPolicy) -> Self {
        match policy {
            ExpandingPolicy::Inclusive => Window::Inclusive,
            ExpandingPolicy::Exclusive => Window::Exclusive,
        }
    }
}

/// The fitted part of the expanding history needed at inference time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpandingHistory {
    pub policy: ExpandingPolicy,
    /// Value used where no history exists.
    pub fallback: f64,
    /// Each company's failure rate over all of its fitted launches.
    pub latest_by_company: BTreeMap<String, f64>,
}

impl ExpandingHistory {
    /// Computes the per-record history and the fitted snapshot.
    ///
    /// The returned values are aligned with `records` (input order).
    #[must_use]
    pub fn compute(
        records: &[LaunchRecord],
        policy: ExpandingPolicy,
        fallback: f64,
    ) -> (Vec<f64>, Self) {
        let mut by_company = BTreeMap::<&str, Vec<usize>>::new();
        for (i, record) in records.iter().enumerate() {
            by_company.entry(record.company.as_str()).or_default().push(i);
        }

        let mut values = vec![fallback; records.len()];
        let mut latest_by_company = BTreeMap::new();
        for (company, mut indices) in by_company {
            // stable: equal dates keep input order
            indices.sort_by_key(|&i| records[i].launch_date);
            let outcomes = indices
                .iter()
                .map(|&i| records[i].failure_value())
                .collect::<Vec<_>>();
            let means = running::expanding_mean(&outcomes, policy.into());

            for (&i, mean) in indices.iter().zip(means) {
                values[i] = mean.unwrap_or(fallback);
            }
            let overall = launchrisk_stats::mean(outcomes.iter().copied()).unwrap_or(fallback);
            latest_by_company.insert(company.to_owned(), overall);
        }

        let history = Self {
            policy,
            fallback,
            latest_by_company,
        };
        (values, history)
    }

    /// The value a launch after all fitted records would see, if the company
    /// was fitted.
    #[must_use]
    pub fn latest(&self, company: &str) -> Option<f64> {
        self.latest_by_company.get(company).copied()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone as _, Utc};
    use proptest::prelude::*;

    use super::*;

    fn record(company: &str, year: i32, day: u32, failure: bool) -> LaunchRecord {
        let date = Utc.with_ymd_and_hms(year, 1, day, 0, 0, 0).unwrap();
        LaunchRecord::new(company, "Pad", "Rocket", "", date, failure)
    }

    #[test]
    fn test_exclusive_history_in_time_order() {
        // input deliberately out of time order
        let records = [
            record("A", 2003, 1, false),
            record("A", 2001, 1, true),
            record("B", 2000, 1, false),
            record("A", 2002, 1, false),
        ];
        let (values, history) = ExpandingHistory::compute(&records, ExpandingPolicy::Exclusive, 0.25);

        // A in time order: 2001 (fail), 2002 (ok), 2003 (ok)
        assert_eq!(values[1], 0.25);
        assert!((values[3] - 1.0).abs() < 1e-12);
        assert!((values[0] - 0.5).abs() < 1e-12);
        assert_eq!(values[2], 0.25);

        assert!((history.latest("A").unwrap() - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(history.latest("B"), Some(0.0));
        assert_eq!(history.latest("C"), None);
    }

    #[test]
    fn test_snapshot_counts_latest_outcome() {
        let records = [
            record("ISRO", 2001, 1, true),
            record("ISRO", 2002, 1, false),
            record("ISRO", 2003, 1, false),
            record("ISRO", 2004, 1, true),
            record("X", 2004, 1, false),
        ];
        for policy in [ExpandingPolicy::Exclusive, ExpandingPolicy::Inclusive] {
            let (_, history) = ExpandingHistory::compute(&records, policy, 0.4);
            assert_eq!(history.latest("ISRO"), Some(0.5));
            assert_eq!(history.latest("X"), Some(0.0));
        }
    }

    #[test]
    fn test_inclusive_history_includes_own_outcome() {
        let records = [record("A", 2001, 1, true), record("A", 2002, 1, false)];
        let (values, history) = ExpandingHistory::compute(&records, ExpandingPolicy::Inclusive, 0.9);
        assert_eq!(values, vec![1.0, 0.5]);
        assert_eq!(history.latest("A"), Some(0.5));
    }

    #[test]
    fn test_ties_keep_input_order() {
        let records = [
            record("A", 2001, 1, true),
            record("A", 2001, 1, false),
            record("A", 2001, 1, false),
        ];
        let (values, _) = ExpandingHistory::compute(&records, ExpandingPolicy::Exclusive, 0.0);
        assert_eq!(values, vec![0.0, 1.0, 0.5]);
    }

    proptest! {
        #[test]
        fn test_history_is_prefix_mean_per_company(
            rows in prop::collection::vec((0..3_usize, 1990..2020_i32, 1..28_u32, prop::bool::ANY), 1..50)
        ) {
            let records = rows
                .iter()
                .map(|(c, y, d, f)| record(&format!("C{c}"), *y, *d, *f))
                .collect::<Vec<_>>();
            let fallback = 0.123;
            let (values, _) = ExpandingHistory::compute(&records, ExpandingPolicy::Exclusive, fallback);

            for (i, r) in records.iter().enumerate() {
                // strictly prior = earlier date, or same date and earlier input position
                let prior = records
                    .iter()
                    .enumerate()
                    .filter(|(j, o)| {
                        o.company == r.company
                            && (o.launch_date < r.launch_date || (o.launch_date == r.launch_date && *j < i))
                    })
                    .map(|(_, o)| o.failure_value());
                let expected = launchrisk_stats::mean(prior).unwrap_or(fallback);
                prop_assert!((values[i] - expected).abs() < 1e-9);
            }
        }
    }
}
