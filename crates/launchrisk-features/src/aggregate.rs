//! Group-level snapshot statistics.
//!
//! [`AggregateStats`] summarizes the whole fitting corpus at once. Failure
//! rates and launch counts per rocket and per company are computed over
//! *every* record of the group, so each row of a group sees the identical
//! value (a look-ahead statistic, unlike the expanding history). Recomputing
//! after the corpus changes updates all of them together.
//!
//! The per (company, rocket) pair history backs the prediction confidence
//! tier and supplies the default launch location for hypothetical scenarios.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use launchrisk_data::LaunchRecord;
use serde::{Deserialize, Serialize};

/// Summary of one group of launches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupStats {
    pub launch_count: usize,
    pub failure_count: usize,
    /// Mean of the failure flag within the group.
    pub failure_rate: f64,
}

/// History of one (company, rocket) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairHistory {
    pub launch_count: usize,
    pub failure_rate: f64,
    /// Location of the pair's most recent launch.
    pub latest_location: String,
    pub latest_launch_date: DateTime<Utc>,
}

/// Snapshot statistics of a complete fitting corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    pub total_launches: usize,
    pub global_failure_rate: f64,
    pub first_year: i32,
    pub last_year: i32,
    pub by_rocket: BTreeMap<String, GroupStats>,
    pub by_company: BTreeMap<String, GroupStats>,
    /// company -> rocket -> history
    pub by_pair: BTreeMap<String, BTreeMap<String, PairHistory>>,
}

#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    launches: usize,
    failures: usize,
}

impl Tally {
    fn add(&mut self, failure: bool) {
        self.launches += 1;
        self.failures += usize::from(failure);
    }

    #[expect(clippy::cast_precision_loss)]
    fn rate(self) -> f64 {
        self.failures as f64 / self.launches as f64
    }

    fn finish(self) -> GroupStats {
        GroupStats {
            launch_count: self.launches,
            failure_count: self.failures,
            failure_rate: self.rate(),
        }
    }
}

impl AggregateStats {
    /// Computes statistics over `records`.
    ///
    /// Returns `None` for an empty corpus, where no rate is defined.
    #[must_use]
    pub fn from_records(records: &[LaunchRecord]) -> Option<Self> {
        let first = records.first()?;

        let mut total = Tally::default();
        let mut by_rocket = BTreeMap::<&str, Tally>::new();
        let mut by_company = BTreeMap::<&str, Tally>::new();
        let mut by_pair = BTreeMap::<(&str, &str), (Tally, &LaunchRecord)>::new();
        let mut first_year = first.launch_year;
        let mut last_year = first.launch_year;

        for record in records {
            total.add(record.failure);
            by_rocket.entry(&record.rocket).or_default().add(record.failure);
            by_company.entry(&record.company).or_default().add(record.failure);

            let (tally, latest) = by_pair
                .entry((record.company.as_str(), record.rocket.as_str()))
                .or_insert((Tally::default(), record));
            tally.add(record.failure);
            // later input rows win ties
            if record.launch_date >= latest.launch_date {
                *latest = record;
            }

            first_year = first_year.min(record.launch_year);
            last_year = last_year.max(record.launch_year);
        }

        let mut pairs = BTreeMap::<String, BTreeMap<String, PairHistory>>::new();
        for ((company, rocket), (tally, latest)) in by_pair {
            let history = PairHistory {
                launch_count: tally.launches,
                failure_rate: tally.rate(),
                latest_location: latest.location.clone(),
                latest_launch_date: latest.launch_date,
            };
            pairs
                .entry(company.to_owned())
                .or_default()
                .insert(rocket.to_owned(), history);
        }

        Some(Self {
            total_launches: total.launches,
            global_failure_rate: total.rate(),
            first_year,
            last_year,
            by_rocket: finish_groups(by_rocket),
            by_company: finish_groups(by_company),
            by_pair: pairs,
        })
    }

    #[must_use]
    pub fn rocket(&self, rocket: &str) -> Option<&GroupStats> {
        self.by_rocket.get(rocket)
    }

    #[must_use]
    pub fn company(&self, company: &str) -> Option<&GroupStats> {
        self.by_company.get(company)
    }

    #[must_use]
    pub fn pair(&self, company: &str, rocket: &str) -> Option<&PairHistory> {
        self.by_pair.get(company)?.get(rocket)
    }

    /// Number of historical launches sharing this (company, rocket) pair.
    #[must_use]
    pub fn pair_launch_count(&self, company: &str, rocket: &str) -> usize {
        self.pair(company, rocket).map_or(0, |p| p.launch_count)
    }
}

fn finish_groups(groups: BTreeMap<&str, Tally>) -> BTreeMap<String, GroupStats> {
    groups
        .into_iter()
        .map(|(key, tally)| (key.to_owned(), tally.finish()))
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;
    use proptest::prelude::*;

    use super::*;

    fn record(company: &str, rocket: &str, location: &str, year: i32, failure: bool) -> LaunchRecord {
        let date = Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).unwrap();
        LaunchRecord::new(company, location, rocket, "", date, failure)
    }

    #[test]
    fn test_empty_corpus() {
        assert!(AggregateStats::from_records(&[]).is_none());
    }

    #[test]
    fn test_group_rates_and_counts() {
        let records = [
            record("SpaceX", "Falcon 9", "LC-39A", 2018, false),
            record("SpaceX", "Falcon 9", "SLC-40", 2019, true),
            record("SpaceX", "Falcon 1", "Omelek", 2006, true),
            record("ISRO", "PSLV", "Sriharikota", 2015, false),
        ];
        let stats = AggregateStats::from_records(&records).unwrap();

        assert_eq!(stats.total_launches, 4);
        assert!((stats.global_failure_rate - 0.5).abs() < 1e-12);
        assert_eq!((stats.first_year, stats.last_year), (2006, 2019));

        let falcon9 = stats.rocket("Falcon 9").unwrap();
        assert_eq!(falcon9.launch_count, 2);
        assert!((falcon9.failure_rate - 0.5).abs() < 1e-12);

        let spacex = stats.company("SpaceX").unwrap();
        assert_eq!(spacex.launch_count, 3);
        assert!((spacex.failure_rate - 2.0 / 3.0).abs() < 1e-12);

        let pair = stats.pair("SpaceX", "Falcon 9").unwrap();
        assert_eq!(pair.launch_count, 2);
        assert_eq!(pair.latest_location, "SLC-40");
        assert_eq!(stats.pair_launch_count("ISRO", "Falcon 9"), 0);
    }

    #[test]
    fn test_latest_location_ignores_input_order() {
        let records = [
            record("ISRO", "PSLV", "Second Pad", 2020, false),
            record("ISRO", "PSLV", "First Pad", 2001, false),
        ];
        let stats = AggregateStats::from_records(&records).unwrap();
        assert_eq!(stats.pair("ISRO", "PSLV").unwrap().latest_location, "Second Pad");
    }

    proptest! {
        #[test]
        fn test_rocket_rate_is_group_mean(
            rows in prop::collection::vec((0..4_usize, prop::bool::ANY), 1..60)
        ) {
            let records = rows
                .iter()
                .map(|(r, f)| record("Co", &format!("R{r}"), "Pad", 2000, *f))
                .collect::<Vec<_>>();
            let stats = AggregateStats::from_records(&records).unwrap();
            for r in &records {
                let group = records.iter().filter(|o| o.rocket == r.rocket);
                let direct = launchrisk_stats::mean(group.map(LaunchRecord::failure_value)).unwrap();
                let fitted = stats.rocket(&r.rocket).unwrap().failure_rate;
                prop_assert!((fitted - direct).abs() < 1e-12);
            }
        }
    }
}
