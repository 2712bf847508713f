use std::{collections::BTreeMap, path::PathBuf};

use chrono::{DateTime, Utc};
use launchrisk_data::{LaunchRecord, table};
use launchrisk_features::aggregate::AggregateStats;
use launchrisk_model::ModelArtifact;
use serde::Serialize;
use tracing::warn;

use crate::{config::Config, util::Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SummaryArg {
    /// Only count companies whose name contains this text (case-insensitive)
    #[arg(long)]
    company_contains: Option<String>,
    /// Rockets shown in the reliability table
    #[arg(long, default_value_t = 10)]
    top: usize,
    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
    /// Write JSON to this file instead of stdout
    #[arg(long, requires = "json")]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct RocketReliability {
    rocket: String,
    launches: usize,
    /// `100 - 100 * failure_rate`
    reliability_percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
struct YearTrend {
    year: i32,
    launches: usize,
    failure_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct ModelTransparency {
    version: String,
    trained_at: DateTime<Utc>,
    training_size: usize,
    holdout_accuracy: Option<f64>,
    holdout_roc_auc: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct Summary {
    company_filter: Option<String>,
    total_missions: usize,
    success_rate_percent: f64,
    failure_rate_percent: f64,
    /// Most reliable first.
    rocket_reliability: Vec<RocketReliability>,
    yearly_trend: Vec<YearTrend>,
    model: Option<ModelTransparency>,
}

impl Summary {
    /// KPIs over `records`, optionally restricted by company name.
    ///
    /// Returns `None` when no record passes the filter.
    fn from_records(records: &[LaunchRecord], company_contains: Option<&str>) -> Option<Self> {
        let needle = company_contains.map(str::to_lowercase);
        let selected = records
            .iter()
            .filter(|r| {
                needle
                    .as_deref()
                    .is_none_or(|n| r.company.to_lowercase().contains(n))
            })
            .cloned()
            .collect::<Vec<_>>();
        let stats = AggregateStats::from_records(&selected)?;

        let mut rocket_reliability = stats
            .by_rocket
            .iter()
            .map(|(rocket, group)| RocketReliability {
                rocket: rocket.clone(),
                launches: group.launch_count,
                reliability_percent: 100.0 - group.failure_rate * 100.0,
            })
            .collect::<Vec<_>>();
        rocket_reliability.sort_by(|a, b| {
            b.reliability_percent
                .total_cmp(&a.reliability_percent)
                .then(b.launches.cmp(&a.launches))
        });

        let mut by_year = BTreeMap::<i32, Vec<f64>>::new();
        for record in &selected {
            by_year
                .entry(record.launch_year)
                .or_default()
                .push(record.failure_value());
        }
        let yearly_trend = by_year
            .into_iter()
            .filter_map(|(year, failures)| {
                Some(YearTrend {
                    year,
                    launches: failures.len(),
                    failure_rate: launchrisk_stats::mean(failures)?,
                })
            })
            .collect();

        let failure_rate_percent = stats.global_failure_rate * 100.0;
        Some(Self {
            company_filter: company_contains.map(str::to_owned),
            total_missions: stats.total_launches,
            success_rate_percent: 100.0 - failure_rate_percent,
            failure_rate_percent,
            rocket_reliability,
            yearly_trend,
            model: None,
        })
    }
}

impl From<ModelArtifact> for ModelTransparency {
    fn from(artifact: ModelArtifact) -> Self {
        Self {
            version: artifact.version,
            trained_at: artifact.trained_at,
            training_size: artifact.training_size,
            holdout_accuracy: artifact.holdout.map(|h| h.accuracy),
            holdout_roc_auc: artifact.holdout.and_then(|h| h.roc_auc),
        }
    }
}

pub(crate) fn run(config: &Config, arg: &SummaryArg) -> anyhow::Result<()> {
    let records = table::read_records(&config.paths.processed_data)?;
    let Some(mut summary) = Summary::from_records(&records, arg.company_contains.as_deref())
    else {
        anyhow::bail!(
            "No launches match company filter {:?}",
            arg.company_contains.as_deref().unwrap_or_default()
        );
    };
    summary.model = match ModelArtifact::load(&config.paths.model) {
        Ok(artifact) => Some(artifact.into()),
        Err(err) => {
            warn!("model transparency unavailable: {err}");
            None
        }
    };

    if arg.json {
        return Output::save_json(&summary, arg.output.clone());
    }
    print_summary(&summary, arg.top);
    Ok(())
}

fn print_summary(summary: &Summary, top: usize) {
    if let Some(filter) = &summary.company_filter {
        println!("Companies matching {filter:?}");
    }
    println!("Total missions:  {}", summary.total_missions);
    println!("Success rate:    {:.2}%", summary.success_rate_percent);
    println!("Failure rate:    {:.2}%", summary.failure_rate_percent);

    println!();
    println!("Most reliable rockets");
    for r in summary.rocket_reliability.iter().take(top) {
        println!(
            "  {:<30} {:>7.2}% ({} launches)",
            r.rocket, r.reliability_percent, r.launches
        );
    }

    println!();
    println!("Failure rate by year");
    for t in &summary.yearly_trend {
        println!("  {} {:>6.3} ({} launches)", t.year, t.failure_rate, t.launches);
    }

    println!();
    match &summary.model {
        Some(model) => {
            println!("Model {} trained at {}", model.version, model.trained_at);
            println!("  Training size:    {}", model.training_size);
            if let Some(accuracy) = model.holdout_accuracy {
                println!("  Hold-out accuracy: {accuracy:.4}");
            }
            if let Some(auc) = model.holdout_roc_auc {
                println!("  Hold-out ROC AUC:  {auc:.4}");
            }
        }
        None => println!("No trained model"),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;

    use super::*;

    fn launch(company: &str, rocket: &str, year: i32, failure: bool) -> LaunchRecord {
        LaunchRecord::new(
            company,
            "Somewhere",
            rocket,
            if failure { "Failure" } else { "Success" },
            Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).unwrap(),
            failure,
        )
    }

    fn records() -> Vec<LaunchRecord> {
        vec![
            launch("ISRO", "PSLV", 2010, true),
            launch("ISRO", "PSLV", 2011, false),
            launch("ISRO", "GSLV", 2011, false),
            launch("SpaceX", "Falcon 9", 2011, false),
            launch("SpaceX", "Falcon 1", 2008, true),
        ]
    }

    #[test]
    fn test_summary_kpis() {
        let summary = Summary::from_records(&records(), None).unwrap();
        assert_eq!(summary.total_missions, 5);
        assert!((summary.failure_rate_percent - 40.0).abs() < 1e-9);
        assert!((summary.success_rate_percent - 60.0).abs() < 1e-9);

        let rockets = summary
            .rocket_reliability
            .iter()
            .map(|r| r.rocket.as_str())
            .collect::<Vec<_>>();
        assert_eq!(rockets, ["Falcon 9", "GSLV", "PSLV", "Falcon 1"]);
        assert!((summary.rocket_reliability[2].reliability_percent - 50.0).abs() < 1e-9);

        let years = summary.yearly_trend.iter().map(|t| t.year).collect::<Vec<_>>();
        assert_eq!(years, [2008, 2010, 2011]);
        assert_eq!(summary.yearly_trend[2].launches, 3);
        assert_eq!(summary.yearly_trend[2].failure_rate, 0.0);
    }

    #[test]
    fn test_company_filter_is_case_insensitive() {
        let summary = Summary::from_records(&records(), Some("isr")).unwrap();
        assert_eq!(summary.total_missions, 3);
        assert_eq!(summary.company_filter.as_deref(), Some("isr"));
        assert!(Summary::from_records(&records(), Some("Roscosmos")).is_none());
    }

    #[test]
    fn test_summary_reads_processed_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = crate::stage::tests::trained(dir.path());
        let records = table::read_records(&config.paths.processed_data).unwrap();
        let summary = Summary::from_records(&records, None).unwrap();
        assert_eq!(summary.total_missions, 60);
        assert_eq!(summary.yearly_trend.len(), 20);
    }
}
