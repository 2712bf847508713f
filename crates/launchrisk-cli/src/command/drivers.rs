use std::path::PathBuf;

use launchrisk_assessment::{FeatureImportance, rank_features};
use launchrisk_features::FeatureVector;
use launchrisk_model::{Attributor, ModelArtifact, sample_indices};
use serde::Serialize;
use tracing::info;

use crate::{config::Config, stage, util::Output};

/// Launches sampled for attribution when not overridden.
pub(crate) const DEFAULT_SAMPLE_SIZE: usize = 200;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct DriversArg {
    /// Number of processed launches to sample
    #[arg(long, default_value_t = DEFAULT_SAMPLE_SIZE)]
    sample_size: usize,
    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
    /// Write JSON to this file instead of stdout
    #[arg(long, requires = "json")]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct DriversReport {
    model_version: String,
    sample_size: usize,
    top_driver: Option<FeatureImportance>,
    ranking: Vec<FeatureImportance>,
}

/// Ranks features over a seeded sample of the processed data.
pub(crate) fn rank<A>(
    config: &Config,
    attributor: &A,
    sample_size: usize,
) -> anyhow::Result<(usize, Vec<FeatureImportance>)>
where
    A: Attributor + ?Sized,
{
    let rows = stage::load_processed(config)?;
    let sample = sample_indices(rows.len(), sample_size, config.model.seed)
        .into_iter()
        .map(|i| rows[i].features)
        .collect::<Vec<FeatureVector>>();
    let ranking = rank_features(&attributor.attribute(&sample));
    Ok((sample.len(), ranking))
}

pub(crate) fn run(config: &Config, arg: &DriversArg) -> anyhow::Result<()> {
    let artifact = ModelArtifact::load(&config.paths.model)?;
    let (sample_size, ranking) = rank(config, &artifact.model, arg.sample_size)?;
    let report = DriversReport {
        model_version: artifact.version,
        sample_size,
        top_driver: ranking.first().copied(),
        ranking,
    };
    if let Some(top) = &report.top_driver {
        info!(feature = %top.feature, sample_size, "top driver");
    }

    if arg.json {
        return Output::save_json(&report, arg.output.clone());
    }
    println!(
        "Feature importance (model {}, {} sampled launches)",
        report.model_version, report.sample_size
    );
    println!("{:<22} {:>12}", "feature", "mean |attr|");
    for importance in &report.ranking {
        println!(
            "{:<22} {:>12.4}",
            importance.feature.name(),
            importance.mean_abs_attribution
        );
    }
    Ok(())
}
