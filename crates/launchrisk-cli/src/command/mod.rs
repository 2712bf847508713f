use std::{io, path::PathBuf};

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt as _, util::SubscriberInitExt as _};

use crate::{config::Config, stage};

use self::{drivers::DriversArg, score::ScoreArg, summary::SummaryArg};

mod drivers;
mod score;
mod summary;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Enable debug logging (overridden by `RUST_LOG`)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(flatten)]
    overrides: Overrides,
    /// Pipeline step to run
    #[command(subcommand)]
    mode: Mode,
}

/// Command-line settings that take precedence over the configuration file.
#[derive(Debug, Default, Clone, clap::Args)]
struct Overrides {
    /// Raw launch CSV
    #[arg(long, global = true)]
    raw_data: Option<PathBuf>,
    /// Processed (cleaned and feature-engineered) CSV
    #[arg(long, global = true)]
    processed_data: Option<PathBuf>,
    /// Fitted feature artifacts JSON
    #[arg(long, global = true)]
    feature_artifacts: Option<PathBuf>,
    /// Model artifact JSON
    #[arg(long, global = true)]
    model: Option<PathBuf>,
    /// Audit log CSV
    #[arg(long, global = true)]
    audit_log: Option<PathBuf>,
    /// Directory for mission reports
    #[arg(long, global = true)]
    report_dir: Option<PathBuf>,
    /// Version label stored in newly trained models
    #[arg(long, global = true)]
    model_version: Option<String>,
    /// Seed for the train/test split and attribution sampling
    #[arg(long, global = true)]
    seed: Option<u64>,
}

impl Overrides {
    fn apply(self, config: &mut Config) {
        let paths = &mut config.paths;
        let path_overrides = [
            (self.raw_data, &mut paths.raw_data),
            (self.processed_data, &mut paths.processed_data),
            (self.feature_artifacts, &mut paths.feature_artifacts),
            (self.model, &mut paths.model),
            (self.audit_log, &mut paths.audit_log),
            (self.report_dir, &mut paths.report_dir),
        ];
        for (value, slot) in path_overrides {
            if let Some(value) = value {
                *slot = value;
            }
        }
        if let Some(version) = self.model_version {
            config.model.version = version;
        }
        if let Some(seed) = self.seed {
            config.model.seed = seed;
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Clean raw launch records into the processed CSV
    Preprocess,
    /// Fit features on the cleaned records and save the fitted artifacts
    Engineer,
    /// Train the failure classifier on the processed data
    Train,
    /// Evaluate the saved classifier on the processed data
    Evaluate,
    /// Run preprocess, engineer, train and evaluate in order
    RunPipeline,
    /// Score a hypothetical launch
    Score(#[clap(flatten)] ScoreArg),
    /// Rank features by mean absolute attribution
    Drivers(#[clap(flatten)] DriversArg),
    /// Mission KPIs and model transparency
    Summary(#[clap(flatten)] SummaryArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_logging(args.verbose);

    let mut config = Config::load(args.config.as_deref())?;
    args.overrides.apply(&mut config);

    match args.mode {
        Mode::Preprocess => {
            stage::preprocess(&config)?;
        }
        Mode::Engineer => {
            stage::engineer(&config)?;
        }
        Mode::Train => {
            stage::train(&config)?;
        }
        Mode::Evaluate => {
            stage::evaluate_model(&config)?;
        }
        Mode::RunPipeline => {
            stage::preprocess(&config)?;
            stage::engineer(&config)?;
            stage::train(&config)?;
            stage::evaluate_model(&config)?;
            info!("pipeline finished");
        }
        Mode::Score(arg) => score::run(&config, &arg)?,
        Mode::Drivers(arg) => drivers::run(&config, &arg)?,
        Mode::Summary(arg) => summary::run(&config, &arg)?,
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn test_cli_definition() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_overrides_apply() {
        let args = CommandArgs::parse_from([
            "launchrisk",
            "--model",
            "out/model.json",
            "train",
            "--seed",
            "9",
        ]);
        let mut config = Config::default();
        args.overrides.apply(&mut config);
        assert_eq!(config.paths.model, PathBuf::from("out/model.json"));
        assert_eq!(config.model.seed, 9);
        assert_eq!(config.paths.raw_data, Config::default().paths.raw_data);
        assert!(matches!(args.mode, Mode::Train));
    }
}
