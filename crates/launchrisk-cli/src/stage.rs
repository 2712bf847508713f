//! Pipeline stages.
//!
//! Each stage reads the artifact written by the previous one and persists its
//! own output before returning, so stages can be run one at a time or chained
//! by `run-pipeline`.

use anyhow::Context;
use launchrisk_data::{Normalizer, RawTable, table};
use launchrisk_features::{
    EngineeredRecord, EngineeredSet, FeatureEngine, FeatureVector, FittedArtifacts, processed,
};
use launchrisk_model::{Evaluation, LogisticModel, ModelArtifact, evaluate, stratified_split};
use tracing::{info, warn};

use crate::config::Config;

/// Normalizes the raw input and writes the cleaned records.
pub(crate) fn preprocess(config: &Config) -> anyhow::Result<usize> {
    let paths = &config.paths;
    let table = RawTable::open(&paths.raw_data)?;
    let normalized = Normalizer::default()
        .normalize(&table)
        .with_context(|| format!("Invalid raw data: {}", paths.raw_data.display()))?;

    let report = &normalized.report;
    for warning in report.warnings() {
        warn!("{warning}");
    }
    info!(
        rows_read = report.rows_read,
        rows_kept = report.rows_kept,
        rows_dropped = report.rows_dropped(),
        rockets_filled = report.rockets_filled,
        "preprocessed raw data"
    );

    table::write_records(&paths.processed_data, &normalized.records)?;
    info!(path = %paths.processed_data.display(), "saved cleaned records");
    Ok(normalized.records.len())
}

/// Fits features on the cleaned records and writes the processed table plus
/// the fitted artifacts.
pub(crate) fn engineer(config: &Config) -> anyhow::Result<EngineeredSet> {
    let paths = &config.paths;
    let records = table::read_records(&paths.processed_data)?;
    let set = FeatureEngine::new(config.features)
        .fit_transform(&records)
        .with_context(|| format!("Failed to fit features on {}", paths.processed_data.display()))?;

    processed::write_processed(&paths.processed_data, &set.rows)?;
    set.artifacts.save(&paths.feature_artifacts)?;
    info!(
        rows = set.rows.len(),
        companies = set.artifacts.encodings.company.len(),
        rockets = set.artifacts.encodings.rocket.len(),
        processed = %paths.processed_data.display(),
        artifacts = %paths.feature_artifacts.display(),
        "engineered features"
    );
    Ok(set)
}

/// Trains on a stratified split of the processed table and saves the model
/// with its hold-out metrics.
pub(crate) fn train(config: &Config) -> anyhow::Result<ModelArtifact> {
    let tables = FittedArtifacts::load(&config.paths.feature_artifacts)?;
    let rows = load_processed(config)?;
    let (features, labels) = split_columns(&rows);
    let model_config = &config.model;

    let split = stratified_split(&labels, model_config.test_fraction, model_config.seed);
    let pick = |indices: &[usize]| -> (Vec<FeatureVector>, Vec<bool>) {
        indices.iter().map(|&i| (features[i], labels[i])).unzip()
    };
    let (train_x, train_y) = pick(&split.train);
    let (test_x, test_y) = pick(&split.test);
    info!(
        train = train_x.len(),
        test = test_x.len(),
        seed = model_config.seed,
        "split processed data"
    );

    let model = LogisticModel::fit(&model_config.training, &train_x, &train_y)
        .context("Failed to train classifier")?;

    let mut artifact = ModelArtifact::new(
        &model_config.version,
        model,
        train_x.len(),
        tables.fitted_at,
    );
    artifact.holdout = evaluate(&artifact.model, &test_x, &test_y);
    match &artifact.holdout {
        Some(holdout) => info!(%holdout, "hold-out evaluation"),
        None => warn!("hold-out set is empty; no metrics recorded"),
    }

    artifact.save(&config.paths.model)?;
    info!(
        path = %config.paths.model.display(),
        version = %artifact.version,
        "saved model"
    );
    Ok(artifact)
}

/// Evaluates the saved model on the whole processed table.
pub(crate) fn evaluate_model(config: &Config) -> anyhow::Result<Evaluation> {
    let artifact = ModelArtifact::load(&config.paths.model)?;
    let rows = load_processed(config)?;
    let (features, labels) = split_columns(&rows);
    let evaluation = evaluate(&artifact.model, &features, &labels)
        .context("Processed data set is empty")?;
    info!(%evaluation, version = %artifact.version, "evaluated model on processed data");
    Ok(evaluation)
}

pub(crate) fn load_processed(config: &Config) -> anyhow::Result<Vec<EngineeredRecord>> {
    let rows = processed::read_processed(&config.paths.processed_data)?;
    anyhow::ensure!(
        !rows.is_empty(),
        "Processed data is empty: {}",
        config.paths.processed_data.display()
    );
    Ok(rows)
}

pub(crate) fn load_artifacts(config: &Config) -> anyhow::Result<(FittedArtifacts, ModelArtifact)> {
    let artifacts = FittedArtifacts::load(&config.paths.feature_artifacts)?;
    let model = ModelArtifact::load(&config.paths.model)?;
    model.check_tables(&artifacts).with_context(|| {
        format!(
            "{} does not belong to {}",
            config.paths.feature_artifacts.display(),
            config.paths.model.display()
        )
    })?;
    Ok((artifacts, model))
}

fn split_columns(rows: &[EngineeredRecord]) -> (Vec<FeatureVector>, Vec<bool>) {
    rows.iter().map(|r| (r.features, r.record.failure)).unzip()
}

#[cfg(test)]
pub(crate) mod tests {
    use std::{fmt::Write as _, fs, path::Path};

    use launchrisk_features::FeatureId;

    use super::*;

    /// Writes a small raw launch file and returns a config rooted at `dir`.
    pub(crate) fn fixture(dir: &Path) -> Config {
        let mut csv = String::from(
            " Company Name ,Location, Rocket,Datum,Status Mission\n",
        );
        let sites = [
            ("SpaceX", "LC-39A, Kennedy Space Center, Florida, USA", "Falcon 9", 10),
            ("ISRO", "Satish Dhawan Space Centre, India", "PSLV", 4),
            ("Rocket Lab", "Rocket Lab LC-1A, New Zealand", "Electron", 3),
        ];
        for year in 2000..2020 {
            for (company, site, rocket, fail_every) in sites {
                let status = if year % fail_every == 0 { "Failure" } else { "Success" };
                writeln!(
                    csv,
                    "{company},\"{site}\",{rocket},{year}-08-07 05:12:00,{status}"
                )
                .unwrap();
            }
        }
        // dropped: no location, unparseable date
        csv.push_str("SpaceX,,Falcon 9,2020-08-07 05:12:00,Success\n");
        csv.push_str("ISRO,\"Satish Dhawan Space Centre, India\",PSLV,someday,Success\n");

        let raw = dir.join("data/raw/space_missions.csv");
        fs::create_dir_all(raw.parent().unwrap()).unwrap();
        fs::write(&raw, csv).unwrap();

        let mut config = Config::default();
        let paths = &mut config.paths;
        paths.raw_data = raw;
        paths.processed_data = dir.join("data/processed/cleaned_data.csv");
        paths.feature_artifacts = dir.join("models/feature_artifacts.json");
        paths.model = dir.join("models/model.json");
        paths.audit_log = dir.join("logs/prediction_audit_log.csv");
        paths.report_dir = dir.join("reports");
        config.model.training.epochs = 200;
        config
    }

    /// Runs every stage on the fixture.
    pub(crate) fn trained(dir: &Path) -> Config {
        let config = fixture(dir);
        preprocess(&config).unwrap();
        engineer(&config).unwrap();
        train(&config).unwrap();
        config
    }

    #[test]
    fn test_stages_chain() {
        let dir = tempfile::tempdir().unwrap();
        let config = fixture(dir.path());

        assert_eq!(preprocess(&config).unwrap(), 60);
        let set = engineer(&config).unwrap();
        assert_eq!(set.rows.len(), 60);
        assert!(config.paths.feature_artifacts.exists());

        let rows = load_processed(&config).unwrap();
        assert_eq!(rows.len(), 60);
        assert_eq!(rows[0].features.get(FeatureId::CompanyCode), 2.0);

        let artifact = train(&config).unwrap();
        assert_eq!(artifact.training_size, 44);
        assert!(artifact.holdout.is_some());

        let evaluation = evaluate_model(&config).unwrap();
        assert_eq!(evaluation.samples, 60);
        assert!((0.0..=1.0).contains(&evaluation.accuracy));
    }

    #[test]
    fn test_refitted_tables_do_not_pair_with_old_model() {
        let dir = tempfile::tempdir().unwrap();
        let config = trained(dir.path());
        assert!(load_artifacts(&config).is_ok());

        let mut raw = fs::read_to_string(&config.paths.raw_data).unwrap();
        raw.push_str("Arianespace,\"ELA-3, Guiana Space Centre, French Guiana\",Ariane 5,2019-09-07 05:12:00,Success\n");
        fs::write(&config.paths.raw_data, raw).unwrap();
        preprocess(&config).unwrap();
        engineer(&config).unwrap();

        let err = load_artifacts(&config).unwrap_err();
        assert!(err.downcast_ref::<launchrisk_model::ArtifactMismatch>().is_some(), "{err:#}");

        train(&config).unwrap();
        assert!(load_artifacts(&config).is_ok());
    }

    #[test]
    fn test_engineer_requires_preprocess() {
        let dir = tempfile::tempdir().unwrap();
        let config = fixture(dir.path());
        assert!(engineer(&config).is_err());
    }
}
