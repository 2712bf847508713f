//! Pipeline configuration.
//!
//! Settings come from three layers, later ones winning: built-in defaults,
//! an optional TOML file (`--config`), and command-line flags.
//!
//! ```toml
//! [paths]
//! raw_data = "data/raw/space_missions.csv"
//! processed_data = "data/processed/cleaned_data.csv"
//! feature_artifacts = "models/feature_artifacts.json"
//! model = "models/model.json"
//! audit_log = "logs/prediction_audit_log.csv"
//! report_dir = "reports"
//!
//! [features]
//! expanding_policy = "exclusive"
//!
//! [model]
//! version = "v1.0.0"
//! seed = 42
//! test_fraction = 0.25
//!
//! [model.training]
//! epochs = 1000
//! learning_rate = 0.1
//! l2 = 0.001
//! ```

use std::{fs, path::{Path, PathBuf}};

use anyhow::Context;
use launchrisk_features::FeatureEngineConfig;
use launchrisk_model::{DEFAULT_MODEL_VERSION, DEFAULT_SEED, TrainingConfig};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Config {
    pub(crate) paths: PathsConfig,
    pub(crate) features: FeatureEngineConfig,
    pub(crate) model: ModelConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct PathsConfig {
    pub(crate) raw_data: PathBuf,
    pub(crate) processed_data: PathBuf,
    pub(crate) feature_artifacts: PathBuf,
    pub(crate) model: PathBuf,
    pub(crate) audit_log: PathBuf,
    pub(crate) report_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            raw_data: PathBuf::from("data/raw/space_missions.csv"),
            processed_data: PathBuf::from("data/processed/cleaned_data.csv"),
            feature_artifacts: PathBuf::from("models/feature_artifacts.json"),
            model: PathBuf::from("models/model.json"),
            audit_log: PathBuf::from("logs/prediction_audit_log.csv"),
            report_dir: PathBuf::from("reports"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ModelConfig {
    pub(crate) version: String,
    pub(crate) seed: u64,
    pub(crate) test_fraction: f64,
    pub(crate) training: TrainingConfig,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            version: DEFAULT_MODEL_VERSION.to_owned(),
            seed: DEFAULT_SEED,
            test_fraction: 0.25,
            training: TrainingConfig::default(),
        }
    }
}

impl Config {
    /// Loads `path`, or the defaults when no file is given.
    pub(crate) fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        anyhow::ensure!(
            (0.0..1.0).contains(&config.model.test_fraction),
            "test_fraction must be in [0, 1), got {}",
            config.model.test_fraction
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use launchrisk_features::ExpandingPolicy;

    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let config = Config::load(None).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.model.version, "v1.0.0");
        assert_eq!(config.model.seed, 42);
        assert_eq!(
            config.paths.audit_log,
            Path::new("logs/prediction_audit_log.csv")
        );
        assert_eq!(config.features.expanding_policy, ExpandingPolicy::Exclusive);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("launchrisk.toml");
        fs::write(
            &path,
            "[features]\nexpanding_policy = \"inclusive\"\n\n[model]\nseed = 7\n\n[model.training]\nepochs = 50\n",
        )
        .unwrap();

        let config = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(config.features.expanding_policy, ExpandingPolicy::Inclusive);
        assert_eq!(config.model.seed, 7);
        assert_eq!(config.model.training.epochs, 50);
        assert_eq!(config.model.training.learning_rate, TrainingConfig::default().learning_rate);
        assert_eq!(config.paths, PathsConfig::default());
    }

    #[test]
    fn test_rejects_unknown_keys_and_bad_fraction() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[paths]\nraw = \"x.csv\"\n").unwrap();
        assert!(Config::load(Some(path.as_path())).is_err());

        fs::write(&path, "[model]\ntest_fraction = 1.5\n").unwrap();
        assert!(Config::load(Some(path.as_path())).is_err());
    }
}
