//! Persisted model artifact.
//!
//! The artifact records the fitted [`LogisticModel`] together with the
//! feature schema it was trained against, a version label, the training
//! timestamp, and the hold-out metrics. Loading refuses artifacts whose
//! feature names differ from the compiled schema.
//!
//! The model also remembers when the feature tables it was trained on were
//! fitted. [`ModelArtifact::check_tables`] refuses to pair it with tables from
//! a later (or earlier) feature engineering run, since codes and group
//! statistics shift between fits.

use std::{
    fs::{self, File},
    io::{self, BufReader, BufWriter, Write as _},
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use launchrisk_features::{
    FittedArtifacts,
    schema::{self, SchemaMismatch},
};
use serde::{Deserialize, Serialize};

use crate::{evaluation::Evaluation, logistic::LogisticModel};

/// Version label used when none is configured.
pub const DEFAULT_MODEL_VERSION: &str = "v1.0.0";

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ModelLoadError {
    #[display("failed to access model file {}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[display("failed to parse model file {}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[display("model {} does not match the feature schema", path.display())]
    Schema { path: PathBuf, source: SchemaMismatch },
    #[display("model {} has malformed weights", path.display())]
    Malformed { path: PathBuf },
}

/// The model and the loaded feature tables come from different fits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display(
    "model was trained on feature tables fitted at {trained_on}, but the loaded tables were fitted at {loaded}; re-run training"
)]
pub struct ArtifactMismatch {
    pub trained_on: DateTime<Utc>,
    pub loaded: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub version: String,
    pub trained_at: DateTime<Utc>,
    /// `fitted_at` of the feature tables the training rows were built with.
    pub features_fitted_at: DateTime<Utc>,
    pub feature_names: Vec<String>,
    pub training_size: usize,
    pub holdout: Option<Evaluation>,
    pub model: LogisticModel,
}

impl ModelArtifact {
    #[must_use]
    pub fn new(
        version: impl Into<String>,
        model: LogisticModel,
        training_size: usize,
        features_fitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            version: version.into(),
            trained_at: Utc::now(),
            features_fitted_at,
            feature_names: schema::feature_names(),
            training_size,
            holdout: None,
            model,
        }
    }

    /// Checks that `tables` are the fitted tables this model was trained on.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactMismatch`] when the tables come from another fit.
    pub fn check_tables(&self, tables: &FittedArtifacts) -> Result<(), ArtifactMismatch> {
        if tables.fitted_at == self.features_fitted_at {
            Ok(())
        } else {
            Err(ArtifactMismatch {
                trained_on: self.features_fitted_at,
                loaded: tables.fitted_at,
            })
        }
    }

    /// Writes the artifact as pretty JSON, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`ModelLoadError::Io`] or [`ModelLoadError::Parse`] on failure.
    pub fn save<P>(&self, path: P) -> Result<(), ModelLoadError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let io_err = |source| ModelLoadError::Io {
            path: path.to_owned(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let mut writer = BufWriter::new(File::create(path).map_err(io_err)?);
        serde_json::to_writer_pretty(&mut writer, self).map_err(|source| {
            ModelLoadError::Parse {
                path: path.to_owned(),
                source,
            }
        })?;
        writeln!(writer).map_err(io_err)?;
        writer.flush().map_err(io_err)
    }

    /// Loads and validates an artifact written by [`ModelArtifact::save`].
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or parsed, if its feature list differs
    /// from the compiled schema, or if its weight vectors are malformed.
    pub fn load<P>(path: P) -> Result<Self, ModelLoadError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ModelLoadError::Io {
            path: path.to_owned(),
            source,
        })?;
        let artifact: Self =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| {
                ModelLoadError::Parse {
                    path: path.to_owned(),
                    source,
                }
            })?;
        schema::check_feature_names(&artifact.feature_names).map_err(|source| {
            ModelLoadError::Schema {
                path: path.to_owned(),
                source,
            }
        })?;
        if !artifact.model.is_well_formed() {
            return Err(ModelLoadError::Malformed {
                path: path.to_owned(),
            });
        }
        Ok(artifact)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;
    use launchrisk_data::LaunchRecord;
    use launchrisk_features::{FEATURE_COUNT, FeatureEngine};

    use super::*;
    use crate::logistic::Standardizer;

    fn model() -> LogisticModel {
        LogisticModel {
            standardizers: vec![
                Standardizer {
                    mean: 0.5,
                    std_dev: 2.0,
                };
                FEATURE_COUNT
            ],
            weights: vec![0.25; FEATURE_COUNT],
            intercept: -1.0,
        }
    }

    fn fitted_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap()
    }

    fn tables() -> FittedArtifacts {
        let records = (0..6)
            .map(|i| {
                let date = Utc.with_ymd_and_hms(2000 + i, 1, 1, 0, 0, 0).unwrap();
                LaunchRecord::new("CASC", "Xichang", "Long March 3", "Success", date, i == 0)
            })
            .collect::<Vec<_>>();
        FeatureEngine::default().fit_transform(&records).unwrap().artifacts
    }

    #[test]
    fn test_check_tables_requires_same_fit() {
        let mut tables = tables();
        let artifact = ModelArtifact::new("v1", model(), 10, tables.fitted_at);
        assert!(artifact.check_tables(&tables).is_ok());

        tables.fitted_at += chrono::Duration::seconds(1);
        let err = artifact.check_tables(&tables).unwrap_err();
        assert_eq!(err.loaded, tables.fitted_at);
        assert!(err.to_string().contains("re-run training"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("models/model.json");
        let artifact = ModelArtifact::new(DEFAULT_MODEL_VERSION, model(), 120, fitted_at());
        artifact.save(&path).unwrap();

        let loaded = ModelArtifact::load(&path).unwrap();
        assert_eq!(loaded, artifact);
        assert_eq!(loaded.version, "v1.0.0");
    }

    #[test]
    fn test_load_rejects_schema_drift() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let mut artifact = ModelArtifact::new("v2", model(), 10, fitted_at());
        artifact.feature_names.swap(0, 1);
        artifact.save(&path).unwrap();

        let err = ModelArtifact::load(&path).unwrap_err();
        assert!(matches!(err, ModelLoadError::Schema { .. }), "{err}");
    }

    #[test]
    fn test_load_rejects_malformed_weights() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let mut artifact = ModelArtifact::new("v2", model(), 10, fitted_at());
        artifact.model.weights.pop();
        artifact.save(&path).unwrap();

        let err = ModelArtifact::load(&path).unwrap_err();
        assert!(matches!(err, ModelLoadError::Malformed { .. }), "{err}");
    }

    #[test]
    fn test_load_missing_file() {
        let err = ModelArtifact::load("/nonexistent/model.json").unwrap_err();
        assert!(matches!(err, ModelLoadError::Io { .. }));
    }
}
