//! Fitted feature artifacts and their persistence.
//!
//! [`FittedArtifacts`] bundles everything the feature engine learned from one
//! full batch: the encoding tables, the aggregate snapshot, and the expanding
//! history snapshot. It is immutable once fitted and is passed explicitly into
//! every single-row transform. It is stored as JSON next to the trained model
//! so inference always reuses the exact tables the model was trained against.

use std::{
    fs::{self, File},
    io::{self, BufReader, BufWriter, Write as _},
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    aggregate::AggregateStats,
    encoding::{CategoricalColumn, EncodingTables},
    expanding::ExpandingHistory,
    schema::{self, SchemaMismatch},
};

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ArtifactError {
    #[display("failed to access artifact file {}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[display("failed to parse artifact file {}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[display("artifact {} does not match the feature schema", path.display())]
    Schema { path: PathBuf, source: SchemaMismatch },
    #[display("artifact {} is inconsistent: {reason}", path.display())]
    Inconsistent { path: PathBuf, reason: String },
}

/// Everything fitted by one feature engineering run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedArtifacts {
    /// Feature names in vector order at fit time.
    pub feature_names: Vec<String>,
    pub fitted_at: DateTime<Utc>,
    pub encodings: EncodingTables,
    pub aggregates: AggregateStats,
    pub history: ExpandingHistory,
}

impl FittedArtifacts {
    /// Checks internal invariants that deserialization alone cannot enforce.
    ///
    /// # Errors
    ///
    /// Returns a description of the first violated invariant.
    pub fn check_consistency(&self) -> Result<(), String> {
        for column in [
            CategoricalColumn::Company,
            CategoricalColumn::Location,
            CategoricalColumn::Rocket,
        ] {
            let table = self.encodings.get(column);
            if table.column() != column {
                return Err(format!("{column} table is labelled {}", table.column()));
            }
            if !table.is_well_formed() {
                return Err(format!("{column} categories are not strictly sorted"));
            }
        }

        let companies = self.encodings.company.categories();
        if !companies.iter().eq(self.aggregates.by_company.keys()) {
            return Err("company encodings and company statistics differ".to_owned());
        }
        if !companies.iter().eq(self.history.latest_by_company.keys()) {
            return Err("company encodings and expanding history differ".to_owned());
        }
        if !self
            .encodings
            .rocket
            .categories()
            .iter()
            .eq(self.aggregates.by_rocket.keys())
        {
            return Err("rocket encodings and rocket statistics differ".to_owned());
        }
        Ok(())
    }

    /// Writes the artifacts as pretty JSON, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactError::Io`] or [`ArtifactError::Parse`] on failure.
    pub fn save<P>(&self, path: P) -> Result<(), ArtifactError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let io_err = |source| ArtifactError::Io {
            path: path.to_owned(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let mut writer = BufWriter::new(File::create(path).map_err(io_err)?);
        serde_json::to_writer_pretty(&mut writer, self).map_err(|source| ArtifactError::Parse {
            path: path.to_owned(),
            source,
        })?;
        writeln!(writer).map_err(io_err)?;
        writer.flush().map_err(io_err)
    }

    /// Loads and validates artifacts written by [`FittedArtifacts::save`].
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or parsed, if its feature list differs
    /// from the compiled schema, or if its tables are inconsistent.
    pub fn load<P>(path: P) -> Result<Self, ArtifactError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ArtifactError::Io {
            path: path.to_owned(),
            source,
        })?;
        let artifacts: Self =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| ArtifactError::Parse {
                path: path.to_owned(),
                source,
            })?;
        schema::check_feature_names(&artifacts.feature_names).map_err(|source| {
            ArtifactError::Schema {
                path: path.to_owned(),
                source,
            }
        })?;
        artifacts
            .check_consistency()
            .map_err(|reason| ArtifactError::Inconsistent {
                path: path.to_owned(),
                reason,
            })?;
        Ok(artifacts)
    }
}
