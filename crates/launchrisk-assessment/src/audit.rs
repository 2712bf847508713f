//! Append-only audit log of scoring requests.
//!
//! The log is a CSV file with one row per request. The header is written only
//! when the file is created (or found empty). Appends from any thread of the
//! process are serialized through one lock, and each row reaches the file in
//! a single write so concurrent writers never interleave partial rows.
//!
//! The lock is not shared between processes. Two processes appending to the
//! same new log at once can both see an empty file and both write a header,
//! so give each concurrently running scorer its own log file.

use std::{
    fs::{self, OpenOptions},
    io::{self, Write as _},
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

static APPEND_LOCK: Mutex<()> = Mutex::new(());

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum AuditError {
    #[display("failed to append to audit log {}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[display("failed to encode audit row for {}", path.display())]
    Encode { path: PathBuf, source: csv::Error },
    #[display("failed to read audit log {}", path.display())]
    Read { path: PathBuf, source: csv::Error },
}

/// One scoring request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// RFC 3339, UTC.
    pub timestamp: String,
    pub company: String,
    pub rocket: String,
    pub launch_year: i32,
    pub predicted_risk_percent: f64,
    pub model_version: String,
}

impl AuditEntry {
    #[must_use]
    pub fn new(
        timestamp: DateTime<Utc>,
        company: impl Into<String>,
        rocket: impl Into<String>,
        launch_year: i32,
        predicted_risk_percent: f64,
        model_version: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            company: company.into(),
            rocket: rocket.into(),
            launch_year,
            predicted_risk_percent,
            model_version: model_version.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    #[must_use]
    pub fn new<P>(path: P) -> Self
    where
        P: Into<PathBuf>,
    {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `entry`, creating the file and its directory on first use.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError`] if the row cannot be encoded or written.
    pub fn append(&self, entry: &AuditEntry) -> Result<(), AuditError> {
        let io_err = |source| AuditError::Io {
            path: self.path.clone(),
            source,
        };
        let _guard = APPEND_LOCK.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(io_err)?;
        let is_new = file.metadata().map_err(io_err)?.len() == 0;

        let row = encode_row(entry, is_new).map_err(|source| AuditError::Encode {
            path: self.path.clone(),
            source,
        })?;
        file.write_all(&row).map_err(io_err)?;
        file.flush().map_err(io_err)
    }

    /// Reads every row back.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Read`] if the file is missing or malformed.
    pub fn read_all(&self) -> Result<Vec<AuditEntry>, AuditError> {
        let read_err = |source| AuditError::Read {
            path: self.path.clone(),
            source,
        };
        csv::Reader::from_path(&self.path)
            .map_err(read_err)?
            .deserialize()
            .collect::<Result<_, _>>()
            .map_err(read_err)
    }
}

fn encode_row(entry: &AuditEntry, with_header: bool) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(with_header)
        .from_writer(vec![]);
    writer.serialize(entry)?;
    writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))
}
