//! CSV tables: raw launch input and the cleaned record artifact.

use std::{
    fs,
    io,
    path::{Path, PathBuf},
};

use crate::record::LaunchRecord;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum TableError {
    #[display("failed to read table {}", path.display())]
    Read { path: PathBuf, source: csv::Error },
    #[display("failed to write table {}", path.display())]
    Write { path: PathBuf, source: csv::Error },
    #[display("failed to create directory for {}", path.display())]
    CreateDir { path: PathBuf, source: io::Error },
}

/// An untyped table: trimmed headers plus raw cell strings.
///
/// Rows may be ragged; missing trailing cells read as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Reads a CSV file with a header row.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Read`] if the file cannot be opened or parsed.
    pub fn open<P>(path: P) -> Result<Self, TableError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let wrap = |source| TableError::Read {
            path: path.to_owned(),
            source,
        };
        let reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(wrap)?;
        Self::from_csv_reader(reader).map_err(wrap)
    }

    /// Reads a CSV table from any reader.
    ///
    /// # Errors
    ///
    /// Returns the underlying CSV error on malformed input.
    pub fn from_reader<R>(reader: R) -> Result<Self, csv::Error>
    where
        R: io::Read,
    {
        Self::from_csv_reader(csv::ReaderBuilder::new().flexible(true).from_reader(reader))
    }

    fn from_csv_reader<R>(mut reader: csv::Reader<R>) -> Result<Self, csv::Error>
    where
        R: io::Read,
    {
        let headers = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_owned())
            .collect();
        let rows = reader
            .records()
            .map(|record| Ok(record?.iter().map(str::to_owned).collect()))
            .collect::<Result<_, csv::Error>>()?;
        Ok(Self { headers, rows })
    }

    /// Cell at (`row`, `column`), or `""` when the row is short.
    #[must_use]
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map_or("", String::as_str)
    }
}

/// Writes cleaned records to `path`, creating parent directories.
///
/// # Errors
///
/// Returns [`TableError`] if the directory or file cannot be written.
pub fn write_records<P>(path: P, records: &[LaunchRecord]) -> Result<(), TableError>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    create_parent_dir(path)?;
    let wrap = |source| TableError::Write {
        path: path.to_owned(),
        source,
    };
    let mut writer = csv::Writer::from_path(path).map_err(wrap)?;
    for record in records {
        writer.serialize(record).map_err(wrap)?;
    }
    writer.flush().map_err(|e| wrap(e.into()))?;
    Ok(())
}

/// Reads cleaned records previously written by [`write_records`].
///
/// # Errors
///
/// Returns [`TableError::Read`] if the file is missing or a row does not
/// match the canonical schema.
pub fn read_records<P>(path: P) -> Result<Vec<LaunchRecord>, TableError>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let wrap = |source| TableError::Read {
        path: path.to_owned(),
        source,
    };
    let mut reader = csv::Reader::from_path(path).map_err(wrap)?;
    reader
        .deserialize()
        .collect::<Result<Vec<LaunchRecord>, _>>()
        .map_err(wrap)
}

/// Creates the parent directory of `path` if it has one.
///
/// # Errors
///
/// Returns [`TableError::CreateDir`] when the directory cannot be created.
pub fn create_parent_dir(path: &Path) -> Result<(), TableError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|source| TableError::CreateDir {
                path: path.to_owned(),
                source,
            })
        }
        _ => Ok(()),
    }
}
