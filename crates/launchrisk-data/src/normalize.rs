//! Raw table to canonical [`LaunchRecord`] normalization.

use tracing::{debug, warn};

use crate::{
    columns::{ColumnMap, ColumnRole, SchemaError},
    date,
    record::LaunchRecord,
    table::RawTable,
};

/// Mission status value that marks a launch as successful.
pub const SUCCESS_STATUS: &str = "Success";

/// Rocket name substituted when the rocket cell is empty.
pub const UNKNOWN_ROCKET: &str = "Unknown";

/// Counts of what happened to each input row.
///
/// A row is counted under the first drop reason that applies, checked in the
/// order company, location, date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizationReport {
    pub rows_read: usize,
    pub rows_kept: usize,
    pub dropped_missing_company: usize,
    pub dropped_missing_location: usize,
    pub dropped_missing_date: usize,
    pub dropped_unparseable_date: usize,
    /// Kept rows whose rocket was replaced with [`UNKNOWN_ROCKET`].
    pub rockets_filled: usize,
}

impl NormalizationReport {
    #[must_use]
    pub fn rows_dropped(&self) -> usize {
        self.dropped_missing_company
            + self.dropped_missing_location
            + self.dropped_missing_date
            + self.dropped_unparseable_date
    }

    /// Human-readable warnings for every non-zero drop or fill count.
    #[must_use]
    pub fn warnings(&self) -> Vec<String> {
        [
            (self.dropped_missing_company, "dropped: missing company"),
            (self.dropped_missing_location, "dropped: missing location"),
            (self.dropped_missing_date, "dropped: missing launch date"),
            (self.dropped_unparseable_date, "dropped: unparseable launch date"),
            (self.rockets_filled, "rocket filled with \"Unknown\""),
        ]
        .into_iter()
        .filter(|(count, _)| *count > 0)
        .map(|(count, reason)| format!("{count} rows {reason}"))
        .collect()
    }
}

/// Records that survived normalization, plus the accounting for the rest.
#[derive(Debug, Clone)]
pub struct NormalizedRecords {
    pub records: Vec<LaunchRecord>,
    pub report: NormalizationReport,
}

/// Converts raw launch tables into canonical records.
#[derive(Debug, Clone)]
pub struct Normalizer {
    success_status: String,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(SUCCESS_STATUS)
    }
}

enum RowOutcome {
    Kept(LaunchRecord, bool),
    MissingCompany,
    MissingLocation,
    MissingDate,
    UnparseableDate,
}

impl Normalizer {
    /// Creates a normalizer that treats `success_status` as the only
    /// successful mission status.
    #[must_use]
    pub fn new(success_status: impl Into<String>) -> Self {
        Self {
            success_status: success_status.into(),
        }
    }

    /// Normalizes every row of `table`.
    ///
    /// Cells are trimmed. The failure flag is `status != success_status` by
    /// exact string comparison, so an empty status counts as a failure.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] before touching any row if a required column is
    /// missing from the header.
    pub fn normalize(&self, table: &RawTable) -> Result<NormalizedRecords, SchemaError> {
        let columns = ColumnMap::resolve(&table.headers)?;

        let mut report = NormalizationReport {
            rows_read: table.rows.len(),
            ..NormalizationReport::default()
        };
        let mut records = Vec::with_capacity(table.rows.len());
        for row in 0..table.rows.len() {
            match self.normalize_row(table, &columns, row) {
                RowOutcome::Kept(record, rocket_filled) => {
                    if rocket_filled {
                        report.rockets_filled += 1;
                    }
                    records.push(record);
                }
                RowOutcome::MissingCompany => report.dropped_missing_company += 1,
                RowOutcome::MissingLocation => report.dropped_missing_location += 1,
                RowOutcome::MissingDate => report.dropped_missing_date += 1,
                RowOutcome::UnparseableDate => {
                    debug!(
                        row,
                        value = table.cell(row, columns.index(ColumnRole::LaunchDate)),
                        "unparseable launch date"
                    );
                    report.dropped_unparseable_date += 1;
                }
            }
        }
        report.rows_kept = records.len();

        for warning in report.warnings() {
            warn!("{warning}");
        }
        Ok(NormalizedRecords { records, report })
    }

    fn normalize_row(&self, table: &RawTable, columns: &ColumnMap, row: usize) -> RowOutcome {
        let cell = |role| table.cell(row, columns.index(role)).trim();

        let company = cell(ColumnRole::Company);
        if company.is_empty() {
            return RowOutcome::MissingCompany;
        }
        let location = cell(ColumnRole::Location);
        if location.is_empty() {
            return RowOutcome::MissingLocation;
        }
        let raw_date = cell(ColumnRole::LaunchDate);
        if raw_date.is_empty() {
            return RowOutcome::MissingDate;
        }
        let Some(launch_date) = date::parse_launch_date(raw_date) else {
            return RowOutcome::UnparseableDate;
        };

        let rocket = cell(ColumnRole::Rocket);
        let rocket_filled = rocket.is_empty();
        let rocket = if rocket_filled { UNKNOWN_ROCKET } else { rocket };

        let status = cell(ColumnRole::MissionStatus);
        let failure = status != self.success_status;
        let record = LaunchRecord::new(company, location, rocket, status, launch_date, failure);
        RowOutcome::Kept(record, rocket_filled)
    }
}
