//! Launch record ingestion and normalization.
//!
//! This crate turns loosely formatted launch tables into canonical
//! [`LaunchRecord`] values that the feature engine consumes.
//!
//! # Overview
//!
//! ```text
//! raw CSV ──read──▶ RawTable ──Normalizer──▶ Vec<LaunchRecord> + NormalizationReport
//!                                                  │
//!                                                  └──write──▶ cleaned CSV
//! ```
//!
//! 1. **Read** ([`table::RawTable`]): load headers and cells verbatim
//! 2. **Resolve columns** ([`columns::ColumnMap`]): map trimmed headers onto the
//!    five semantic roles, failing fast with [`columns::SchemaError`]
//! 3. **Normalize** ([`normalize::Normalizer`]): derive the failure flag, parse
//!    dates, drop incomplete rows and count why
//!
//! # Dropped Rows
//!
//! Rows with a missing company, a missing location, or an absent or
//! unparseable launch date are excluded from the working set. They are never
//! zero-filled. Every exclusion is counted in [`normalize::NormalizationReport`]
//! so callers can surface the counts as warnings.

pub use self::{
    columns::{ColumnMap, ColumnRole, SchemaError},
    normalize::{NormalizationReport, NormalizedRecords, Normalizer},
    record::LaunchRecord,
    table::{RawTable, TableError},
};

pub mod columns;
pub mod date;
pub mod normalize;
pub mod record;
pub mod table;
