//! Dense integer codes for categorical columns.
//!
//! Each [`EncodingTable`] is fitted on the distinct values of one column and
//! assigns codes by **sorted unique value**: the lexicographically smallest
//! category gets `0`, the next `1`, and so on. The order depends only on the
//! set of categories, not on row order, so refitting the same corpus always
//! reproduces the same codes.
//!
//! Lookups of categories that were not present at fit time fail with
//! [`UnseenCategory`]. There is no fallback code.

use std::{collections::BTreeSet, fmt};

use serde::{Deserialize, Serialize};

/// A categorical column that is encoded for the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoricalColumn {
    Company,
    Location,
    Rocket,
}

impl CategoricalColumn {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Company => "company",
            Self::Location => "location",
            Self::Rocket => "rocket",
        }
    }
}

impl fmt::Display for CategoricalColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unseen {column} '{value}': not present when the encodings were fitted")]
pub struct UnseenCategory {
    pub column: CategoricalColumn,
    pub value: String,
}

/// Bijection between the categories of one column and `0..len`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodingTable {
    column: CategoricalColumn,
    /// Sorted, deduplicated; a category's code is its index.
    categories: Vec<String>,
}

impl EncodingTable {
    /// Fits a table on every value yielded by `values`.
    #[must_use]
    pub fn fit<'a, I>(column: CategoricalColumn, values: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let categories = values
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_owned)
            .collect();
        Self { column, categories }
    }

    #[must_use]
    pub fn column(&self) -> CategoricalColumn {
        self.column
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Categories in code order.
    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Code assigned to `value`.
    ///
    /// # Errors
    ///
    /// Returns [`UnseenCategory`] if `value` was not seen at fit time.
    pub fn encode(&self, value: &str) -> Result<u32, UnseenCategory> {
        self.categories
            .binary_search_by(|c| c.as_str().cmp(value))
            .ok()
            .and_then(|code| u32::try_from(code).ok())
            .ok_or_else(|| UnseenCategory {
                column: self.column,
                value: value.to_owned(),
            })
    }

    /// Category for `code`, or `None` if the code was never assigned.
    #[must_use]
    pub fn decode(&self, code: u32) -> Option<&str> {
        let index = usize::try_from(code).ok()?;
        self.categories.get(index).map(String::as_str)
    }

    /// Whether the category list is strictly increasing, the invariant that
    /// makes codes a bijection. Checked when tables are loaded from disk.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.categories.is_sorted_by(|a, b| a < b)
    }
}

/// One fitted table per categorical column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodingTables {
    pub company: EncodingTable,
    pub location: EncodingTable,
    pub rocket: EncodingTable,
}

impl EncodingTables {
    #[must_use]
    pub fn get(&self, column: CategoricalColumn) -> &EncodingTable {
        match column {
            CategoricalColumn::Company => &self.company,
            CategoricalColumn::Location => &self.location,
            CategoricalColumn::Rocket => &self.rocket,
        }
    }

    /// Shorthand for `self.get(column).encode(value)`.
    ///
    /// # Errors
    ///
    /// Returns [`UnseenCategory`] if `value` was not seen at fit time.
    pub fn encode(&self, column: CategoricalColumn, value: &str) -> Result<u32, UnseenCategory> {
        self.get(column).encode(value)
    }
}
