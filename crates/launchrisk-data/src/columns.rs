//! Semantic column roles and header resolution.
//!
//! Source tables name their columns inconsistently (`"Company Name"` vs
//! `"company"`, stray surrounding whitespace, ...). Each required column has a
//! fixed [`ColumnRole`] and a list of accepted spellings. Headers are compared
//! after trimming, lowercasing, and dropping every non-alphanumeric character.

use std::fmt;

/// The five columns a launch table must provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ColumnRole {
    Company,
    Location,
    Rocket,
    MissionStatus,
    LaunchDate,
}

impl ColumnRole {
    pub const ALL: [Self; 5] = [
        Self::Company,
        Self::Location,
        Self::Rocket,
        Self::MissionStatus,
        Self::LaunchDate,
    ];

    /// Name of the column in the canonical (processed) schema.
    #[must_use]
    pub fn canonical_name(self) -> &'static str {
        match self {
            Self::Company => "company",
            Self::Location => "location",
            Self::Rocket => "rocket",
            Self::MissionStatus => "mission_status",
            Self::LaunchDate => "launch_date",
        }
    }

    /// Header spellings accepted for this role, in folded form.
    fn accepted_keys(self) -> &'static [&'static str] {
        match self {
            Self::Company => &["companyname", "company", "organisation", "organization"],
            Self::Location => &["location", "launchsite"],
            Self::Rocket => &["rocket", "rocketname", "vehicle"],
            Self::MissionStatus => &["statusmission", "missionstatus", "status"],
            Self::LaunchDate => &["datum", "date", "launchdate"],
        }
    }
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

/// Required columns could not be located in a table header.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display(
    "missing required columns [{}]; found columns [{}]",
    join(missing),
    found.join(", ")
)]
pub struct SchemaError {
    pub missing: Vec<ColumnRole>,
    pub found: Vec<String>,
}

fn join(roles: &[ColumnRole]) -> String {
    roles
        .iter()
        .copied()
        .map(ColumnRole::canonical_name)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Column index for every [`ColumnRole`] of one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    indices: [usize; ColumnRole::ALL.len()],
}

impl ColumnMap {
    /// Resolves every role against `headers`.
    ///
    /// The first header matching a role wins. All missing roles are reported
    /// together rather than one at a time.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] listing every role without a matching header.
    pub fn resolve<S>(headers: &[S]) -> Result<Self, SchemaError>
    where
        S: AsRef<str>,
    {
        let folded = headers
            .iter()
            .map(|h| fold_header(h.as_ref()))
            .collect::<Vec<_>>();

        let mut indices = [0; ColumnRole::ALL.len()];
        let mut missing = vec![];
        for (slot, role) in indices.iter_mut().zip(ColumnRole::ALL) {
            let found = folded
                .iter()
                .position(|h| role.accepted_keys().contains(&h.as_str()));
            match found {
                Some(idx) => *slot = idx,
                None => missing.push(role),
            }
        }

        if !missing.is_empty() {
            return Err(SchemaError {
                missing,
                found: headers.iter().map(|h| h.as_ref().trim().to_owned()).collect(),
            });
        }
        Ok(Self { indices })
    }

    /// Index of the column holding `role`.
    #[must_use]
    pub fn index(&self, role: ColumnRole) -> usize {
        self.indices[role as usize]
    }
}

fn fold_header(header: &str) -> String {
    header
        .trim()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
