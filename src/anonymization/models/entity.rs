//! Entity category data model

use crate::domain::errors::RraError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Privacy-sensitive entity categories recognised in Dutch clinical reports
///
/// Every category maps to exactly one placeholder token. The tokens are the
/// contract with downstream consumers (annotation tools, evaluation sets) and
/// must never change silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityCategory {
    /// Person names, including titles and initials
    Person,
    /// Calendar dates (numeric and textual)
    Date,
    /// Times of day
    Time,
    /// Internal (beeper) phone numbers
    InternalPhone,
    /// Seven-digit patient numbers
    PatientId,
    /// Personnel numbers starting with a `z`
    ZNumber,
    /// Report identifiers such as `T 14-15616`
    ReportId,
    /// Dutch city names preceded by a preposition
    Location,
}

impl EntityCategory {
    /// All categories in detector order
    pub const ALL: [EntityCategory; 8] = [
        Self::Person,
        Self::Date,
        Self::Time,
        Self::InternalPhone,
        Self::PatientId,
        Self::ZNumber,
        Self::ReportId,
        Self::Location,
    ];

    /// Placeholder token substituted for a span of this category
    pub fn placeholder(&self) -> &'static str {
        match self {
            Self::Person => "<PERSOON>",
            Self::Date => "<DATUM>",
            Self::Time => "<TIJD>",
            Self::InternalPhone => "<TELEFOONNUMMER>",
            Self::PatientId => "<PATIENTNUMMER>",
            Self::ZNumber => "<ZNUMMER>",
            Self::ReportId => "<RAPPORT_ID>",
            Self::Location => "<PLAATS>",
        }
    }

    /// Get human-readable label for the category
    pub fn label(&self) -> &'static str {
        match self {
            Self::Person => "PERSON",
            Self::Date => "DATE",
            Self::Time => "TIME",
            Self::InternalPhone => "INTERNAL_PHONE",
            Self::PatientId => "PATIENT_ID",
            Self::ZNumber => "Z_NUMBER",
            Self::ReportId => "REPORT_ID",
            Self::Location => "LOCATION",
        }
    }

    /// Name used on the command line and in configuration files
    pub fn config_name(&self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::Date => "date",
            Self::Time => "time",
            Self::InternalPhone => "internal_phone_number",
            Self::PatientId => "patient_id",
            Self::ZNumber => "z_number",
            Self::ReportId => "report_id",
            Self::Location => "location",
        }
    }

    /// Resolve a placeholder token back to its category
    ///
    /// Accepts the token with or without angle brackets (`<PERSOON>` or `PERSOON`).
    pub fn from_placeholder(token: &str) -> Option<Self> {
        let bare = token.trim().trim_start_matches('<').trim_end_matches('>');
        Self::ALL
            .into_iter()
            .find(|c| c.placeholder().trim_matches(|ch| ch == '<' || ch == '>') == bare)
    }

    /// Comma-separated list of supported configuration names
    pub fn supported_names() -> String {
        Self::ALL
            .iter()
            .map(|c| c.config_name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for EntityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EntityCategory {
    type Err = RraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.config_name() == wanted || c.label().to_lowercase() == wanted)
            .ok_or_else(|| RraError::UnknownCategory {
                name: s.to_string(),
                supported: Self::supported_names(),
            })
    }
}

/// Set of categories whose detectors take part in a run
///
/// Iteration follows [`EntityCategory::ALL`] order, which keeps detector output
/// order stable regardless of how the set was built.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnabledCategories(BTreeSet<EntityCategory>);

impl EnabledCategories {
    /// Every category enabled
    pub fn all() -> Self {
        Self(EntityCategory::ALL.into_iter().collect())
    }

    /// No category enabled
    pub fn none() -> Self {
        Self(BTreeSet::new())
    }

    /// Parse configuration names, failing on the first unknown name
    pub fn from_names<I, S>(names: I) -> Result<Self, RraError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = BTreeSet::new();
        for name in names {
            set.insert(name.as_ref().parse::<EntityCategory>()?);
        }
        Ok(Self(set))
    }

    /// Check whether a category is enabled
    pub fn contains(&self, category: EntityCategory) -> bool {
        self.0.contains(&category)
    }

    /// Enable a category
    pub fn insert(&mut self, category: EntityCategory) {
        self.0.insert(category);
    }

    /// Iterate enabled categories in detector order
    pub fn iter(&self) -> impl Iterator<Item = EntityCategory> + '_ {
        self.0.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl FromIterator<EntityCategory> for EnabledCategories {
    fn from_iter<T: IntoIterator<Item = EntityCategory>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
