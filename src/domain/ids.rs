//! Report identifier type

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Report identifier newtype wrapper
///
/// Derived from an external identifier tag (`StudyInstanceUID`, `filename`) when
/// the input carries one, otherwise from the position of the report in its batch.
///
/// # Examples
///
/// ```
/// use rra::domain::ids::ReportId;
/// use std::str::FromStr;
///
/// let id = ReportId::from_str("1.2.840.113619.2.55").unwrap();
/// assert_eq!(id.as_str(), "1.2.840.113619.2.55");
///
/// let id = ReportId::from_index(7);
/// assert_eq!(id.as_str(), "7");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportId(String);

impl ReportId {
    /// Creates a new ReportId from a string
    ///
    /// Returns `Err` when the identifier is empty or whitespace only.
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Report ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Creates a sequential identifier from a batch index
    pub fn from_index(index: usize) -> Self {
        Self(index.to_string())
    }

    /// Returns the report ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ReportId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for ReportId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_id_valid() {
        let id = ReportId::new("report_001").unwrap();
        assert_eq!(id.as_str(), "report_001");
        assert_eq!(id.to_string(), "report_001");
    }

    #[test]
    fn test_report_id_empty() {
        assert!(ReportId::new("").is_err());
        assert!(ReportId::new("   ").is_err());
    }

    #[test]
    fn test_report_id_serializes_as_plain_string() {
        let id = ReportId::new("abc").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc\"");
    }
}
