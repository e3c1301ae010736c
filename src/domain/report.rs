//! Report model

use super::ids::ReportId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One free-text clinical report
///
/// `metadata` carries whatever the input provided (file name, DICOM tags, ...)
/// and is passed through to the output untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: ReportId,
    pub text: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl Report {
    pub fn new(id: ReportId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            metadata: Map::new(),
        }
    }

    /// Attach a metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// String metadata value, if present
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(Value::as_str)
    }
}
