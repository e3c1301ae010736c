//! Annotation records
//!
//! The JSON Lines exchange format shared with the annotation tool: one object
//! per line with the original `text`, its `labels` as `[start, end, "<TOKEN>"]`
//! triples in character offsets, and free-form `meta`.
//!
//! ```json
//! {"text": "Voorbeeld van Hendrix, Ward.", "labels": [[14, 27, "<PERSOON>"]], "meta": {"filename": "example.txt"}}
//! ```

use crate::anonymization::models::{EntityCategory, RedactionResult, Span, SpanSet};
use crate::anonymization::text::char_len;
use crate::domain::errors::RraError;
use crate::domain::ids::ReportId;
use crate::domain::result::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Metadata keys tried, in order, for the report identity
pub const ID_KEYS: [&str; 2] = ["StudyInstanceUID", "filename"];

/// One `[start, end, placeholder]` triple
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label(pub usize, pub usize, pub String);

impl Label {
    pub fn from_span(span: &Span) -> Self {
        Self(span.start, span.end, span.category.placeholder().to_string())
    }

    pub fn category(&self) -> Option<EntityCategory> {
        EntityCategory::from_placeholder(&self.2)
    }

    pub fn to_span(&self) -> Result<Span> {
        let category = self.category().ok_or_else(|| {
            RraError::Validation(format!("Unknown placeholder '{}'", self.2))
        })?;
        Span::new(self.0, self.1, category)
    }
}

/// Persisted form of a redaction result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    /// Original, unredacted text
    pub text: String,
    pub labels: Vec<Label>,
    #[serde(default)]
    pub meta: Map<String, Value>,
}

impl AnnotationRecord {
    pub fn from_result(result: &RedactionResult, original_text: &str, meta: Map<String, Value>) -> Self {
        Self {
            text: original_text.to_string(),
            labels: result.spans.iter().map(Label::from_span).collect(),
            meta,
        }
    }

    /// Parse and validate one JSON Lines entry (`line` is 1-based)
    pub fn parse_line(input: &str, line: usize) -> Result<Self> {
        let malformed = |reason: String| RraError::MalformedAnnotation { line, reason };

        let value: Value =
            serde_json::from_str(input).map_err(|e| malformed(format!("invalid JSON: {e}")))?;
        let Some(object) = value.as_object() else {
            return Err(malformed("not a JSON object".to_string()));
        };
        for field in ["text", "labels"] {
            if !object.contains_key(field) {
                return Err(malformed(format!("missing field '{field}'")));
            }
        }

        let record: AnnotationRecord =
            serde_json::from_value(value).map_err(|e| malformed(e.to_string()))?;
        record.validate(line)?;
        Ok(record)
    }

    /// Check placeholders, bounds and overlap of all labels
    pub fn validate(&self, line: usize) -> Result<()> {
        let malformed = |reason: String| RraError::MalformedAnnotation { line, reason };
        let len = char_len(&self.text);

        for label in &self.labels {
            if label.category().is_none() {
                return Err(malformed(format!("unknown placeholder '{}'", label.2)));
            }
            if label.0 >= label.1 || label.1 > len {
                return Err(malformed(format!(
                    "label {}..{} out of bounds for text of {} characters",
                    label.0, label.1, len
                )));
            }
        }
        self.spans().map_err(|e| malformed(e.to_string()))?;
        Ok(())
    }

    /// Labels as a span set
    pub fn spans(&self) -> Result<SpanSet> {
        let spans = self
            .labels
            .iter()
            .map(Label::to_span)
            .collect::<Result<Vec<_>>>()?;
        SpanSet::from_unsorted(spans)
    }

    /// Report identity: `StudyInstanceUID`, then `filename`, then `index`
    pub fn report_id(&self, index: usize) -> ReportId {
        ID_KEYS
            .iter()
            .filter_map(|key| self.meta.get(*key))
            .filter_map(|value| match value {
                Value::String(s) => ReportId::new(s.as_str()).ok(),
                Value::Null => None,
                other => ReportId::new(other.to_string()).ok(),
            })
            .next()
            .unwrap_or_else(|| ReportId::from_index(index))
    }

    /// Whether the record carries an explicit identity
    pub fn has_explicit_id(&self) -> bool {
        ID_KEYS.iter().any(|key| self.meta.contains_key(*key))
    }

    pub fn filename(&self) -> Option<&str> {
        self.meta.get("filename").and_then(Value::as_str)
    }

    pub fn to_json_line(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Records read from a JSON Lines document
#[derive(Debug, Default)]
pub struct AnnotationBatch {
    /// Valid records with their 1-based line numbers
    pub records: Vec<(usize, AnnotationRecord)>,
    /// One [`RraError::MalformedAnnotation`] per rejected line
    pub rejected: Vec<RraError>,
}

impl AnnotationBatch {
    pub fn into_records(self) -> Vec<AnnotationRecord> {
        self.records.into_iter().map(|(_, r)| r).collect()
    }
}

/// Parse a JSON Lines document, keeping valid records and rejecting bad lines
pub fn parse_jsonl(content: &str) -> AnnotationBatch {
    let mut batch = AnnotationBatch::default();
    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        if line.trim().is_empty() {
            continue;
        }
        match AnnotationRecord::parse_line(line, line_no) {
            Ok(record) => batch.records.push((line_no, record)),
            Err(e) => {
                tracing::warn!(line = line_no, error = %e, "Rejected annotation line");
                batch.rejected.push(e);
            }
        }
    }
    batch
}
