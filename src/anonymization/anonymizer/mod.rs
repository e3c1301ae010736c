//! Redaction engine
//!
//! Rewrites a text by substituting each resolved span in a single
//! left-to-right pass over the original offsets. The input text is never
//! mutated; adjacent spans are substituted independently.

pub mod redaction;

pub use redaction::RedactionStrategy;

use crate::anonymization::annotation::AnnotationRecord;
use crate::anonymization::models::{RedactionResult, Span, SpanSet};
use crate::anonymization::text::CharIndex;
use crate::domain::errors::RraError;
use crate::domain::result::Result;

/// Trait for replacement strategies
pub trait Anonymizer: Send + Sync {
    /// Replacement text for a span covering `original`
    fn replacement(&self, span: &Span, original: &str) -> String;
}

/// Redact `text` with category placeholders
pub fn redact(text: &str, spans: &SpanSet) -> Result<RedactionResult> {
    redact_with(&RedactionStrategy, text, spans)
}

/// Redact `text` with a custom replacement strategy
pub fn redact_with(
    anonymizer: &dyn Anonymizer,
    text: &str,
    spans: &SpanSet,
) -> Result<RedactionResult> {
    let index = CharIndex::new(text);
    let len = index.char_len();

    let mut output = String::with_capacity(text.len());
    let mut cursor = 0;
    for span in spans {
        if !span.fits(len) {
            return Err(RraError::InvalidSpan {
                start: span.start,
                end: span.end,
                len,
            });
        }
        let start = index.byte_of_char(span.start);
        let end = index.byte_of_char(span.end);
        output.push_str(&text[cursor..start]);
        output.push_str(&anonymizer.replacement(span, &text[start..end]));
        cursor = end;
    }
    output.push_str(&text[cursor..]);

    Ok(RedactionResult {
        text: output,
        spans: spans.clone(),
    })
}

/// Re-apply the stored labels of an annotation record to its original text
pub fn apply_annotation(record: &AnnotationRecord) -> Result<RedactionResult> {
    redact(&record.text, &record.spans()?)
}
