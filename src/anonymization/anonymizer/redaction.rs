//! Placeholder redaction strategy

use super::Anonymizer;
use crate::anonymization::models::Span;

/// Replaces a span with its category placeholder, e.g. `<PERSOON>`
#[derive(Debug, Clone, Copy, Default)]
pub struct RedactionStrategy;

impl RedactionStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl Anonymizer for RedactionStrategy {
    fn replacement(&self, span: &Span, _original: &str) -> String {
        span.category.placeholder().to_string()
    }
}
