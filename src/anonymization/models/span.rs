//! Span data models
//!
//! Offsets are half-open character offsets (Unicode scalar values) into the
//! report text, matching the offsets stored in annotation files.

use super::entity::EntityCategory;
use crate::domain::errors::RraError;
use crate::domain::result::Result;
use serde::{Deserialize, Serialize};

/// A detected privacy-sensitive range of a report text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Start offset (inclusive)
    pub start: usize,
    /// End offset (exclusive)
    pub end: usize,
    /// Entity category
    pub category: EntityCategory,
}

impl Span {
    /// Create a new span, rejecting empty or inverted ranges
    pub fn new(start: usize, end: usize, category: EntityCategory) -> Result<Self> {
        if start >= end {
            return Err(RraError::InvalidSpan {
                start,
                end,
                len: end,
            });
        }
        Ok(Self {
            start,
            end,
            category,
        })
    }

    /// Number of characters covered
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Check whether two spans share at least one character
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Check whether the span fits a text of `text_len` characters
    pub fn fits(&self, text_len: usize) -> bool {
        self.start < self.end && self.end <= text_len
    }
}

/// Ordered, pairwise non-overlapping sequence of spans
///
/// The only way to obtain a `SpanSet` is through a constructor that checks the
/// ordering invariant, so every `SpanSet` is safe to substitute.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct SpanSet(Vec<Span>);

impl SpanSet {
    /// Empty span set
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Build a span set from spans that are already sorted and non-overlapping
    pub fn from_sorted(spans: Vec<Span>) -> Result<Self> {
        for pair in spans.windows(2) {
            if pair[0].end > pair[1].start {
                return Err(RraError::Validation(format!(
                    "Spans {}..{} and {}..{} overlap or are out of order",
                    pair[0].start, pair[0].end, pair[1].start, pair[1].end
                )));
            }
        }
        if let Some(span) = spans.iter().find(|s| s.is_empty()) {
            return Err(RraError::InvalidSpan {
                start: span.start,
                end: span.end,
                len: span.end,
            });
        }
        Ok(Self(spans))
    }

    /// Build a span set from spans in any order, failing on overlap
    pub fn from_unsorted(mut spans: Vec<Span>) -> Result<Self> {
        spans.sort_by_key(|s| (s.start, s.end));
        Self::from_sorted(spans)
    }

    pub(crate) fn from_resolved(spans: Vec<Span>) -> Self {
        debug_assert!(spans.windows(2).all(|p| p[0].end <= p[1].start));
        Self(spans)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Span> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Span] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Spans of one category only
    pub fn of_category(&self, category: EntityCategory) -> impl Iterator<Item = &Span> {
        self.0.iter().filter(move |s| s.category == category)
    }

    pub fn into_vec(self) -> Vec<Span> {
        self.0
    }
}

impl<'a> IntoIterator for &'a SpanSet {
    type Item = &'a Span;
    type IntoIter = std::slice::Iter<'a, Span>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Output of the redaction engine for one report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedactionResult {
    /// Anonymized text
    pub text: String,
    /// Spans that were redacted, as offsets into the original text
    pub spans: SpanSet,
}

impl RedactionResult {
    /// Count redacted spans per category
    pub fn count_by_category(&self) -> std::collections::BTreeMap<EntityCategory, usize> {
        let mut counts = std::collections::BTreeMap::new();
        for span in &self.spans {
            *counts.entry(span.category).or_insert(0) += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(start: usize, end: usize) -> Span {
        Span::new(start, end, EntityCategory::Date).unwrap()
    }

    #[test]
    fn test_span_rejects_empty_range() {
        assert!(Span::new(3, 3, EntityCategory::Person).is_err());
        assert!(Span::new(5, 2, EntityCategory::Person).is_err());
    }

    #[test]
    fn test_touching_spans_do_not_overlap() {
        assert!(!span(0, 4).overlaps(&span(4, 8)));
        assert!(span(0, 5).overlaps(&span(4, 8)));
    }

    #[test]
    fn test_span_set_accepts_adjacent_spans() {
        let set = SpanSet::from_sorted(vec![span(0, 4), span(4, 8)]).unwrap();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_span_set_rejects_overlap() {
        assert!(SpanSet::from_sorted(vec![span(0, 5), span(4, 8)]).is_err());
        assert!(SpanSet::from_unsorted(vec![span(4, 8), span(0, 5)]).is_err());
    }

    #[test]
    fn test_from_unsorted_orders_spans() {
        let set = SpanSet::from_unsorted(vec![span(10, 12), span(0, 2)]).unwrap();
        assert_eq!(set.as_slice()[0].start, 0);
    }
}
