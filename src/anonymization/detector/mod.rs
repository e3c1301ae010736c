//! Entity detection module
//!
//! Provides the trait-based detection interface and one detector per
//! [`EntityCategory`]. Detectors are pure functions of the text and the
//! lexicon: they hold only compiled patterns and never shared mutable state,
//! so they can run in any order and on any thread.

pub mod date;
pub mod identifiers;
pub mod location;
pub mod person;
pub mod phone;
pub mod time;
pub mod tokens;

use crate::anonymization::lexicon::Lexicon;
use crate::anonymization::models::{EnabledCategories, EntityCategory, Span};
use crate::anonymization::text::CharIndex;
use crate::domain::errors::RraError;
use crate::domain::result::Result;
use fancy_regex::Regex;

/// Trait for entity detector implementations
pub trait EntityDetector: Send + Sync {
    /// Category of every span this detector yields
    fn category(&self) -> EntityCategory;

    /// Scan `text` and return candidate spans (character offsets, any order,
    /// possibly overlapping)
    fn detect(&self, text: &str, lexicon: &Lexicon) -> Vec<Span>;
}

/// Create the detector for a category
pub fn detector_for(category: EntityCategory) -> Result<Box<dyn EntityDetector>> {
    Ok(match category {
        EntityCategory::Person => Box::new(person::PersonDetector::new()),
        EntityCategory::Date => Box::new(date::DateDetector::new()?),
        EntityCategory::Time => Box::new(time::TimeDetector::new()?),
        EntityCategory::InternalPhone => Box::new(phone::PhoneDetector::new()?),
        EntityCategory::PatientId => Box::new(identifiers::PatientIdDetector::new()?),
        EntityCategory::ZNumber => Box::new(identifiers::ZNumberDetector::new()?),
        EntityCategory::ReportId => Box::new(identifiers::ReportIdDetector::new()?),
        EntityCategory::Location => Box::new(location::LocationDetector::new()),
    })
}

/// Detectors for every enabled category, in detector order
pub fn detectors_for(enabled: &EnabledCategories) -> Result<Vec<Box<dyn EntityDetector>>> {
    enabled.iter().map(detector_for).collect()
}

/// Numeric guard placed before a pattern: not glued to a word character, `/`
/// or `-`, and not the fractional part of a decimal number
pub(crate) const GUARD_BEFORE: &str = r"(?<![\w/\-])(?<!\d[.,])";

/// Numeric guard placed after a pattern
pub(crate) const GUARD_AFTER: &str = r"(?![\w/\-])(?![.,]\d)";

/// Compile a pattern wrapped in the numeric guards
pub(crate) fn guarded(pattern: &str) -> Result<Regex> {
    compile(&format!("{GUARD_BEFORE}(?:{pattern}){GUARD_AFTER}"))
}

pub(crate) fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern)
        .map_err(|e| RraError::Configuration(format!("Invalid detector pattern {pattern}: {e}")))
}

/// Byte ranges of all matches of a pattern
pub(crate) fn find_all(regex: &Regex, text: &str) -> Vec<(usize, usize)> {
    let mut found = Vec::new();
    for m in regex.find_iter(text) {
        match m {
            Ok(m) => found.push((m.start(), m.end())),
            Err(e) => {
                tracing::warn!(error = %e, "Pattern matching aborted");
                break;
            }
        }
    }
    found
}

/// Convert byte ranges to spans of one category
pub(crate) fn to_spans(
    text: &str,
    ranges: impl IntoIterator<Item = (usize, usize)>,
    category: EntityCategory,
) -> Vec<Span> {
    let index = CharIndex::new(text);
    let mut spans: Vec<Span> = ranges
        .into_iter()
        .filter_map(|(start, end)| {
            Span::new(index.char_of_byte(start), index.char_of_byte(end), category).ok()
        })
        .collect();
    spans.sort_by_key(|s| (s.start, s.end));
    spans.dedup();
    spans
}

/// Word directly before `byte`, skipping whitespace and a colon
pub(crate) fn word_before(text: &str, byte: usize) -> &str {
    let head = &text[..byte];
    let trimmed = head.trim_end_matches(|c: char| c.is_whitespace() || c == ':');
    let start = trimmed
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_alphanumeric())
        .last()
        .map(|(i, _)| i)
        .unwrap_or(trimmed.len());
    &trimmed[start..]
}

/// Word directly after `byte`, skipping whitespace
pub(crate) fn word_after(text: &str, byte: usize) -> &str {
    let tail = &text[byte..];
    let trimmed = tail.trim_start_matches(char::is_whitespace);
    let len = trimmed
        .char_indices()
        .find(|(_, c)| !(c.is_alphanumeric() || *c == '%'))
        .map(|(i, _)| i)
        .unwrap_or(trimmed.len());
    &trimmed[..len]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_category_has_a_detector() {
        for category in EntityCategory::ALL {
            let detector = detector_for(category).unwrap();
            assert_eq!(detector.category(), category);
        }
    }

    #[test]
    fn test_word_before_and_after() {
        let text = "leeftijd: 12-03 mm verder";
        let start = text.find("12").unwrap();
        let end = start + "12-03".len();
        assert_eq!(word_before(text, start), "leeftijd");
        assert_eq!(word_after(text, end), "mm");
        assert_eq!(word_before(text, 0), "");
    }

    #[test]
    fn test_guarded_pattern_rejects_attached_digits() {
        let re = guarded(r"\d{5}").unwrap();
        assert_eq!(find_all(&re, "sein 12345."), vec![(5, 10)]);
        assert!(find_all(&re, "123456").is_empty());
        assert!(find_all(&re, "A-12345").is_empty());
        assert!(find_all(&re, "3.12345").is_empty());
    }

    #[test]
    fn test_to_spans_converts_to_characters() {
        let text = "Patiënt 12345";
        let spans = to_spans(text, vec![(9, 14)], EntityCategory::InternalPhone);
        assert_eq!(spans[0].start, 8);
        assert_eq!(spans[0].end, 13);
    }
}
