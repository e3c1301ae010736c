//! Detectors for structured identifiers: patient numbers, Z-numbers and
//! report ids

use super::{find_all, guarded, to_spans, EntityDetector};
use crate::anonymization::lexicon::Lexicon;
use crate::anonymization::models::{EntityCategory, Span};
use crate::domain::result::Result;
use fancy_regex::Regex;

/// A detector backed by one guarded pattern
struct PatternDetector {
    category: EntityCategory,
    regex: Regex,
}

impl PatternDetector {
    fn new(category: EntityCategory, pattern: &str) -> Result<Self> {
        Ok(Self {
            category,
            regex: guarded(pattern)?,
        })
    }

    fn detect(&self, text: &str) -> Vec<Span> {
        to_spans(text, find_all(&self.regex, text), self.category)
    }
}

/// Seven-digit hospital patient number
pub struct PatientIdDetector(PatternDetector);

impl PatientIdDetector {
    pub fn new() -> Result<Self> {
        PatternDetector::new(EntityCategory::PatientId, r"\d{7}").map(Self)
    }
}

impl EntityDetector for PatientIdDetector {
    fn category(&self) -> EntityCategory {
        self.0.category
    }

    fn detect(&self, text: &str, _lexicon: &Lexicon) -> Vec<Span> {
        self.0.detect(text)
    }
}

/// Personnel number: `z` or `Z` and six digits
pub struct ZNumberDetector(PatternDetector);

impl ZNumberDetector {
    pub fn new() -> Result<Self> {
        PatternDetector::new(EntityCategory::ZNumber, r"[zZ]\d{6}").map(Self)
    }
}

impl EntityDetector for ZNumberDetector {
    fn category(&self) -> EntityCategory {
        self.0.category
    }

    fn detect(&self, text: &str, _lexicon: &Lexicon) -> Vec<Span> {
        self.0.detect(text)
    }
}

/// Report number: `T 12-34567` or `T 12 34567`
pub struct ReportIdDetector(PatternDetector);

impl ReportIdDetector {
    pub fn new() -> Result<Self> {
        PatternDetector::new(EntityCategory::ReportId, r"T \d{2}[- ]\d{5}").map(Self)
    }
}

impl EntityDetector for ReportIdDetector {
    fn category(&self) -> EntityCategory {
        self.0.category
    }

    fn detect(&self, text: &str, _lexicon: &Lexicon) -> Vec<Span> {
        self.0.detect(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::text::slice_chars;
    use test_case::test_case;

    fn detected(detector: &dyn EntityDetector, text: &str) -> Vec<String> {
        detector
            .detect(text, &Lexicon::default())
            .iter()
            .map(|s| slice_chars(text, s.start, s.end).unwrap().to_string())
            .collect()
    }

    #[test_case("Patiëntnummer: 1234567.", &["1234567"])]
    #[test_case("nr 1234567 en 7654321", &["1234567", "7654321"])]
    #[test_case("getal 12345678", &[]; "eight digits")]
    #[test_case("waarde 0,1234567", &[]; "decimal fraction")]
    #[test_case("ref 123-4567890", &[]; "hyphen attached")]
    fn test_patient_id(text: &str, expected: &[&str]) {
        let detector = PatientIdDetector::new().unwrap();
        assert_eq!(detected(&detector, text), expected);
    }

    #[test_case("Uitgevoerd door z123456.", &["z123456"])]
    #[test_case("Z654321 akkoord", &["Z654321"])]
    #[test_case("code xz123456", &[]; "attached prefix")]
    #[test_case("z1234567", &[]; "seven digits")]
    fn test_z_number(text: &str, expected: &[&str]) {
        let detector = ZNumberDetector::new().unwrap();
        assert_eq!(detected(&detector, text), expected);
    }

    #[test_case("Verslag T 21-12345 afgerond", &["T 21-12345"])]
    #[test_case("zie T 21 12345.", &["T 21 12345"])]
    #[test_case("AT 21-12345", &[]; "attached letter")]
    #[test_case("T 21-123456", &[]; "too many digits")]
    fn test_report_id(text: &str, expected: &[&str]) {
        let detector = ReportIdDetector::new().unwrap();
        assert_eq!(detected(&detector, text), expected);
    }

    #[test]
    fn test_categories() {
        assert_eq!(
            PatientIdDetector::new().unwrap().category(),
            EntityCategory::PatientId
        );
        assert_eq!(
            ZNumberDetector::new().unwrap().category(),
            EntityCategory::ZNumber
        );
        assert_eq!(
            ReportIdDetector::new().unwrap().category(),
            EntityCategory::ReportId
        );
    }
}
