//! Location detector
//!
//! Precision-biased: a city from the lexicon is only reported when the token
//! directly before it is a location preposition (`in Nijmegen`, `te Den Bosch`).
//! A bare city name is left alone, since many Dutch place names are also
//! ordinary words or part of institution names.

use super::tokens::{gap, tokenize, Gap, Token};
use super::{to_spans, EntityDetector};
use crate::anonymization::lexicon::Lexicon;
use crate::anonymization::models::{EntityCategory, Span};

#[derive(Debug, Default)]
pub struct LocationDetector;

impl LocationDetector {
    pub fn new() -> Self {
        Self
    }

    /// Longest city phrase starting at token `first`, as a byte range
    fn city_at(
        &self,
        text: &str,
        tokens: &[Token<'_>],
        first: usize,
        lexicon: &Lexicon,
    ) -> Option<(usize, usize)> {
        let mut best = None;
        let mut phrase = String::new();

        for (n, token) in tokens
            .iter()
            .enumerate()
            .skip(first)
            .take(lexicon.city_max_tokens())
        {
            if n > first && gap(text, &tokens[n - 1], token) != Gap::Space {
                break;
            }
            if !phrase.is_empty() {
                phrase.push(' ');
            }
            phrase.push_str(token.text);

            if lexicon.is_city(&phrase) && phrase.chars().any(char::is_uppercase) {
                best = Some((tokens[first].start, token.end));
            }
            // a dot ends the phrase: "in Oss. Daarna"
            if token.dot {
                break;
            }
        }

        best
    }
}

impl EntityDetector for LocationDetector {
    fn category(&self) -> EntityCategory {
        EntityCategory::Location
    }

    fn detect(&self, text: &str, lexicon: &Lexicon) -> Vec<Span> {
        let tokens = tokenize(text);
        let mut ranges = Vec::new();

        for (i, token) in tokens.iter().enumerate() {
            if token.dot || !lexicon.is_location_preposition(token.text) {
                continue;
            }
            let Some(next) = tokens.get(i + 1) else {
                continue;
            };
            if gap(text, token, next) != Gap::Space {
                continue;
            }
            if let Some(range) = self.city_at(text, &tokens, i + 1, lexicon) {
                ranges.push(range);
            }
        }

        to_spans(text, ranges, EntityCategory::Location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::text::slice_chars;
    use test_case::test_case;

    fn detected(text: &str) -> Vec<String> {
        let lexicon = Lexicon::from_toml(
            r#"
[locations]
prepositions = ["in", "te", "vanuit"]
cities = ["Nijmegen", "Oss", "Bergen op Zoom", "Bergen", "'s-Hertogenbosch"]
"#,
        )
        .unwrap();
        LocationDetector::new()
            .detect(text, &lexicon)
            .iter()
            .map(|s| slice_chars(text, s.start, s.end).unwrap().to_string())
            .collect()
    }

    #[test_case("Patiënt woont in Nijmegen.", &["Nijmegen"])]
    #[test_case("Overgeplaatst vanuit Oss naar huis", &["Oss"])]
    #[test_case("Geboren te Bergen op Zoom", &["Bergen op Zoom"])]
    #[test_case("Geboren te Bergen. Op zondag", &["Bergen"])]
    #[test_case("woont in 's-Hertogenbosch", &["'s-Hertogenbosch"])]
    #[test_case("Nijmegen Medical Center", &[]; "no preposition")]
    #[test_case("In Nijmegen gezien", &[]; "capitalised preposition")]
    #[test_case("woont in nijmegen", &[]; "lower case city")]
    #[test_case("woont in\nNijmegen", &[]; "line break")]
    fn test_locations(text: &str, expected: &[&str]) {
        assert_eq!(detected(text), expected);
    }

    #[test]
    fn test_location_offsets() {
        let lexicon = Lexicon::from_toml(
            "[locations]\nprepositions = [\"in\"]\ncities = [\"Nijmegen\"]\n",
        )
        .unwrap();
        let spans = LocationDetector::new().detect("Patiënt woont in Nijmegen.", &lexicon);
        assert_eq!(spans.len(), 1);
        assert_eq!((spans[0].start, spans[0].end), (17, 25));
    }
}
