//! Time-of-day detector

use super::{find_all, guarded, to_spans, word_after, word_before, EntityDetector};
use crate::anonymization::lexicon::Lexicon;
use crate::anonymization::models::{EntityCategory, Span};
use crate::domain::result::Result;
use fancy_regex::Regex;

const HOUR: &str = r"(?:[01]?\d|2[0-3])";
const HOUR_NONZERO: &str = r"(?:[1-9]|1\d|2[0-3])";
const MINUTE: &str = r"[0-5]\d";
const SUFFIX: &str = r"(?: ?uur|u)";

/// Detector for clock times
pub struct TimeDetector {
    unconditional: Vec<Regex>,
    /// `14.30` without a suffix reads like a measurement as often as a time
    dotted: Regex,
}

impl TimeDetector {
    pub fn new() -> Result<Self> {
        let unconditional = vec![
            // 14:30, 14:30:15, 14:30 uur, 14:30u
            guarded(&format!(r"{HOUR}:{MINUTE}(?::{MINUTE})?{SUFFIX}?"))?,
            // 14.30 uur, 14.30u
            guarded(&format!(r"{HOUR}\.{MINUTE}(?:\.{MINUTE})?{SUFFIX}"))?,
            // 14 30 uur
            guarded(&format!(r"{HOUR} {MINUTE} uur"))?,
            // 1430 uur
            guarded(&format!(r"(?:[01]\d|2[0-3]){MINUTE} ?uur"))?,
            // 9 uur
            guarded(&format!(r"{HOUR_NONZERO} uur"))?,
            // 15u15
            guarded(&format!(r"{HOUR}u{MINUTE}"))?,
        ];

        Ok(Self {
            unconditional,
            dotted: guarded(&format!(r"{HOUR}\.{MINUTE}(?:\.{MINUTE})?"))?,
        })
    }
}

impl EntityDetector for TimeDetector {
    fn category(&self) -> EntityCategory {
        EntityCategory::Time
    }

    fn detect(&self, text: &str, lexicon: &Lexicon) -> Vec<Span> {
        let mut ranges: Vec<(usize, usize)> = self
            .unconditional
            .iter()
            .flat_map(|regex| find_all(regex, text))
            .collect();

        ranges.extend(find_all(&self.dotted, text).into_iter().filter(|&(start, end)| {
            !lexicon.is_time_exclusion_before(word_before(text, start))
                && !lexicon.is_time_exclusion_after(word_after(text, end))
        }));

        to_spans(text, ranges, EntityCategory::Time)
    }
}
