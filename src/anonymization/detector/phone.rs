//! Internal phone number detector
//!
//! Hospital extensions are either a stand-alone five-digit number or a cue word
//! (`sein`, `toestel`, ...) followed by four digits, optionally starred. In the
//! second form the cue is redacted together with the digits.

use super::{find_all, guarded, to_spans, EntityDetector};
use crate::anonymization::lexicon::Lexicon;
use crate::anonymization::models::{EntityCategory, Span};
use crate::domain::result::Result;
use fancy_regex::Regex;

pub struct PhoneDetector {
    five_digits: Regex,
    cued_four_digits: Regex,
}

impl PhoneDetector {
    pub fn new() -> Result<Self> {
        Ok(Self {
            five_digits: guarded(r"\d{5}")?,
            cued_four_digits: guarded(r"(\p{L}+) ?(?:\* ?)?\d{4}")?,
        })
    }

    fn cued(&self, text: &str, lexicon: &Lexicon) -> Vec<(usize, usize)> {
        let mut found = Vec::new();
        for caps in self.cued_four_digits.captures_iter(text) {
            let caps = match caps {
                Ok(caps) => caps,
                Err(e) => {
                    tracing::warn!(error = %e, "Pattern matching aborted");
                    break;
                }
            };
            let (Some(whole), Some(cue)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            if lexicon.is_phone_cue(cue.as_str()) {
                found.push((whole.start(), whole.end()));
            }
        }
        found
    }
}

impl EntityDetector for PhoneDetector {
    fn category(&self) -> EntityCategory {
        EntityCategory::InternalPhone
    }

    fn detect(&self, text: &str, lexicon: &Lexicon) -> Vec<Span> {
        let mut ranges = find_all(&self.five_digits, text);
        ranges.extend(self.cued(text, lexicon));
        to_spans(text, ranges, EntityCategory::InternalPhone)
    }
}
