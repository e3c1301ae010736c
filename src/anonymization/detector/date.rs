//! Date detector
//!
//! Numeric dates are matched with guarded patterns; textual dates
//! (`3 februari 2020`, `ma. 3 feb.`, `maart 2021`) are found on the token stream
//! with the month and weekday tables of the lexicon.

use super::tokens::{gap, tokenize, Gap, Token};
use super::{compile, find_all, guarded, to_spans, word_after, word_before, EntityDetector};
use crate::anonymization::lexicon::{Lexicon, MonthForm};
use crate::anonymization::models::{EntityCategory, Span};
use crate::domain::result::Result;
use fancy_regex::Regex;

const DAY: &str = r"(?:0?[1-9]|[12]\d|3[01])";
const MONTH: &str = r"(?:0?[1-9]|1[0-2])";
const YEAR4: &str = r"(?:19|20)\d{2}";
const YEAR2: &str = r"\d{2}";

/// Detector for calendar dates
pub struct DateDetector {
    /// Patterns that are dates regardless of context
    unconditional: Vec<Regex>,
    /// Short patterns suppressed by negative context cues
    cue_sensitive: Vec<Regex>,
    hyphenated_textual: Regex,
}

impl DateDetector {
    pub fn new() -> Result<Self> {
        let unconditional = vec![
            // 12-03-2020, 12/03/2020, 12.03.2020
            guarded(&format!(r"{DAY}([-/.]){MONTH}\1{YEAR4}"))?,
            // 12. 03. 2020
            guarded(&format!(r"{DAY}\. {MONTH}\. {YEAR4}"))?,
            // 12 03 2020
            guarded(&format!(r"{DAY} {MONTH} {YEAR4}"))?,
            // 12-03-20, 12/03/20, 12.03.20
            guarded(&format!(r"{DAY}([-/.]){MONTH}\1{YEAR2}"))?,
            // 12. 03. 20
            guarded(&format!(r"{DAY}\. {MONTH}\. {YEAR2}"))?,
            // 2020-03-12
            guarded(&format!(r"{YEAR4}-(?:0[1-9]|1[0-2])-(?:0[1-9]|[12]\d|3[01])"))?,
        ];

        let cue_sensitive = vec![
            // 12 03 20
            guarded(&format!(r"{DAY} {MONTH} {YEAR2}"))?,
            // 12-03 2020
            guarded(&format!(r"{DAY}[-/]{MONTH} {YEAR4}"))?,
            // 12-03, 12/03
            guarded(&format!(r"{DAY}[-/]{MONTH}"))?,
            // 03-2020, 25/2020
            guarded(&format!(r"{DAY}[-/]{YEAR4}"))?,
            // 2020
            guarded(YEAR4)?,
        ];

        Ok(Self {
            unconditional,
            cue_sensitive,
            hyphenated_textual: compile(&format!(r"^{DAY}-(\p{{L}}+)\.?-(?:{YEAR4}|{YEAR2})$"))?,
        })
    }

    fn numeric_dates(&self, text: &str, lexicon: &Lexicon) -> Vec<(usize, usize)> {
        let mut ranges = Vec::new();
        for regex in &self.unconditional {
            ranges.extend(find_all(regex, text));
        }
        for regex in &self.cue_sensitive {
            ranges.extend(find_all(regex, text).into_iter().filter(|&(start, end)| {
                !lexicon.is_date_exclusion_before(word_before(text, start))
                    && !lexicon.is_date_exclusion_after(word_after(text, end))
            }));
        }
        ranges
    }

    fn textual_dates(&self, text: &str, lexicon: &Lexicon) -> Vec<(usize, usize)> {
        let tokens = tokenize(text);
        let mut ranges = Vec::new();

        for (i, token) in tokens.iter().enumerate() {
            // 12-jan-2020
            if self.is_hyphenated_textual(token, lexicon) {
                ranges.push((token.start, token.end));
                continue;
            }

            // [weekday[.]] dd month[.] [yyyy|yy]
            if is_day_number(token) {
                if let Some(month) = next_joined(text, &tokens, i) {
                    if let Some(form) = lexicon.month_form(month.text) {
                        let mut start = token.start;
                        let mut end = month_end(month, form);
                        if let Some(year) = year_after(text, &tokens, i + 1, form) {
                            end = year.end;
                        }
                        if let Some(day) = weekday_before(text, &tokens, i, lexicon) {
                            start = day.start;
                        }
                        ranges.push((start, end));
                        continue;
                    }
                }
            }

            if let Some(form) = lexicon.month_form(token.text) {
                // month[.] yyyy
                if let Some(year) = next_joined(text, &tokens, i).filter(is_year4) {
                    if follows_month(text, token, year, form) {
                        ranges.push((token.start, year.end));
                        continue;
                    }
                }
                // full month name on its own
                if form == MonthForm::Full {
                    ranges.push((token.start, token.end));
                }
            }
        }

        ranges
    }

    fn is_hyphenated_textual(&self, token: &Token<'_>, lexicon: &Lexicon) -> bool {
        match self.hyphenated_textual.captures(token.text) {
            Ok(Some(caps)) => caps
                .get(1)
                .is_some_and(|m| lexicon.month_form(m.as_str()).is_some()),
            _ => false,
        }
    }
}

impl EntityDetector for DateDetector {
    fn category(&self) -> EntityCategory {
        EntityCategory::Date
    }

    fn detect(&self, text: &str, lexicon: &Lexicon) -> Vec<Span> {
        let mut ranges = self.numeric_dates(text, lexicon);
        ranges.extend(self.textual_dates(text, lexicon));
        to_spans(text, ranges, EntityCategory::Date)
    }
}

fn is_day_number(token: &Token<'_>) -> bool {
    token.is_digits()
        && token.text.len() <= 2
        && !token.dot
        && token.text.parse::<u8>().is_ok_and(|d| (1..=31).contains(&d))
}

fn is_year4(token: &Token<'_>) -> bool {
    token.is_digits()
        && token.text.len() == 4
        && (token.text.starts_with("19") || token.text.starts_with("20"))
}

fn is_year2(token: &Token<'_>) -> bool {
    token.is_digits() && token.text.len() == 2
}

/// Next token when separated from token `i` by whitespace only, or by the
/// dot of an abbreviation and whitespace
fn next_joined<'a>(text: &str, tokens: &[Token<'a>], i: usize) -> Option<Token<'a>> {
    let next = tokens.get(i + 1)?;
    match gap(text, &tokens[i], next) {
        Gap::Space | Gap::DotSpace => Some(*next),
        _ => None,
    }
}

/// Abbreviated months keep their dot inside the span
fn month_end(month: Token<'_>, form: MonthForm) -> usize {
    match form {
        MonthForm::Abbreviated => month.end_with_dot(),
        MonthForm::Full => month.end,
    }
}

fn follows_month(text: &str, month: &Token<'_>, year: Token<'_>, form: MonthForm) -> bool {
    match gap(text, month, &year) {
        Gap::Space => true,
        Gap::DotSpace => form == MonthForm::Abbreviated,
        _ => false,
    }
}

/// Year token following the month at index `month_idx`
fn year_after<'a>(
    text: &str,
    tokens: &[Token<'a>],
    month_idx: usize,
    form: MonthForm,
) -> Option<Token<'a>> {
    let month = tokens.get(month_idx)?;
    let year = next_joined(text, tokens, month_idx)?;
    if !follows_month(text, month, year, form) {
        return None;
    }
    (is_year4(&year) || is_year2(&year)).then_some(year)
}

/// Weekday token directly before the day number at index `day_idx`
fn weekday_before<'a>(
    text: &str,
    tokens: &[Token<'a>],
    day_idx: usize,
    lexicon: &Lexicon,
) -> Option<Token<'a>> {
    let prev = tokens.get(day_idx.checked_sub(1)?)?;
    if !lexicon.is_day(prev.text) {
        return None;
    }
    match gap(text, prev, &tokens[day_idx]) {
        Gap::Space | Gap::DotSpace | Gap::Comma => Some(*prev),
        Gap::Other => None,
    }
}
