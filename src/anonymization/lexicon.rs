//! Lexicon store for dictionary-assisted detection
//!
//! The lexicon is loaded once (from the built-in TOML or a user file) and is
//! read-only afterwards. Detectors receive it by reference, so tests can build a
//! minimal lexicon with [`Lexicon::from_toml`].

use super::text::fold;
use crate::domain::errors::RraError;
use crate::domain::result::Result;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

/// Lexicon file layout
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LexiconFile {
    names: NamesSection,
    locations: LocationsSection,
    dates: DatesSection,
    titles: TitlesSection,
    cues: CuesSection,
    whitelist: WhitelistSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct NamesSection {
    family: Vec<String>,
    first: Vec<String>,
    particles: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LocationsSection {
    cities: Vec<String>,
    prepositions: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DatesSection {
    months: Vec<String>,
    months_abbreviated: Vec<String>,
    days: Vec<String>,
    days_abbreviated: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TitlesSection {
    before: Vec<String>,
    after: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CuesSection {
    person_before: Vec<String>,
    person_after: Vec<String>,
    phone: Vec<String>,
    date_exclusions_before: Vec<String>,
    date_exclusions_after: Vec<String>,
    time_exclusions_before: Vec<String>,
    time_exclusions_after: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WhitelistSection {
    words: Vec<String>,
    abbreviations: Vec<String>,
}

/// Form in which a month name was written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthForm {
    Full,
    Abbreviated,
}

/// Immutable lookup tables used by the detectors
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    family_names: HashSet<String>,
    family_name_max_tokens: usize,
    first_names: HashSet<String>,
    particles: HashSet<String>,
    cities: HashSet<String>,
    city_max_tokens: usize,
    prepositions: HashSet<String>,
    months: HashSet<String>,
    months_abbreviated: HashSet<String>,
    days: HashSet<String>,
    days_abbreviated: HashSet<String>,
    titles_before: HashSet<String>,
    titles_after: HashSet<String>,
    person_cues_before: HashSet<String>,
    person_cues_after: HashSet<String>,
    phone_cues: HashSet<String>,
    date_exclusions_before: HashSet<String>,
    date_exclusions_after: HashSet<String>,
    time_exclusions_before: HashSet<String>,
    time_exclusions_after: HashSet<String>,
    whitelist: HashSet<String>,
    whitelist_abbreviations: HashSet<String>,
}

/// TOML source of the built-in lexicon
pub const BUILTIN_LEXICON: &str = include_str!("../../config/lexicon.toml");

impl Lexicon {
    /// Load a lexicon from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            RraError::Lexicon(format!(
                "Failed to read lexicon {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_toml(&content)
    }

    /// Build a lexicon from TOML content
    ///
    /// Every table is optional; missing tables produce empty lookups.
    pub fn from_toml(content: &str) -> Result<Self> {
        let file: LexiconFile = toml::from_str(content)
            .map_err(|e| RraError::Lexicon(format!("Failed to parse lexicon TOML: {e}")))?;

        let family_names = expand_family_names(&file.names.family);
        let family_name_max_tokens = max_tokens(&family_names);
        let cities = folded_set(&file.locations.cities);
        let city_max_tokens = max_tokens(&cities);

        let months = folded_set(&file.dates.months);
        let days = folded_set(&file.dates.days);

        // Days and months are never names on their own
        let mut whitelist = folded_set(&file.whitelist.words);
        whitelist.extend(months.iter().cloned());
        whitelist.extend(days.iter().cloned());

        Ok(Self {
            family_names,
            family_name_max_tokens,
            first_names: folded_set(&file.names.first)
                .into_iter()
                .filter(|n| n.chars().count() > 1)
                .collect(),
            particles: folded_set(&file.names.particles),
            cities,
            city_max_tokens,
            prepositions: file
                .locations
                .prepositions
                .iter()
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect(),
            months,
            months_abbreviated: folded_set(&file.dates.months_abbreviated),
            days,
            days_abbreviated: folded_set(&file.dates.days_abbreviated),
            titles_before: title_set(&file.titles.before),
            titles_after: title_set(&file.titles.after),
            person_cues_before: folded_set(&file.cues.person_before),
            person_cues_after: folded_set(&file.cues.person_after),
            phone_cues: folded_set(&file.cues.phone),
            date_exclusions_before: folded_set(&file.cues.date_exclusions_before),
            date_exclusions_after: folded_set(&file.cues.date_exclusions_after),
            time_exclusions_before: folded_set(&file.cues.time_exclusions_before),
            time_exclusions_after: folded_set(&file.cues.time_exclusions_after),
            whitelist,
            whitelist_abbreviations: file
                .whitelist
                .abbreviations
                .iter()
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty())
                .collect(),
        })
    }

    /// Built-in Dutch lexicon
    pub fn builtin() -> Result<Self> {
        Self::from_toml(BUILTIN_LEXICON)
    }

    /// Family name lookup; `phrase` is one or more space-separated tokens
    pub fn is_family_name(&self, phrase: &str) -> bool {
        self.family_names.contains(&fold(phrase))
    }

    /// Longest family name in tokens
    pub fn family_name_max_tokens(&self) -> usize {
        self.family_name_max_tokens.max(1)
    }

    pub fn is_first_name(&self, token: &str) -> bool {
        self.first_names.contains(&fold(token))
    }

    pub fn is_particle(&self, token: &str) -> bool {
        self.particles.contains(&fold(token))
    }

    pub fn is_city(&self, phrase: &str) -> bool {
        self.cities.contains(&fold(phrase))
    }

    /// Longest city name in tokens
    pub fn city_max_tokens(&self) -> usize {
        self.city_max_tokens.max(1)
    }

    /// Location preposition lookup (case-sensitive)
    pub fn is_location_preposition(&self, token: &str) -> bool {
        self.prepositions.contains(token)
    }

    /// Month lookup, reporting whether the full or abbreviated form matched
    pub fn month_form(&self, token: &str) -> Option<MonthForm> {
        let key = fold(token);
        if self.months.contains(&key) {
            Some(MonthForm::Full)
        } else if self.months_abbreviated.contains(&key) {
            Some(MonthForm::Abbreviated)
        } else {
            None
        }
    }

    /// Weekday lookup (full or abbreviated)
    pub fn is_day(&self, token: &str) -> bool {
        let key = fold(token);
        self.days.contains(&key) || self.days_abbreviated.contains(&key)
    }

    /// Any month or day form, which disqualifies a token as a first name
    pub fn is_calendar_word(&self, token: &str) -> bool {
        self.month_form(token).is_some() || self.is_day(token)
    }

    /// Title used before names; a trailing dot is ignored
    pub fn is_title_before(&self, token: &str) -> bool {
        self.titles_before.contains(&title_key(token))
    }

    /// Title used after names; a trailing dot is ignored
    pub fn is_title_after(&self, token: &str) -> bool {
        self.titles_after.contains(&title_key(token))
    }

    pub fn is_person_cue_before(&self, phrase: &str) -> bool {
        self.person_cues_before.contains(&fold(phrase))
    }

    pub fn is_person_cue_after(&self, phrase: &str) -> bool {
        self.person_cues_after.contains(&fold(phrase))
    }

    pub fn is_phone_cue(&self, token: &str) -> bool {
        self.phone_cues.contains(&fold(token))
    }

    pub fn is_date_exclusion_before(&self, token: &str) -> bool {
        self.date_exclusions_before.contains(&fold(token))
    }

    pub fn is_date_exclusion_after(&self, token: &str) -> bool {
        self.date_exclusions_after.contains(&fold(token))
    }

    pub fn is_time_exclusion_before(&self, token: &str) -> bool {
        self.time_exclusions_before.contains(&fold(token))
    }

    pub fn is_time_exclusion_after(&self, token: &str) -> bool {
        self.time_exclusions_after.contains(&fold(token))
    }

    /// Ordinary vocabulary that coincides with a name
    pub fn is_whitelisted(&self, token: &str) -> bool {
        self.whitelist.contains(&fold(token))
    }

    /// Upper-case abbreviation that must not be read as initials (case-sensitive)
    pub fn is_whitelisted_abbreviation(&self, token: &str) -> bool {
        self.whitelist_abbreviations
            .contains(token.trim_end_matches('.'))
    }

    /// Number of family and first names loaded
    pub fn name_count(&self) -> usize {
        self.family_names.len() + self.first_names.len()
    }

    pub fn city_count(&self) -> usize {
        self.cities.len()
    }
}

fn folded_set(values: &[String]) -> HashSet<String> {
    values
        .iter()
        .map(|v| normalize_spaces(&fold(v)))
        .filter(|v| !v.is_empty())
        .collect()
}

fn title_set(values: &[String]) -> HashSet<String> {
    values
        .iter()
        .map(|v| title_key(v))
        .filter(|v| !v.is_empty())
        .collect()
}

fn title_key(token: &str) -> String {
    fold(token.trim().trim_end_matches('.'))
}

fn normalize_spaces(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn max_tokens(set: &HashSet<String>) -> usize {
    set.iter()
        .map(|v| v.split(' ').count())
        .max()
        .unwrap_or(1)
}

/// Expand `"berg, van den"` into both `"van den berg"` and `"berg van den"`
fn expand_family_names(values: &[String]) -> HashSet<String> {
    let mut names = HashSet::new();
    for value in values {
        let folded = fold(value);
        let (surname, particles) = match folded.split_once(',') {
            Some((surname, particles)) => (normalize_spaces(surname), normalize_spaces(particles)),
            None => (normalize_spaces(&folded), String::new()),
        };
        if surname.chars().count() <= 1 {
            continue;
        }
        if particles.is_empty() {
            names.insert(surname);
        } else {
            names.insert(format!("{particles} {surname}"));
            names.insert(format!("{surname} {particles}"));
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
[names]
family = ["Hendrix", "berg, van den", "X"]
first = ["Ward", "Zoë", "a"]

[locations]
cities = ["Nijmegen", "Bergen op Zoom"]
prepositions = ["in", "te"]

[dates]
months = ["januari"]
months_abbreviated = ["jan"]
days = ["maandag"]

[titles]
before = ["dr."]
"#;

    #[test]
    fn test_load_builtin_lexicon() {
        let lexicon = Lexicon::builtin().unwrap();
        assert!(lexicon.name_count() > 0);
        assert!(lexicon.is_city("Nijmegen"));
        assert!(lexicon.is_location_preposition("in"));
    }

    #[test]
    fn test_family_name_expansion() {
        let lexicon = Lexicon::from_toml(MINIMAL).unwrap();
        assert!(lexicon.is_family_name("van den Berg"));
        assert!(lexicon.is_family_name("Berg van den"));
        assert!(!lexicon.is_family_name("Berg"));
        assert!(!lexicon.is_family_name("x"));
        assert_eq!(lexicon.family_name_max_tokens(), 3);
    }

    #[test]
    fn test_lookups_fold_case_and_diacritics() {
        let lexicon = Lexicon::from_toml(MINIMAL).unwrap();
        assert!(lexicon.is_first_name("ZOE"));
        assert!(lexicon.is_family_name("HENDRIX"));
        assert!(!lexicon.is_first_name("a"));
    }

    #[test]
    fn test_prepositions_are_case_sensitive() {
        let lexicon = Lexicon::from_toml(MINIMAL).unwrap();
        assert!(lexicon.is_location_preposition("in"));
        assert!(!lexicon.is_location_preposition("In"));
    }

    #[test]
    fn test_calendar_words_are_whitelisted() {
        let lexicon = Lexicon::from_toml(MINIMAL).unwrap();
        assert!(lexicon.is_whitelisted("Maandag"));
        assert!(lexicon.is_whitelisted("januari"));
        assert_eq!(lexicon.month_form("Jan"), Some(MonthForm::Abbreviated));
        assert_eq!(lexicon.month_form("Januari"), Some(MonthForm::Full));
    }

    #[test]
    fn test_title_trailing_dot_ignored() {
        let lexicon = Lexicon::from_toml(MINIMAL).unwrap();
        assert!(lexicon.is_title_before("dr"));
        assert!(lexicon.is_title_before("Dr."));
    }

    #[test]
    fn test_empty_lexicon() {
        let lexicon = Lexicon::from_toml("").unwrap();
        assert_eq!(lexicon.name_count(), 0);
        assert!(!lexicon.is_city("Nijmegen"));
    }

    #[test]
    fn test_invalid_lexicon_toml() {
        let err = Lexicon::from_toml("names = [").unwrap_err();
        assert!(matches!(err, RraError::Lexicon(_)));
    }
}
