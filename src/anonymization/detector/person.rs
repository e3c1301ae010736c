//! Person name detector
//!
//! Dictionary-assisted and recall-biased. A name is seeded by a capitalised
//! family name or first name from the lexicon and then grows token by token in
//! both directions, absorbing titles, initials, further name parts and particle
//! runs, so that `dr. J. van den Berg` and `Hendrix, Ward` each become a single
//! span.
//!
//! Family names that are also ordinary words (`Visser`, `Bakker`) only count
//! when something else vouches for them: a title, initials or a first name in
//! the same span, or a person cue word such as `collega` next to it. Cue words
//! are evidence only and never part of the span.

use super::tokens::{gap, tokenize, Gap, Token};
use super::{to_spans, EntityDetector};
use crate::anonymization::lexicon::Lexicon;
use crate::anonymization::models::{EntityCategory, Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    TitleBefore,
    TitleAfter,
    Initials,
    FirstName,
    FamilyName,
    Ambiguous,
}

/// A name under construction, as an inclusive token range
#[derive(Debug)]
struct Name {
    first: usize,
    last: usize,
    seed: usize,
    first_role: Role,
    last_role: Role,
    /// Contains a title, initials or first name
    anchored: bool,
    /// Seeded by a whitelisted family name
    weak: bool,
}

impl Name {
    fn new(first: usize, last: usize, role: Role, weak: bool) -> Self {
        Self {
            first,
            last,
            seed: first,
            first_role: role,
            last_role: role,
            anchored: role != Role::FamilyName,
            weak,
        }
    }

    fn prepend(&mut self, index: usize, role: Role) {
        self.first = index;
        self.first_role = role;
        self.anchored |= matches!(role, Role::TitleBefore | Role::Initials | Role::FirstName);
    }

    fn append(&mut self, index: usize, role: Role) {
        self.last = index;
        self.last_role = role;
        self.anchored |= matches!(
            role,
            Role::TitleAfter | Role::Initials | Role::FirstName
        );
    }
}

#[derive(Debug, Default)]
pub struct PersonDetector;

impl PersonDetector {
    pub fn new() -> Self {
        Self
    }
}

impl EntityDetector for PersonDetector {
    fn category(&self) -> EntityCategory {
        EntityCategory::Person
    }

    fn detect(&self, text: &str, lexicon: &Lexicon) -> Vec<Span> {
        let tokens = tokenize(text);
        let scan = Scan {
            text,
            tokens: &tokens,
            lexicon,
        };

        let mut ranges = Vec::new();
        let mut floor = 0;
        for i in 0..tokens.len() {
            if i < floor {
                continue;
            }
            let Some(mut name) = scan.seed(i) else {
                continue;
            };
            scan.extend_left(&mut name, floor);
            scan.extend_right(&mut name);

            if name.weak && !name.anchored && !scan.has_cue(&name) {
                continue;
            }
            ranges.push((tokens[name.first].start, scan.end_of(&name)));
            floor = name.last + 1;
        }

        to_spans(text, ranges, EntityCategory::Person)
    }
}

struct Scan<'a> {
    text: &'a str,
    tokens: &'a [Token<'a>],
    lexicon: &'a Lexicon,
}

impl Scan<'_> {
    fn gap(&self, left: usize, right: usize) -> Gap {
        gap(self.text, &self.tokens[left], &self.tokens[right])
    }

    fn links(&self, left: usize, right: usize) -> bool {
        matches!(self.gap(left, right), Gap::Space | Gap::DotSpace)
    }

    fn same_line(&self, left: usize, right: usize) -> bool {
        let between = &self.text[self.tokens[left].end..self.tokens[right].start];
        !between.contains('\n')
    }

    fn word(&self, k: usize) -> &str {
        self.tokens[k].text
    }

    fn is_title_before(&self, k: usize) -> bool {
        self.lexicon.is_title_before(self.word(k))
    }

    fn is_title_after(&self, k: usize) -> bool {
        self.lexicon.is_title_after(self.word(k))
    }

    fn is_particle(&self, k: usize) -> bool {
        let token = &self.tokens[k];
        self.lexicon.is_particle(token.text)
            || (token.dot && self.lexicon.is_particle(&format!("{}.", token.text)))
    }

    fn is_initials(&self, k: usize) -> bool {
        let word = self.word(k);
        if self.lexicon.is_whitelisted_abbreviation(word) {
            return false;
        }
        let dotted = word.split('.').all(|part| {
            let mut chars = part.chars();
            matches!((chars.next(), chars.next()), (Some(c), None) if c.is_uppercase())
        });
        let packed = (2..=4).contains(&word.chars().count()) && word.chars().all(char::is_uppercase);
        dotted || packed
    }

    /// Capitalised first name; whitelisted names still count inside a span
    fn is_first_name(&self, k: usize) -> bool {
        let token = &self.tokens[k];
        token.is_capitalized()
            && self.lexicon.is_first_name(token.text)
            && !self.lexicon.is_calendar_word(token.text)
    }

    fn is_family_token(&self, k: usize) -> bool {
        let token = &self.tokens[k];
        token.is_capitalized()
            && !self.lexicon.is_particle(token.text)
            && (self.lexicon.is_family_name(token.text) || self.is_double_barrelled(k))
    }

    /// `Jansen-Visser`: every part a known family name
    fn is_double_barrelled(&self, k: usize) -> bool {
        let token = &self.tokens[k];
        let mut parts = token.text.split('-');
        let Some(head) = parts.next() else {
            return false;
        };
        let tail: Vec<&str> = parts.collect();
        token.is_capitalized()
            && !tail.is_empty()
            && self.lexicon.is_family_name(head)
            && tail.iter().all(|p| !p.is_empty() && self.lexicon.is_family_name(p))
    }

    /// Longest family name phrase starting at `start`: last token index and
    /// whether the phrase is also an ordinary word
    fn family_phrase(&self, start: usize) -> Option<(usize, bool)> {
        let longest = self.lexicon.family_name_max_tokens();
        for n in (1..=longest).rev() {
            let last = start + n - 1;
            if last >= self.tokens.len() || (start..last).any(|k| self.gap(k, k + 1) != Gap::Space) {
                continue;
            }
            let words = &self.tokens[start..=last];
            let capitalised = words
                .iter()
                .any(|t| t.is_capitalized() && !self.lexicon.is_particle(t.text));
            if !capitalised {
                continue;
            }
            let phrase = words.iter().map(|t| t.text).collect::<Vec<_>>().join(" ");
            if self.lexicon.is_family_name(&phrase) {
                return Some((last, self.lexicon.is_whitelisted(&phrase)));
            }
            if n == 1 && self.is_double_barrelled(start) {
                return Some((last, false));
            }
        }
        None
    }

    /// Capitalised word that is nothing else the lexicon knows about
    fn is_ambiguous(&self, k: usize) -> bool {
        let token = &self.tokens[k];
        let word = token.text;
        let lx = self.lexicon;
        token.is_capitalized()
            && word.chars().any(char::is_lowercase)
            && word.chars().all(|c| c.is_alphabetic() || c == '-' || c == '\'')
            && !lx.is_whitelisted(word)
            && !lx.is_calendar_word(word)
            && !lx.is_title_before(word)
            && !lx.is_title_after(word)
            && !lx.is_person_cue_before(word)
            && !lx.is_person_cue_after(word)
            && !lx.is_particle(word)
            && !lx.is_location_preposition(&word.to_lowercase())
            && !lx.is_city(word)
    }

    fn seed(&self, i: usize) -> Option<Name> {
        if let Some((last, whitelisted)) = self.family_phrase(i) {
            return Some(Name::new(i, last, Role::FamilyName, whitelisted));
        }
        let word = self.word(i);
        if self.is_first_name(i) && !self.lexicon.is_whitelisted(word) {
            return Some(Name::new(i, i, Role::FirstName, false));
        }
        None
    }

    fn extend_left(&self, name: &mut Name, floor: usize) {
        while name.first > floor {
            let prev = name.first - 1;
            let gap = self.gap(prev, name.first);
            if !matches!(gap, Gap::Space | Gap::DotSpace) {
                return;
            }

            if self.is_title_before(prev) {
                name.prepend(prev, Role::TitleBefore);
                continue;
            }
            if self.is_initials(prev) {
                name.prepend(prev, Role::Initials);
                continue;
            }
            if gap == Gap::DotSpace {
                return;
            }
            if self.is_first_name(prev) {
                name.prepend(prev, Role::FirstName);
                continue;
            }
            if self.is_family_token(prev) {
                name.prepend(prev, Role::FamilyName);
                continue;
            }
            if self.is_particle(prev) {
                // particles only join when something name-like precedes them
                if let Some(anchor) = self.anchor_before_particles(prev, floor) {
                    name.prepend(anchor.0, anchor.1);
                    continue;
                }
                return;
            }
            if name.first == name.seed
                && name.first_role == Role::FamilyName
                && self.is_ambiguous(prev)
                && prev > 0
                && self.gap(prev - 1, prev) == Gap::Space
            {
                name.prepend(prev, Role::Ambiguous);
            }
            return;
        }
    }

    /// Title, initials or first name directly before the particle run ending
    /// at `last_particle`
    fn anchor_before_particles(&self, last_particle: usize, floor: usize) -> Option<(usize, Role)> {
        let mut k = last_particle;
        while k > floor && self.is_particle(k - 1) && self.links(k - 1, k) {
            k -= 1;
        }
        if k <= floor || !self.links(k - 1, k) {
            return None;
        }
        let anchor = k - 1;
        if self.is_title_before(anchor) {
            Some((anchor, Role::TitleBefore))
        } else if self.is_initials(anchor) {
            Some((anchor, Role::Initials))
        } else if self.gap(anchor, k) == Gap::Space && self.is_first_name(anchor) {
            Some((anchor, Role::FirstName))
        } else {
            None
        }
    }

    fn extend_right(&self, name: &mut Name) {
        let mut comma_used = false;
        loop {
            let next = name.last + 1;
            if next >= self.tokens.len() {
                return;
            }
            let after_comma = match self.gap(name.last, next) {
                Gap::Space => false,
                Gap::DotSpace if matches!(name.last_role, Role::Initials | Role::TitleBefore) => {
                    false
                }
                Gap::Comma if !comma_used && name.last_role == Role::FamilyName => true,
                _ => return,
            };
            comma_used |= after_comma;

            if self.is_title_after(next) {
                name.append(next, Role::TitleAfter);
                continue;
            }
            if after_comma {
                if self.is_initials(next) {
                    name.append(next, Role::Initials);
                    continue;
                }
                if self.is_first_name(next) {
                    name.append(next, Role::FirstName);
                    continue;
                }
                if self.is_ambiguous(next) {
                    name.append(next, Role::Ambiguous);
                }
                return;
            }
            if let Some((last, _)) = self.family_phrase(next) {
                name.append(last, Role::FamilyName);
                continue;
            }
            if self.is_initials(next) {
                name.append(next, Role::Initials);
                continue;
            }
            if self.is_first_name(next) {
                name.append(next, Role::FirstName);
                continue;
            }
            if matches!(
                name.last_role,
                Role::FirstName | Role::Initials | Role::TitleBefore
            ) {
                if let Some(surname) = self.surname_after_particles(next) {
                    name.append(surname, Role::FamilyName);
                    continue;
                }
            }
            return;
        }
    }

    /// `van Kampen` after a first name: the capitalised word closing a
    /// particle run that starts at `start`
    fn surname_after_particles(&self, start: usize) -> Option<usize> {
        let mut k = start;
        while k < self.tokens.len() && self.is_particle(k) {
            if k + 1 < self.tokens.len() && !self.links(k, k + 1) {
                return None;
            }
            k += 1;
        }
        let surname = self.tokens.get(k)?;
        let plausible = k > start
            && surname.is_capitalized()
            && !self.lexicon.is_whitelisted(surname.text)
            && !self.lexicon.is_calendar_word(surname.text);
        plausible.then_some(k)
    }

    /// A person cue word on the same line directly before or after the name
    fn has_cue(&self, name: &Name) -> bool {
        let first = name.first;
        if first >= 1 && self.same_line(first - 1, first) {
            if self.lexicon.is_person_cue_before(self.word(first - 1)) {
                return true;
            }
            if first >= 2 && self.same_line(first - 2, first - 1) {
                let phrase = format!("{} {}", self.word(first - 2), self.word(first - 1));
                if self.lexicon.is_person_cue_before(&phrase) {
                    return true;
                }
            }
        }
        let next = name.last + 1;
        next < self.tokens.len()
            && self.same_line(name.last, next)
            && self.lexicon.is_person_cue_after(self.word(next))
    }

    /// Byte end of the name; initials and titles keep their dot
    fn end_of(&self, name: &Name) -> usize {
        let last = &self.tokens[name.last];
        match name.last_role {
            Role::Initials | Role::TitleBefore | Role::TitleAfter => last.end_with_dot(),
            _ => last.end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::text::slice_chars;
    use test_case::test_case;

    const LEXICON: &str = r#"
[names]
family = ["Hendrix", "Jansen", "Berg, van den", "Visser", "Bakker", "Dijk, van"]
first = ["Ward", "Emma", "Tom"]
particles = ["van", "de", "den", "der"]

[locations]
prepositions = ["in", "te"]
cities = ["Nijmegen"]

[dates]
months = ["mei"]
days = ["maandag"]

[titles]
before = ["dr", "dhr", "mevr", "prof"]
after = ["phd", "jr"]

[cues]
person_before = ["collega", "besproken met"]
person_after = ["radioloog"]

[whitelist]
words = ["visser", "bakker", "tom", "verslag"]
abbreviations = ["CT", "MRI"]
"#;

    fn detected(text: &str) -> Vec<String> {
        let lexicon = Lexicon::from_toml(LEXICON).unwrap();
        PersonDetector::new()
            .detect(text, &lexicon)
            .iter()
            .map(|s| slice_chars(text, s.start, s.end).unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_surname_comma_first_name_is_one_span() {
        let text = "Voorbeeld van Hendrix, Ward.";
        let lexicon = Lexicon::from_toml(LEXICON).unwrap();
        let spans = PersonDetector::new().detect(text, &lexicon);
        assert_eq!(spans.len(), 1);
        assert_eq!((spans[0].start, spans[0].end), (14, 27));
    }

    #[test_case("Besproken met dr. J. van den Berg.", &["dr. J. van den Berg"])]
    #[test_case("Gezien door Emma Jansen vandaag", &["Emma Jansen"])]
    #[test_case("Supervisie: Jansen, J.H.", &["Jansen, J.H."])]
    #[test_case("Verslag door Emma van Kampen", &["Emma van Kampen"])]
    #[test_case("Gedicteerd door Xander Hendrix", &["Xander Hendrix"])]
    #[test_case("Uitgevoerd door Tom Jansen", &["Tom Jansen"])]
    #[test_case("Auteur: Jansen-Hendrix", &["Jansen-Hendrix"])]
    #[test_case("Beoordeeld door Hendrix PhD.", &["Hendrix PhD."])]
    #[test_case("Ward van Dijk belde", &["Ward van Dijk"])]
    fn test_detects_person(text: &str, expected: &[&str]) {
        assert_eq!(detected(text), expected);
    }

    #[test_case("Dhr. Visser werd gebeld", &["Dhr. Visser"]; "title confirms whitelisted name")]
    #[test_case("Overlegd met collega Visser", &["Visser"]; "cue confirms and is excluded")]
    #[test_case("Besproken met Bakker", &["Bakker"]; "two word cue")]
    #[test_case("De visser ving een vis", &[]; "lower case word")]
    #[test_case("Visser ving een vis", &[]; "whitelisted name without evidence")]
    #[test_case("Tom belde", &[]; "whitelisted first name alone")]
    #[test_case("Verslag Jansen", &["Jansen"]; "sentence start is not absorbed")]
    #[test_case("CT Jansen", &["Jansen"]; "abbreviation is not initials")]
    #[test_case("In mei gezien", &[]; "calendar words")]
    #[test_case("van <PERSOON>, Ward", &["Ward"]; "placeholder is not a name")]
    fn test_person_edge_cases(text: &str, expected: &[&str]) {
        assert_eq!(detected(text), expected);
    }

    #[test]
    fn test_line_break_splits_names() {
        assert_eq!(detected("Jansen\nWard"), vec!["Jansen", "Ward"]);
    }

    #[test]
    fn test_cue_after_name() {
        assert_eq!(detected("Visser radioloog"), vec!["Visser"]);
    }
}
