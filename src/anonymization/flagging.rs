//! Flagging engine
//!
//! Marks a report for manual review when its original text contains one of
//! the operator-supplied keywords. Matching is a case-sensitive substring
//! test; the text itself is never altered.

/// Keywords that route a report to manual review
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagList {
    keywords: Vec<String>,
}

impl FlagList {
    /// Build a flag list; keywords are trimmed and empty entries ignored
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();
        Self { keywords }
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Check whether a text must be flagged
    pub fn is_flagged(&self, text: &str) -> bool {
        self.keywords.iter().any(|k| text.contains(k.as_str()))
    }

    /// Keywords found in a text, in list order
    pub fn matches<'a>(&'a self, text: &str) -> Vec<&'a str> {
        self.keywords
            .iter()
            .filter(|k| text.contains(k.as_str()))
            .map(String::as_str)
            .collect()
    }
}
