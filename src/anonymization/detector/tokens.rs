//! Word tokenizer with byte offsets
//!
//! Splits on whitespace and on `,;:()[]{}!?"`. A trailing dot is detached
//! from the token and recorded in [`Token::dot`], so `"J."` yields the token
//! `J` with `dot == true` and `"Nijmegen."` yields `Nijmegen`.

/// One token of a report text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// Token text without trailing dots
    pub text: &'a str,
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset just past the token text (trailing dots excluded)
    pub end: usize,
    /// A dot directly follows the token
    pub dot: bool,
}

impl<'a> Token<'a> {
    /// Byte offset just past the token including its trailing dot
    pub fn end_with_dot(&self) -> usize {
        if self.dot {
            self.end + 1
        } else {
            self.end
        }
    }

    /// First character is an upper-case letter
    pub fn is_capitalized(&self) -> bool {
        self.text.chars().next().is_some_and(char::is_uppercase)
    }

    /// Token consists of ASCII digits only
    pub fn is_digits(&self) -> bool {
        !self.text.is_empty() && self.text.bytes().all(|b| b.is_ascii_digit())
    }
}

/// Separator between two consecutive tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gap {
    /// Whitespace only
    Space,
    /// The left token's dot followed by whitespace
    DotSpace,
    /// A comma followed by whitespace
    Comma,
    /// Anything else, including line breaks
    Other,
}

fn is_delimiter(c: char) -> bool {
    c.is_whitespace()
        || matches!(
            c,
            ',' | ';' | ':' | '(' | ')' | '[' | ']' | '{' | '}' | '!' | '?' | '"'
        )
}

/// Tokenize a text
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;

    for (idx, ch) in text.char_indices() {
        if is_delimiter(ch) {
            if let Some(s) = start.take() {
                push_token(text, s, idx, &mut tokens);
            }
        } else if start.is_none() {
            start = Some(idx);
        }
    }
    if let Some(s) = start {
        push_token(text, s, text.len(), &mut tokens);
    }

    tokens
}

fn push_token<'a>(text: &'a str, start: usize, end: usize, tokens: &mut Vec<Token<'a>>) {
    let raw = &text[start..end];
    let trimmed = raw.trim_end_matches('.');
    if trimmed.is_empty() {
        return;
    }
    tokens.push(Token {
        text: trimmed,
        start,
        end: start + trimmed.len(),
        dot: trimmed.len() < raw.len(),
    });
}

/// Classify the text between two tokens
pub fn gap(text: &str, left: &Token<'_>, right: &Token<'_>) -> Gap {
    let between = &text[left.end..right.start];
    if between.contains('\n') || between.contains('\r') {
        return Gap::Other;
    }
    if let Some(rest) = between.strip_prefix('.') {
        return if !rest.is_empty() && rest.chars().all(char::is_whitespace) {
            Gap::DotSpace
        } else {
            Gap::Other
        };
    }
    if between.is_empty() {
        return Gap::Other;
    }
    if between.chars().all(char::is_whitespace) {
        return Gap::Space;
    }
    if let Some(rest) = between.strip_prefix(',') {
        if !rest.is_empty() && rest.chars().all(char::is_whitespace) {
            return Gap::Comma;
        }
    }
    Gap::Other
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_detaches_trailing_dot() {
        let tokens = tokenize("Dr. J. Jansen, Nijmegen.");
        let texts: Vec<_> = tokens.iter().map(|t| t.text).collect();
        assert_eq!(texts, vec!["Dr", "J", "Jansen", "Nijmegen"]);
        assert!(tokens[0].dot);
        assert!(!tokens[2].dot);
        assert!(tokens[3].dot);
    }

    #[test]
    fn test_token_offsets_are_bytes() {
        let text = "Patiënt woont";
        let tokens = tokenize(text);
        assert_eq!(&text[tokens[1].start..tokens[1].end], "woont");
    }

    #[test]
    fn test_gap_kinds() {
        let text = "Hendrix, Ward. Dr. Jansen\nVisser  Bos";
        let t = tokenize(text);
        assert_eq!(gap(text, &t[0], &t[1]), Gap::Comma);
        assert_eq!(gap(text, &t[1], &t[2]), Gap::DotSpace);
        assert_eq!(gap(text, &t[2], &t[3]), Gap::DotSpace);
        assert_eq!(gap(text, &t[3], &t[4]), Gap::Other);
        assert_eq!(gap(text, &t[4], &t[5]), Gap::Space);
    }

    #[test]
    fn test_placeholders_stay_single_tokens() {
        let tokens = tokenize("van <PERSOON>.");
        assert_eq!(tokens[1].text, "<PERSOON>");
        assert!(!tokens[1].is_capitalized());
    }
}
