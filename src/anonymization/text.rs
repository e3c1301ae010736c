//! Text helpers shared by the lexicon, detectors and redaction
//!
//! Regex engines and the tokenizer work in byte offsets; spans are stored as
//! character offsets. [`CharIndex`] converts between the two.

use deunicode::deunicode;

/// Byte/character offset map for one text
#[derive(Debug, Clone)]
pub struct CharIndex {
    /// Byte offset of every character start, plus the total byte length
    boundaries: Vec<usize>,
}

impl CharIndex {
    pub fn new(text: &str) -> Self {
        let mut boundaries: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
        boundaries.push(text.len());
        Self { boundaries }
    }

    /// Number of characters in the text
    pub fn char_len(&self) -> usize {
        self.boundaries.len() - 1
    }

    /// Character offset of a byte offset that lies on a char boundary
    pub fn char_of_byte(&self, byte: usize) -> usize {
        match self.boundaries.binary_search(&byte) {
            Ok(idx) => idx,
            Err(idx) => idx.saturating_sub(1),
        }
    }

    /// Byte offset of a character offset, clamped to the text end
    pub fn byte_of_char(&self, ch: usize) -> usize {
        let last = self.boundaries.len() - 1;
        self.boundaries[ch.min(last)]
    }
}

/// Slice a text by character offsets
///
/// Returns `None` when the range is inverted or exceeds the text.
pub fn slice_chars(text: &str, start: usize, end: usize) -> Option<&str> {
    if start > end {
        return None;
    }
    let index = CharIndex::new(text);
    if end > index.char_len() {
        return None;
    }
    Some(&text[index.byte_of_char(start)..index.byte_of_char(end)])
}

/// Number of characters in a text
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Transliterate to ASCII and lowercase for lexicon lookups
///
/// `"Patiënt"` and `"patient"` fold to the same key. The result may differ in
/// length from the input and is never used for offsets.
pub fn fold(s: &str) -> String {
    deunicode(s).to_lowercase()
}
