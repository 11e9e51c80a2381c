//! Turns raw extracted text into an ordered sequence of paragraphs.

use serde::{Deserialize, Serialize};

use crate::error::DocumentError;

/// Ordered, trimmed, non-empty lines of a document in reading order.
///
/// Extraction relies on positional adjacency (a label paragraph followed by its
/// value), so order is preserved and duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Paragraphs(Vec<String>);

impl Paragraphs {
    /// Split a text blob on line breaks and normalize each line.
    pub fn from_text(text: &str) -> Self {
        Self(split_lines(text).collect())
    }

    /// Normalize an already-split sequence of lines.
    ///
    /// Elements that still contain line breaks are split further.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut paragraphs = Vec::new();
        for line in lines {
            paragraphs.extend(split_lines(line.as_ref()));
        }
        Self(paragraphs)
    }

    /// Decode UTF-8 bytes and normalize them.
    pub fn from_bytes(data: &[u8]) -> Result<Self, DocumentError> {
        let text = decode_text(data)?;
        Ok(Self::from_text(&text))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Case-insensitive containment test on a single paragraph.
    ///
    /// `needle` must already be lowercase.
    pub fn contains_at(&self, index: usize, needle: &str) -> bool {
        self.get(index)
            .is_some_and(|p| p.to_lowercase().contains(needle))
    }

    /// Whether any paragraph contains `needle` (lowercase), ignoring case.
    pub fn any_contains(&self, needle: &str) -> bool {
        self.iter().any(|p| p.to_lowercase().contains(needle))
    }

    /// Index of the first paragraph containing `needle` (lowercase), ignoring case.
    pub fn position_of(&self, needle: &str) -> Option<usize> {
        self.iter().position(|p| p.to_lowercase().contains(needle))
    }

    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

impl<'a> IntoIterator for &'a Paragraphs {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Decode a text stream as strict UTF-8, dropping a leading byte order mark.
pub fn decode_text(data: &[u8]) -> Result<String, DocumentError> {
    let data = data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data);
    Ok(String::from_utf8(data.to_vec())?)
}

fn split_lines(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(['\n', '\r'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_text_drops_blank_lines() {
        let paragraphs = Paragraphs::from_text("  Supplier Name \n\n   \r\nAcme Corp\r\n\t\n");
        assert_eq!(paragraphs.as_slice(), &["Supplier Name", "Acme Corp"]);
    }

    #[test]
    fn test_order_and_duplicates_preserved() {
        let paragraphs = Paragraphs::from_text("b\na\nb\n\na");
        assert_eq!(paragraphs.as_slice(), &["b", "a", "b", "a"]);
    }

    #[test]
    fn test_no_case_normalization() {
        let paragraphs = Paragraphs::from_text("PO Price");
        assert_eq!(paragraphs.get(0), Some("PO Price"));
        assert!(paragraphs.any_contains("po price"));
    }

    #[test]
    fn test_from_lines_splits_embedded_breaks() {
        let paragraphs = Paragraphs::from_lines(["first\nsecond", "  ", "third "]);
        assert_eq!(paragraphs.as_slice(), &["first", "second", "third"]);
    }

    #[test]
    fn test_never_yields_empty_elements() {
        let inputs = ["", "\n\n\n", " \t \n x \n\t", "a\r\rb", "\u{3000}\n"];
        for input in inputs {
            let paragraphs = Paragraphs::from_text(input);
            assert!(paragraphs.iter().all(|p| !p.trim().is_empty()), "{input:?}");
        }
    }

    #[test]
    fn test_decode_rejects_invalid_utf8() {
        let err = Paragraphs::from_bytes(&[0x66, 0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, DocumentError::Decode(_)));
    }

    #[test]
    fn test_decode_strips_bom() {
        let text = decode_text(b"\xEF\xBB\xBFhello").unwrap();
        assert_eq!(text, "hello");
    }

    #[test]
    fn test_position_of_ignores_case() {
        let paragraphs = Paragraphs::from_text("one\nShipping Notice\nSN-1");
        assert_eq!(paragraphs.position_of("shipping notice"), Some(1));
        assert!(paragraphs.contains_at(1, "notice"));
        assert!(!paragraphs.contains_at(5, "notice"));
    }
}
