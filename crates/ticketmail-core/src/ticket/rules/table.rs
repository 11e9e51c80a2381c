//! Free-form table block: every paragraph that looks like a delimited data row.

use super::{FieldExtractor, FieldMatch};
use crate::models::ticket::Field;
use crate::text::Paragraphs;

/// Collects paragraphs holding both a comma and a digit.
pub struct TableLinesExtractor;

impl FieldExtractor for TableLinesExtractor {
    type Output = Vec<String>;

    fn extract(&self, paragraphs: &Paragraphs) -> Option<FieldMatch<Vec<String>>> {
        let mut first = None;
        let mut lines = Vec::new();

        for (index, p) in paragraphs.iter().enumerate() {
            if p.contains(',') && p.chars().any(|c| c.is_ascii_digit()) {
                first.get_or_insert(index);
                lines.push(p.to_string());
            }
        }

        first.map(|index| FieldMatch::new(lines, index, "comma_and_digit"))
    }
}

/// Extract the delimited lines joined by newlines, or `[Table information]`.
pub fn extract_table_lines(paragraphs: &Paragraphs) -> String {
    TableLinesExtractor
        .extract(paragraphs)
        .map(|m| m.value.join("\n"))
        .unwrap_or_else(|| Field::Table.placeholder().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_comma_digit_lines() {
        let p = Paragraphs::from_text(
            "Hello, world\nSKU 1, size M, 4 pcs\nno comma 5\nSKU 2, size L, 2 pcs",
        );
        assert_eq!(extract_table_lines(&p), "SKU 1, size M, 4 pcs\nSKU 2, size L, 2 pcs");
    }

    #[test]
    fn test_placeholder_when_absent() {
        let p = Paragraphs::from_text("Hello, world\n12 items");
        assert_eq!(extract_table_lines(&p), "[Table information]");
    }
}
