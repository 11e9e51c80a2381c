//! Quantity/size breakdown of not-ordered articles.

use super::patterns::ARTICLE_CODE;
use super::{FieldExtractor, FieldMatch};
use crate::models::ticket::Field;
use crate::text::Paragraphs;

/// Paragraphs following an article code: size, quantity, secondary identifier.
const DETAIL_PARAGRAPHS: usize = 3;

/// Builds one line per 13-digit article code from the code and its details.
///
/// Every code starts a line, including one that also sits in the detail slots
/// of the code before it.
pub struct BreakdownExtractor;

impl FieldExtractor for BreakdownExtractor {
    type Output = Vec<String>;

    fn extract(&self, paragraphs: &Paragraphs) -> Option<FieldMatch<Vec<String>>> {
        let cells = paragraphs.as_slice();
        let mut first = None;
        let mut lines = Vec::new();
        let mut index = 0;

        while index < cells.len() {
            if !ARTICLE_CODE.is_match(&cells[index]) {
                index += 1;
                continue;
            }

            first.get_or_insert(index);
            let end = (index + 1 + DETAIL_PARAGRAPHS).min(cells.len());
            lines.push(cells[index..end].join(" "));
            index += 1;
        }

        first.map(|index| FieldMatch::new(lines, index, "article_code"))
    }
}

/// Extract the breakdown lines joined by newlines, or `[Number/size breakdown]`.
pub fn extract_quantity_breakdown(paragraphs: &Paragraphs) -> String {
    BreakdownExtractor
        .extract(paragraphs)
        .map(|m| m.value.join("\n"))
        .unwrap_or_else(|| Field::QuantityBreakdown.placeholder().to_string())
}
