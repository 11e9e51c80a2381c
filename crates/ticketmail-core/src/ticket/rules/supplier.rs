//! Supplier name and supplier code extraction.

use super::patterns::SUPPLIER_NUMBER;
use super::{first_match, FieldExtractor, FieldMatch, LabelRule};
use crate::models::ticket::Field;
use crate::text::Paragraphs;

/// Supplier name labels, highest priority first.
///
/// "Supplier Name" is the dedicated field of the ticket form; "Supplier:"
/// shows up in free-text descriptions and "Brand" only on older templates.
pub const SUPPLIER_NAME_RULES: [LabelRule; 3] = [
    LabelRule::next("supplier_name", "supplier name"),
    LabelRule::next("supplier_colon", "supplier:"),
    LabelRule::next("brand", "brand"),
];

/// Supplier extractor combining the name and the supplier number.
pub struct SupplierExtractor;

impl SupplierExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Supplier name from the first label rule that matches.
    pub fn extract_name(&self, paragraphs: &Paragraphs) -> Option<FieldMatch<String>> {
        first_match(&SUPPLIER_NAME_RULES, paragraphs)
    }

    /// Supplier code; every paragraph is scanned and the last match is kept.
    pub fn extract_code(&self, paragraphs: &Paragraphs) -> Option<FieldMatch<String>> {
        paragraphs
            .iter()
            .enumerate()
            .filter_map(|(index, p)| {
                SUPPLIER_NUMBER
                    .captures_iter(p)
                    .last()
                    .map(|caps| FieldMatch::new(caps[1].to_string(), index, "supplier_number"))
            })
            .last()
    }
}

impl Default for SupplierExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for SupplierExtractor {
    type Output = String;

    fn extract(&self, paragraphs: &Paragraphs) -> Option<FieldMatch<String>> {
        match (self.extract_name(paragraphs), self.extract_code(paragraphs)) {
            (Some(name), Some(code)) => Some(FieldMatch::new(
                format!("{} ({})", name.value, code.value),
                name.paragraph,
                name.rule,
            )),
            (Some(name), None) => Some(name),
            (None, Some(code)) => Some(code),
            (None, None) => None,
        }
    }
}

/// Extract the supplier, or `[Supplier]` when neither name nor code is present.
pub fn extract_supplier(paragraphs: &Paragraphs) -> String {
    SupplierExtractor::new()
        .extract(paragraphs)
        .map(|m| m.value)
        .unwrap_or_else(|| Field::Supplier.placeholder().to_string())
}
