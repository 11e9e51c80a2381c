//! Supplier invoice number extraction.

use super::patterns::SUPPLIER_INVOICE_NUMBER;
use super::{FieldExtractor, FieldMatch, LabelRule};
use crate::models::ticket::Field;
use crate::text::Paragraphs;

const INVOICE_LABEL: LabelRule = LabelRule::next("invoice_next_paragraph", "supplier invoice number");

/// Invoice number extractor.
///
/// The value normally sits in the paragraph after the label; when the label
/// is the last paragraph, an inline `Supplier Invoice Number: X` is tried.
pub struct InvoiceNumberExtractor;

impl InvoiceNumberExtractor {
    pub fn new() -> Self {
        Self
    }

    fn extract_inline(&self, paragraphs: &Paragraphs) -> Option<FieldMatch<String>> {
        let index = paragraphs.position_of(INVOICE_LABEL.label)?;
        let caps = SUPPLIER_INVOICE_NUMBER.captures(paragraphs.get(index)?)?;
        Some(FieldMatch::new(caps[1].to_string(), index, "invoice_inline"))
    }
}

impl Default for InvoiceNumberExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for InvoiceNumberExtractor {
    type Output = String;

    fn extract(&self, paragraphs: &Paragraphs) -> Option<FieldMatch<String>> {
        INVOICE_LABEL
            .apply(paragraphs)
            .or_else(|| self.extract_inline(paragraphs))
    }
}

/// Extract the invoice number, or `[Invoice Number]`.
pub fn extract_invoice_number(paragraphs: &Paragraphs) -> String {
    InvoiceNumberExtractor::new()
        .extract(paragraphs)
        .map(|m| m.value)
        .unwrap_or_else(|| Field::InvoiceNumber.placeholder().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_paragraph() {
        let p = Paragraphs::from_text("Supplier Invoice Number\n  INV-2024-0042  \nAmount");
        assert_eq!(extract_invoice_number(&p), "INV-2024-0042");
    }

    #[test]
    fn test_inline_when_label_is_last() {
        let p = Paragraphs::from_text("Intro\nSupplier invoice number: 99817");
        assert_eq!(extract_invoice_number(&p), "99817");
    }

    #[test]
    fn test_missing() {
        let p = Paragraphs::from_text("Invoice\n123");
        assert_eq!(extract_invoice_number(&p), "[Invoice Number]");
    }

    #[test]
    fn test_label_without_value() {
        let p = Paragraphs::from_text("Supplier Invoice Number:");
        assert_eq!(extract_invoice_number(&p), "[Invoice Number]");
    }
}
