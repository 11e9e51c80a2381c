//! Rule-based field extractors for ticket documents.
//!
//! Flattened tickets put labels and values on separate paragraphs, so most
//! extractors are a list of [`LabelRule`]s: find a label, read the value a
//! fixed number of paragraphs further on. Rules are tried in order and the
//! first one that yields a value wins.

pub mod article;
pub mod breakdown;
pub mod invoice;
pub mod patterns;
pub mod price_table;
pub mod shipping;
pub mod supplier;
pub mod table;

pub use article::{extract_article_info, ArticleInfoExtractor};
pub use breakdown::{extract_quantity_breakdown, BreakdownExtractor};
pub use invoice::{extract_invoice_number, InvoiceNumberExtractor};
pub use price_table::{extract_price_table, PriceTableExtractor};
pub use shipping::{extract_shipping_notice, ShippingNoticeExtractor};
pub use supplier::{extract_supplier, SupplierExtractor};
pub use table::{extract_table_lines, TableLinesExtractor};

use serde::Serialize;

use crate::text::Paragraphs;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field, or `None` when the ticket does not contain it.
    fn extract(&self, paragraphs: &Paragraphs) -> Option<FieldMatch<Self::Output>>;
}

/// An extracted value with where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Index of the paragraph the value was read from.
    pub paragraph: usize,
    /// Name of the rule that matched.
    pub rule: &'static str,
}

impl<T> FieldMatch<T> {
    pub fn new(value: T, paragraph: usize, rule: &'static str) -> Self {
        Self {
            value,
            paragraph,
            rule,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> FieldMatch<U> {
        FieldMatch {
            value: f(self.value),
            paragraph: self.paragraph,
            rule: self.rule,
        }
    }
}

/// "Label paragraph, value `offset` paragraphs later."
#[derive(Debug, Clone, Copy)]
pub struct LabelRule {
    pub name: &'static str,
    /// Lowercase substring identifying the label paragraph.
    pub label: &'static str,
    pub offset: usize,
}

impl LabelRule {
    /// Rule reading the value from the paragraph right after the label.
    pub const fn next(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            offset: 1,
        }
    }

    /// Apply the rule at its first label occurrence.
    pub fn apply(&self, paragraphs: &Paragraphs) -> Option<FieldMatch<String>> {
        let index = paragraphs.position_of(self.label)? + self.offset;
        let value = paragraphs.get(index)?.trim();
        if value.is_empty() {
            return None;
        }
        Some(FieldMatch::new(value.to_string(), index, self.name))
    }
}

/// Evaluate rules in priority order; the first that yields a value wins.
pub fn first_match(rules: &[LabelRule], paragraphs: &Paragraphs) -> Option<FieldMatch<String>> {
    rules.iter().find_map(|rule| rule.apply(paragraphs))
}
