//! Rule-based ticket parser: classification plus every field extractor.

use serde::Serialize;
use tracing::{debug, info};

use crate::models::ticket::{ExtractedFields, Field, TableBlock, TemplateKind};
use crate::text::Paragraphs;

use super::classifier::{classify, Classification, ClassificationSource};
use super::rules::{
    ArticleInfoExtractor, BreakdownExtractor, FieldExtractor, FieldMatch, InvoiceNumberExtractor,
    PriceTableExtractor, ShippingNoticeExtractor, SupplierExtractor, TableLinesExtractor,
};

/// Where a field value was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchRecord {
    pub field: Field,
    pub paragraph: usize,
    pub rule: &'static str,
}

/// Result of ticket extraction.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    /// Template the ticket was classified as.
    pub kind: TemplateKind,
    /// How the kind was decided.
    pub classified_by: ClassificationSource,
    /// Extracted fields; missing ones render as placeholders.
    pub fields: ExtractedFields,
    /// Provenance of each found field.
    pub matches: Vec<MatchRecord>,
    /// One entry per template field left as a placeholder.
    pub warnings: Vec<String>,
    /// Number of paragraphs examined.
    pub paragraph_count: usize,
}

/// Trait for ticket parsing.
pub trait TicketParser {
    /// Classify the ticket and extract its fields.
    fn parse(&self, paragraphs: &Paragraphs, hint: Option<TemplateKind>) -> ExtractionResult;

    /// Parse from a raw text blob.
    fn parse_text(&self, text: &str, hint: Option<TemplateKind>) -> ExtractionResult {
        self.parse(&Paragraphs::from_text(text), hint)
    }
}

/// Ticket parser running the label/regex rules.
pub struct RuleTicketParser {
    /// Window searched for "PO Price" after a price table header.
    header_window: usize,
}

impl RuleTicketParser {
    /// Create a new parser with default settings.
    pub fn new() -> Self {
        Self { header_window: 10 }
    }

    /// Set the price table header window.
    pub fn with_header_window(mut self, window: usize) -> Self {
        self.header_window = window;
        self
    }

    fn extract_table(&self, kind: TemplateKind, paragraphs: &Paragraphs) -> Option<FieldMatch<TableBlock>> {
        match kind {
            TemplateKind::PriceVariance => PriceTableExtractor::new()
                .with_header_window(self.header_window)
                .extract(paragraphs)
                .map(|m| m.map(TableBlock::PriceRows)),
            TemplateKind::ArticleNotOrdered => TableLinesExtractor
                .extract(paragraphs)
                .map(|m| m.map(TableBlock::Lines)),
        }
    }
}

impl Default for RuleTicketParser {
    fn default() -> Self {
        Self::new()
    }
}

fn record<T>(matches: &mut Vec<MatchRecord>, field: Field, found: Option<FieldMatch<T>>) -> Option<T> {
    found.map(|m| {
        matches.push(MatchRecord {
            field,
            paragraph: m.paragraph,
            rule: m.rule,
        });
        m.value
    })
}

impl TicketParser for RuleTicketParser {
    fn parse(&self, paragraphs: &Paragraphs, hint: Option<TemplateKind>) -> ExtractionResult {
        info!("Parsing ticket from {} paragraphs", paragraphs.len());

        let Classification { kind, source } = classify(paragraphs, hint);
        let mut matches = Vec::new();

        let fields = ExtractedFields {
            supplier: record(&mut matches, Field::Supplier, SupplierExtractor::new().extract(paragraphs)),
            invoice_number: record(
                &mut matches,
                Field::InvoiceNumber,
                InvoiceNumberExtractor::new().extract(paragraphs),
            ),
            shipping_notice: record(
                &mut matches,
                Field::ShippingNotice,
                ShippingNoticeExtractor.extract(paragraphs),
            ),
            article_info: record(&mut matches, Field::ArticleInfo, ArticleInfoExtractor.extract(paragraphs)),
            quantity_breakdown: record(&mut matches, Field::QuantityBreakdown, BreakdownExtractor.extract(paragraphs))
                .map(|lines| lines.join("\n")),
            table: record(&mut matches, Field::Table, self.extract_table(kind, paragraphs)),
        };

        let warnings: Vec<String> = kind
            .fields()
            .iter()
            .filter(|f| !fields.is_present(**f))
            .map(|f| format!("Could not extract {}, using {}", f.label(), f.placeholder()))
            .collect();

        for m in &matches {
            debug!("Found {} at paragraph {} via {}", m.field.label(), m.paragraph, m.rule);
        }

        ExtractionResult {
            kind,
            classified_by: source,
            fields,
            matches,
            warnings,
            paragraph_count: paragraphs.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PRICE_TICKET: &str = "\
Ticket PRICE-1041
Supplier Name
Acme Corp
Supplier Number: X123
Supplier Invoice Number
INV-7781
Shipping Notice
SN-4410
Config SKU
Supp. Article #
Supp. Color
PO Price (after discount)
Invoiced Price (after discount)
% Deviation
Total Position Difference
Invoiced Qty
ABC123-XY
art1
red
10
12
20%
2
5
Generated at 02.03.2024 09:12";

    const ARTICLE_TICKET: &str = "\
Ticket QS-220
Brand
Nordic Knit
Articles were not ordered and moved to quarantine storage.
Article Information
Wool scarf, grey
4006381333931
M
12
ZX-001
Config 10021, 12 pcs";

    #[test]
    fn test_parse_price_ticket() {
        let result = RuleTicketParser::new().parse_text(PRICE_TICKET, None);

        assert_eq!(result.kind, TemplateKind::PriceVariance);
        assert_eq!(result.classified_by, ClassificationSource::PriceMarkers);
        assert_eq!(result.fields.supplier.as_deref(), Some("Acme Corp (X123)"));
        assert_eq!(result.fields.invoice_number.as_deref(), Some("INV-7781"));
        assert_eq!(result.fields.shipping_notice.as_deref(), Some("SN-4410"));
        match result.fields.table {
            Some(TableBlock::PriceRows(ref rows)) => assert_eq!(rows.len(), 1),
            ref other => panic!("unexpected table {other:?}"),
        }
        assert!(result.warnings.is_empty(), "{:?}", result.warnings);
    }

    #[test]
    fn test_parse_article_ticket() {
        let result = RuleTicketParser::new().parse_text(ARTICLE_TICKET, None);

        assert_eq!(result.kind, TemplateKind::ArticleNotOrdered);
        assert_eq!(result.classified_by, ClassificationSource::ArticleMarkers);
        assert_eq!(result.fields.supplier.as_deref(), Some("Nordic Knit"));
        assert_eq!(result.fields.article_info.as_deref(), Some("Wool scarf, grey"));
        assert_eq!(result.fields.quantity_breakdown.as_deref(), Some("4006381333931 M 12 ZX-001"));
        assert_eq!(
            result.fields.table,
            Some(TableBlock::Lines(vec!["Config 10021, 12 pcs".to_string()]))
        );
        assert_eq!(result.fields.invoice_number, None);
        assert_eq!(result.warnings.len(), 2);
    }

    #[test]
    fn test_empty_ticket_warns_for_every_template_field() {
        let result = RuleTicketParser::new().parse(&Paragraphs::default(), None);
        assert_eq!(result.kind, TemplateKind::ArticleNotOrdered);
        assert_eq!(result.classified_by, ClassificationSource::Fallback);
        assert_eq!(result.warnings.len(), Field::ALL.len());
        assert!(result.matches.is_empty());
    }

    #[test]
    fn test_hint_switches_table_extractor() {
        let result = RuleTicketParser::new()
            .parse_text(ARTICLE_TICKET, Some(TemplateKind::PriceVariance));
        assert_eq!(result.kind, TemplateKind::PriceVariance);
        assert_eq!(result.fields.table, None);
    }

    #[test]
    fn test_match_provenance() {
        let result = RuleTicketParser::new().parse_text(PRICE_TICKET, None);
        let supplier = result
            .matches
            .iter()
            .find(|m| m.field == Field::Supplier)
            .unwrap();
        assert_eq!(supplier.paragraph, 2);
        assert_eq!(supplier.rule, "supplier_name");
    }
}
