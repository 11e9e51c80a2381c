//! Structured price-variance table extraction.
//!
//! The ticket's price table flattens to one paragraph per cell. Rows are
//! recovered by looking for a Config-SKU paragraph and taking it together with
//! the seven paragraphs after it.

use tracing::trace;

use super::patterns::CONFIG_SKU;
use super::{FieldExtractor, FieldMatch};
use crate::models::email::RenderMode;
use crate::models::ticket::{Field, TableRow, PRICE_TABLE_COLUMNS};
use crate::render::render_price_rows;
use crate::text::Paragraphs;

const FOOTER_MARKER: &str = "generated at";

/// Price table extractor.
pub struct PriceTableExtractor {
    /// Paragraphs after the header line that may hold the "PO Price" column.
    header_window: usize,
}

impl PriceTableExtractor {
    pub fn new() -> Self {
        Self { header_window: 10 }
    }

    pub fn with_header_window(mut self, window: usize) -> Self {
        self.header_window = window;
        self
    }

    /// Index of the header paragraph: mentions "config" and "sku" and has
    /// "po price" within the window that starts at it.
    pub fn find_header(&self, paragraphs: &Paragraphs) -> Option<usize> {
        let lowered: Vec<String> = paragraphs.iter().map(str::to_lowercase).collect();

        lowered.iter().enumerate().find_map(|(index, p)| {
            if !(p.contains("config") && p.contains("sku")) {
                return None;
            }
            let end = index
                .saturating_add(self.header_window)
                .saturating_add(1)
                .min(lowered.len());
            lowered[index..end]
                .iter()
                .any(|w| w.contains("po price"))
                .then_some(index)
        })
    }

    fn collect_rows(&self, paragraphs: &Paragraphs, header: usize) -> Vec<TableRow> {
        let cells = paragraphs.as_slice();
        let mut rows = Vec::new();
        let mut index = header + 1;

        while index < cells.len() {
            let p = &cells[index];
            if p.to_lowercase().contains(FOOTER_MARKER) {
                break;
            }
            if CONFIG_SKU.is_match(p) {
                let end = (index + PRICE_TABLE_COLUMNS).min(cells.len());
                trace!("Price row at paragraph {}: {}", index, p);
                rows.push(TableRow::from_cells(cells[index..end].iter().cloned()));
                index += PRICE_TABLE_COLUMNS;
            } else {
                index += 1;
            }
        }

        rows
    }
}

impl Default for PriceTableExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for PriceTableExtractor {
    type Output = Vec<TableRow>;

    fn extract(&self, paragraphs: &Paragraphs) -> Option<FieldMatch<Vec<TableRow>>> {
        let header = self.find_header(paragraphs)?;
        let rows = self.collect_rows(paragraphs, header);
        if rows.is_empty() {
            return None;
        }
        Some(FieldMatch::new(rows, header, "config_sku_header"))
    }
}

/// Extract and render the price table, or `[Table information]` when no
/// header or no rows are found.
pub fn extract_price_table(paragraphs: &Paragraphs, mode: RenderMode) -> String {
    PriceTableExtractor::new()
        .extract(paragraphs)
        .map(|m| render_price_rows(&m.value, mode))
        .unwrap_or_else(|| Field::Table.placeholder().to_string())
}
