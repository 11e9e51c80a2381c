//! Ticket data models: template kinds, extracted fields and table rows.

use serde::{Deserialize, Serialize};

use super::email::RenderMode;

/// Which email narrative a ticket gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateKind {
    /// Invoice price discrepancy against the purchase order.
    PriceVariance,
    /// Goods delivered that were never ordered (quarantined).
    ArticleNotOrdered,
}

impl TemplateKind {
    /// Derive a classification hint from an uploaded file name.
    ///
    /// Only price-variance tickets are recognizable by name; anything else
    /// gives no hint and is left to content detection.
    pub fn hint_from_file_name(file_name: &str) -> Option<Self> {
        if file_name.to_lowercase().contains("price") {
            Some(TemplateKind::PriceVariance)
        } else {
            None
        }
    }

    /// Fields the template for this kind interpolates.
    pub fn fields(&self) -> &'static [Field] {
        match self {
            TemplateKind::PriceVariance => &[
                Field::Supplier,
                Field::InvoiceNumber,
                Field::ShippingNotice,
                Field::Table,
            ],
            TemplateKind::ArticleNotOrdered => &Field::ALL,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateKind::PriceVariance => "price_variance",
            TemplateKind::ArticleNotOrdered => "article_not_ordered",
        }
    }
}

impl std::fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named ticket fields, each with a fixed placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Supplier,
    InvoiceNumber,
    ShippingNotice,
    ArticleInfo,
    QuantityBreakdown,
    Table,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Supplier,
        Field::InvoiceNumber,
        Field::ShippingNotice,
        Field::ArticleInfo,
        Field::QuantityBreakdown,
        Field::Table,
    ];

    /// Bracketed text left in the email when the field could not be found.
    pub fn placeholder(&self) -> &'static str {
        match self {
            Field::Supplier => "[Supplier]",
            Field::InvoiceNumber => "[Invoice Number]",
            Field::ShippingNotice => "[SN Info]",
            Field::ArticleInfo => "[Article Info]",
            Field::QuantityBreakdown => "[Number/size breakdown]",
            Field::Table => "[Table information]",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Field::Supplier => "supplier",
            Field::InvoiceNumber => "invoice number",
            Field::ShippingNotice => "shipping notice",
            Field::ArticleInfo => "article info",
            Field::QuantityBreakdown => "quantity breakdown",
            Field::Table => "table",
        }
    }
}

/// Number of cells in a price-variance table row.
pub const PRICE_TABLE_COLUMNS: usize = 8;

/// Fixed header of the price-variance table.
pub const PRICE_TABLE_HEADER: [&str; PRICE_TABLE_COLUMNS] = [
    "Config-SKU",
    "Supp. Article #",
    "Supp. Color",
    "PO Price (after discount)",
    "Invoiced Price (after discount)",
    "% Deviation",
    "Total Position Difference",
    "Invoiced Qty",
];

/// One row of the price-variance table, always exactly eight cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow([String; PRICE_TABLE_COLUMNS]);

impl TableRow {
    /// Build a row, padding with empty cells or dropping extra ones.
    pub fn from_cells<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut iter = cells.into_iter();
        Self(std::array::from_fn(|_| {
            iter.next().map(Into::into).unwrap_or_default()
        }))
    }

    pub fn cells(&self) -> &[String] {
        &self.0
    }
}

/// Tabular block of a ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum TableBlock {
    /// Free-form comma-delimited lines, kept verbatim.
    Lines(Vec<String>),
    /// Structured price-variance rows under [`PRICE_TABLE_HEADER`].
    PriceRows(Vec<TableRow>),
}

impl TableBlock {
    pub fn is_empty(&self) -> bool {
        match self {
            TableBlock::Lines(lines) => lines.is_empty(),
            TableBlock::PriceRows(rows) => rows.is_empty(),
        }
    }
}

/// Fields pulled out of a ticket. `None` means "not found".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_notice: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_info: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity_breakdown: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<TableBlock>,
}

impl ExtractedFields {
    /// Text value of a field, or its placeholder when missing.
    ///
    /// A table reads as its joined lines, or as the plain-text price grid.
    /// The placeholder appears exactly when [`Self::is_present`] is false.
    pub fn text_or_placeholder(&self, field: Field) -> String {
        let value = match field {
            Field::Supplier => self.supplier.clone(),
            Field::InvoiceNumber => self.invoice_number.clone(),
            Field::ShippingNotice => self.shipping_notice.clone(),
            Field::ArticleInfo => self.article_info.clone(),
            Field::QuantityBreakdown => self.quantity_breakdown.clone(),
            Field::Table => match &self.table {
                Some(TableBlock::Lines(lines)) if !lines.is_empty() => Some(lines.join("\n")),
                Some(TableBlock::PriceRows(rows)) if !rows.is_empty() => {
                    Some(crate::render::render_price_rows(rows, RenderMode::Plain))
                }
                _ => None,
            },
        };
        value.unwrap_or_else(|| field.placeholder().to_string())
    }

    pub fn is_present(&self, field: Field) -> bool {
        match field {
            Field::Supplier => self.supplier.is_some(),
            Field::InvoiceNumber => self.invoice_number.is_some(),
            Field::ShippingNotice => self.shipping_notice.is_some(),
            Field::ArticleInfo => self.article_info.is_some(),
            Field::QuantityBreakdown => self.quantity_breakdown.is_some(),
            Field::Table => self.table.as_ref().is_some_and(|t| !t.is_empty()),
        }
    }

    /// Fields that will render as placeholders.
    pub fn missing(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|f| !self.is_present(*f))
            .collect()
    }
}
