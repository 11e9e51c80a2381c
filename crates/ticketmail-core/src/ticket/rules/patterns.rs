//! Common regex patterns for ticket extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Supplier code, e.g. "Supplier Number: X123"
    pub static ref SUPPLIER_NUMBER: Regex = Regex::new(
        r"(?i)supplier number:\s*([A-Za-z0-9]+)"
    ).unwrap();

    // Inline invoice number after its label
    pub static ref SUPPLIER_INVOICE_NUMBER: Regex = Regex::new(
        r"(?i)supplier invoice number[:\s]*([^:\s]\S*)"
    ).unwrap();

    // First cell of a price table row, e.g. "ABC123-XY"
    pub static ref CONFIG_SKU: Regex = Regex::new(
        r"^[A-Za-z0-9]{3,}-[A-Za-z0-9]{2,}$"
    ).unwrap();

    // 13-digit article identifier (EAN-13 style)
    pub static ref ARTICLE_CODE: Regex = Regex::new(
        r"^\d{13}$"
    ).unwrap();
}
