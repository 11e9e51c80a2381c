//! Shipping notice reference extraction.

use super::{first_match, FieldExtractor, FieldMatch, LabelRule};
use crate::models::ticket::Field;
use crate::text::Paragraphs;

const SHIPPING_NOTICE_RULES: [LabelRule; 1] = [LabelRule::next("shipping_notice", "shipping notice")];

pub struct ShippingNoticeExtractor;

impl FieldExtractor for ShippingNoticeExtractor {
    type Output = String;

    fn extract(&self, paragraphs: &Paragraphs) -> Option<FieldMatch<String>> {
        first_match(&SHIPPING_NOTICE_RULES, paragraphs)
    }
}

/// Extract the shipping notice reference, or `[SN Info]`.
pub fn extract_shipping_notice(paragraphs: &Paragraphs) -> String {
    ShippingNoticeExtractor
        .extract(paragraphs)
        .map(|m| m.value)
        .unwrap_or_else(|| Field::ShippingNotice.placeholder().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shipping_notice() {
        let p = Paragraphs::from_text("Shipping Notice Number\nSN-778812 / 12.03.2024");
        assert_eq!(extract_shipping_notice(&p), "SN-778812 / 12.03.2024");
    }

    #[test]
    fn test_missing() {
        assert_eq!(extract_shipping_notice(&Paragraphs::default()), "[SN Info]");
    }
}
