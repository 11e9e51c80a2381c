//! The two supplier letter templates.

use super::{render_table, Block};
use crate::models::email::RenderMode;
use crate::models::ticket::{ExtractedFields, Field, TemplateKind};

/// Body blocks for `kind`, in order.
pub fn template_blocks(
    kind: TemplateKind,
    fields: &ExtractedFields,
    sign_off: &str,
    mode: RenderMode,
) -> Vec<Block> {
    match kind {
        TemplateKind::PriceVariance => price_variance(fields, sign_off, mode),
        TemplateKind::ArticleNotOrdered => article_not_ordered(fields, sign_off, mode),
    }
}

/// Subject line for the email.
pub fn subject_line(kind: TemplateKind, fields: &ExtractedFields) -> String {
    let supplier = fields.text_or_placeholder(Field::Supplier);
    match kind {
        TemplateKind::PriceVariance => format!(
            "Price deviation on invoice {} - {}",
            fields.text_or_placeholder(Field::InvoiceNumber),
            supplier
        ),
        TemplateKind::ArticleNotOrdered => format!(
            "Articles delivered without order - {} - {}",
            supplier,
            fields.text_or_placeholder(Field::ShippingNotice)
        ),
    }
}

fn price_variance(fields: &ExtractedFields, sign_off: &str, mode: RenderMode) -> Vec<Block> {
    let supplier = fields.text_or_placeholder(Field::Supplier);
    let invoice = fields.text_or_placeholder(Field::InvoiceNumber);
    let shipping = fields.text_or_placeholder(Field::ShippingNotice);

    vec![
        Block::Text(format!("Dear {supplier} team,")),
        Block::Text(format!(
            "during the invoice verification of your invoice {invoice} (shipping notice {shipping}) \
             we found deviations between the prices agreed in our purchase order and the prices you invoiced."
        )),
        Block::Text("The affected positions are listed below:".to_string()),
        render_table(fields.table.as_ref(), mode),
        Block::Text(format!(
            "Please review the positions and send us a credit note for the total position difference, \
             or a corrected invoice, quoting invoice number {invoice}. \
             Until then the invoice remains blocked for payment."
        )),
        Block::Text(
            "If you believe the invoiced prices are correct, please send us the order confirmation \
             showing the agreed prices."
                .to_string(),
        ),
        Block::Text("Thank you in advance for your cooperation.".to_string()),
        Block::Text(format!("Kind regards,\n{sign_off}")),
    ]
}

fn article_not_ordered(fields: &ExtractedFields, sign_off: &str, mode: RenderMode) -> Vec<Block> {
    let supplier = fields.text_or_placeholder(Field::Supplier);
    let invoice = fields.text_or_placeholder(Field::InvoiceNumber);
    let shipping = fields.text_or_placeholder(Field::ShippingNotice);
    let article = fields.text_or_placeholder(Field::ArticleInfo);
    let breakdown = fields.text_or_placeholder(Field::QuantityBreakdown);

    vec![
        Block::Text(format!("Dear {supplier} team,")),
        Block::Text(format!(
            "with shipping notice {shipping} (invoice {invoice}) we received articles \
             that were not ordered. The goods have been moved to our quarantine storage."
        )),
        Block::Text(format!("Article information:\n{article}")),
        Block::Text("Affected positions:".to_string()),
        render_table(fields.table.as_ref(), mode),
        Block::Text(format!("Quantity and size breakdown:\n{breakdown}")),
        Block::Text(
            "Please let us know within 14 days whether the goods should be returned at your expense \
             or whether you will send us a matching order confirmation. After this period the goods \
             will be returned to you."
                .to_string(),
        ),
        Block::Text("Thank you in advance for your cooperation.".to_string()),
        Block::Text(format!("Kind regards,\n{sign_off}")),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_lines() {
        let fields = ExtractedFields {
            supplier: Some("Acme".to_string()),
            invoice_number: Some("INV-1".to_string()),
            ..Default::default()
        };
        assert_eq!(
            subject_line(TemplateKind::PriceVariance, &fields),
            "Price deviation on invoice INV-1 - Acme"
        );
        assert_eq!(
            subject_line(TemplateKind::ArticleNotOrdered, &fields),
            "Articles delivered without order - Acme - [SN Info]"
        );
    }

    #[test]
    fn test_article_template_uses_all_fields() {
        let blocks = template_blocks(
            TemplateKind::ArticleNotOrdered,
            &ExtractedFields::default(),
            "Jamie",
            RenderMode::Plain,
        );
        let text: String = blocks
            .iter()
            .map(|b| match b {
                Block::Text(t) | Block::Markup(t) => t.as_str(),
            })
            .collect::<Vec<_>>()
            .join("\n");
        for field in TemplateKind::ArticleNotOrdered.fields() {
            assert!(text.contains(field.placeholder()), "{:?}", field);
        }
    }
}
