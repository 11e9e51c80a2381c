//! Email rendering.
//!
//! Templates produce a list of blocks; the render mode decides how blocks and
//! line breaks are encoded. Field values are never validated, so placeholders
//! reach the reviewer verbatim.

mod templates;

pub use templates::{subject_line, template_blocks};

use tracing::debug;

use crate::models::email::{RenderMode, RenderedEmail};
use crate::models::ticket::{ExtractedFields, TableBlock, TableRow, TemplateKind, PRICE_TABLE_HEADER};

/// One piece of an email body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Text; may contain line breaks.
    Text(String),
    /// Already encoded for the current mode; emitted unchanged.
    Markup(String),
}

/// Renders extracted fields into a finished email.
pub struct EmailRenderer {
    mode: RenderMode,
}

impl EmailRenderer {
    pub fn new(mode: RenderMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Render the email for `kind`, signed with `sign_off`.
    pub fn render(&self, kind: TemplateKind, fields: &ExtractedFields, sign_off: &str) -> RenderedEmail {
        let blocks = template_blocks(kind, fields, sign_off, self.mode);
        let body = self.join_blocks(&blocks);
        let subject = subject_line(kind, fields);

        debug!("Rendered {} email ({} blocks, {} bytes)", kind, blocks.len(), body.len());

        RenderedEmail {
            kind,
            mode: self.mode,
            subject,
            body,
        }
    }

    fn join_blocks(&self, blocks: &[Block]) -> String {
        let encoded: Vec<String> = blocks
            .iter()
            .map(|block| match (block, self.mode) {
                (Block::Text(text), RenderMode::Plain) => text.clone(),
                (Block::Text(text), RenderMode::Html) => escape_html(text).replace('\n', "<br>\n"),
                (Block::Markup(markup), _) => markup.clone(),
            })
            .collect();

        match self.mode {
            RenderMode::Plain => encoded.join("\n\n"),
            RenderMode::Html => encoded.join("<br>\n<br>\n"),
        }
    }
}

impl Default for EmailRenderer {
    fn default() -> Self {
        Self::new(RenderMode::Plain)
    }
}

/// Render the ticket's table block, or the table placeholder when it is missing.
pub fn render_table(table: Option<&TableBlock>, mode: RenderMode) -> Block {
    match table {
        Some(TableBlock::PriceRows(rows)) if !rows.is_empty() => {
            Block::Markup(render_price_rows(rows, mode))
        }
        Some(TableBlock::Lines(lines)) if !lines.is_empty() => Block::Text(lines.join("\n")),
        _ => Block::Text(crate::models::ticket::Field::Table.placeholder().to_string()),
    }
}

/// Render price rows under the fixed eight-column header.
pub fn render_price_rows(rows: &[TableRow], mode: RenderMode) -> String {
    match mode {
        RenderMode::Plain => {
            let mut lines = Vec::with_capacity(rows.len() + 1);
            lines.push(PRICE_TABLE_HEADER.join(" | "));
            for row in rows {
                lines.push(row.cells().join(" | ").trim_end().to_string());
            }
            lines.join("\n")
        }
        RenderMode::Html => {
            let mut html = String::from("<table border=\"1\" cellpadding=\"4\" cellspacing=\"0\">\n<tr>");
            for title in PRICE_TABLE_HEADER {
                html.push_str("<th>");
                html.push_str(&escape_html(title));
                html.push_str("</th>");
            }
            html.push_str("</tr>\n");
            for row in rows {
                html.push_str("<tr>");
                for cell in row.cells() {
                    html.push_str("<td>");
                    html.push_str(&escape_html(cell));
                    html.push_str("</td>");
                }
                html.push_str("</tr>\n");
            }
            html.push_str("</table>");
            html
        }
    }
}

/// Escape text for inclusion in HTML.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
