//! Rendered email output.

use serde::{Deserialize, Serialize};

use super::ticket::TemplateKind;

/// Textual encoding of the rendered email body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Literal newlines, tables as pipe-separated lines.
    #[default]
    Plain,
    /// Inline markup with `<br>` line breaks and a `<table>` for price rows.
    Html,
}

/// A finished email, ready for a human to review and send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedEmail {
    pub kind: TemplateKind,
    pub mode: RenderMode,
    pub subject: String,
    pub body: String,
}
