//! End-to-end pipeline: document bytes to rendered email.

use serde::Serialize;
use tracing::{debug, info};

use crate::document::read_paragraphs;
use crate::error::Result;
use crate::models::config::ExtractionConfig;
use crate::models::email::{RenderMode, RenderedEmail};
use crate::models::ticket::TemplateKind;
use crate::render::EmailRenderer;
use crate::text::Paragraphs;
use crate::ticket::{ExtractionResult, RuleTicketParser, TicketParser};

/// Caller-supplied inputs besides the document itself.
#[derive(Debug, Clone)]
pub struct EmailRequest {
    /// Name the email is signed with.
    pub sign_off: String,
    /// Optional template override, e.g. from the file name.
    pub hint: Option<TemplateKind>,
    /// Output encoding.
    pub mode: RenderMode,
}

impl EmailRequest {
    pub fn new(sign_off: impl Into<String>) -> Self {
        Self {
            sign_off: sign_off.into(),
            hint: None,
            mode: RenderMode::Plain,
        }
    }

    pub fn with_hint(mut self, hint: Option<TemplateKind>) -> Self {
        self.hint = hint;
        self
    }

    pub fn with_mode(mut self, mode: RenderMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Extraction details together with the email built from them.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedEmail {
    pub extraction: ExtractionResult,
    pub email: RenderedEmail,
}

/// Normalizer, extractor and renderer chained together.
pub struct TicketPipeline<P = RuleTicketParser> {
    parser: P,
}

impl TicketPipeline<RuleTicketParser> {
    pub fn new() -> Self {
        Self {
            parser: RuleTicketParser::new(),
        }
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            parser: RuleTicketParser::new().with_header_window(config.header_window),
        }
    }
}

impl Default for TicketPipeline<RuleTicketParser> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: TicketParser> TicketPipeline<P> {
    pub fn with_parser(parser: P) -> Self {
        Self { parser }
    }

    /// Run on document bytes (`.docx` or UTF-8 text).
    ///
    /// Only undecodable input fails; missing fields become placeholders.
    pub fn run(&self, data: &[u8], request: &EmailRequest) -> Result<GeneratedEmail> {
        let paragraphs = read_paragraphs(data)?;
        Ok(self.run_paragraphs(&paragraphs, request))
    }

    /// Run on already-normalized paragraphs.
    pub fn run_paragraphs(&self, paragraphs: &Paragraphs, request: &EmailRequest) -> GeneratedEmail {
        let extraction = self.parser.parse(paragraphs, request.hint);
        for warning in &extraction.warnings {
            debug!("{}", warning);
        }

        let email = EmailRenderer::new(request.mode).render(
            extraction.kind,
            &extraction.fields,
            &request.sign_off,
        );
        info!(
            "Generated {} email with {} placeholder(s)",
            email.kind,
            extraction.warnings.len()
        );

        GeneratedEmail { extraction, email }
    }
}
