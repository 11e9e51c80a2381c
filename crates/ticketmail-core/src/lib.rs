//! Core library for turning ticket documents into supplier emails.
//!
//! This crate provides:
//! - Document loading (`.docx` containers and plain text) into paragraphs
//! - Template classification (price variance vs. article not ordered)
//! - Rule-based field extraction with placeholder fallbacks
//! - Plain-text and HTML email rendering

pub mod document;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod render;
pub mod text;
pub mod ticket;

pub use document::{read_paragraphs, DocumentFormat, DocxExtractor};
pub use error::{DocumentError, Result, TicketError};
pub use models::config::TicketmailConfig;
pub use models::email::{RenderMode, RenderedEmail};
pub use models::ticket::{ExtractedFields, Field, TableBlock, TableRow, TemplateKind};
pub use pipeline::{EmailRequest, GeneratedEmail, TicketPipeline};
pub use render::EmailRenderer;
pub use text::Paragraphs;
pub use ticket::{classify, ExtractionResult, RuleTicketParser, TicketParser};
