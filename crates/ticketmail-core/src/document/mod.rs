//! Ticket document loading.

mod docx;

pub use docx::DocxExtractor;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::DocumentError;
use crate::text::Paragraphs;

/// Result type for document operations.
pub type Result<T> = std::result::Result<T, DocumentError>;

/// Format of an input document, detected from its leading bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    /// Office Open XML container (`.docx`).
    Docx,
    /// Legacy OLE2 compound file (`.doc`).
    LegacyDoc,
    /// Already-extracted plain text.
    PlainText,
}

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

impl DocumentFormat {
    /// Detect the document format from its magic bytes.
    pub fn detect(data: &[u8]) -> Self {
        if data.starts_with(ZIP_MAGIC) {
            DocumentFormat::Docx
        } else if data.starts_with(OLE_MAGIC) {
            DocumentFormat::LegacyDoc
        } else {
            DocumentFormat::PlainText
        }
    }
}

/// Read a document into paragraphs, whatever supported format it is in.
///
/// Legacy `.doc` input fails with [`DocumentError::LegacyFormat`]; callers
/// convert it first.
pub fn read_paragraphs(data: &[u8]) -> Result<Paragraphs> {
    let format = DocumentFormat::detect(data);
    debug!("Detected document format {:?} ({} bytes)", format, data.len());

    match format {
        DocumentFormat::Docx => DocxExtractor::new().extract_paragraphs(data),
        DocumentFormat::LegacyDoc => Err(DocumentError::LegacyFormat),
        DocumentFormat::PlainText => Paragraphs::from_bytes(data),
    }
}
