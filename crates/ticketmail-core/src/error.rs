//! Error types for the ticketmail-core library.

use thiserror::Error;

/// Main error type for the ticketmail library.
#[derive(Error, Debug)]
pub enum TicketError {
    /// Document decoding or container error.
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while turning input bytes into paragraphs.
///
/// These are the only failures the pipeline surfaces; missing fields are
/// absorbed into placeholders further down.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// Input bytes are not valid UTF-8 text.
    #[error("failed to decode text: {0}")]
    Decode(#[from] std::string::FromUtf8Error),

    /// The `.docx` container could not be opened.
    #[error("failed to open document container: {0}")]
    Archive(String),

    /// A required part is missing from the container.
    #[error("document part not found: {0}")]
    MissingPart(String),

    /// The document XML is malformed.
    #[error("XML parsing error: {0}")]
    Xml(String),

    /// Legacy binary Word file; it has to be converted before extraction.
    #[error("legacy .doc format must be converted to .docx first")]
    LegacyFormat,
}

impl From<zip::result::ZipError> for DocumentError {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::FileNotFound => {
                DocumentError::MissingPart("word/document.xml".to_string())
            }
            other => DocumentError::Archive(other.to_string()),
        }
    }
}

/// Result type for the ticketmail library.
pub type Result<T> = std::result::Result<T, TicketError>;
