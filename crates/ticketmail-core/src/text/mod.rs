//! Paragraph normalization.

mod normalizer;

pub use normalizer::{decode_text, Paragraphs};
