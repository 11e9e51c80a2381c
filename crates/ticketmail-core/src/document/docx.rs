//! `.docx` paragraph extraction using zip and quick-xml.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::{debug, trace};

use super::Result;
use crate::error::DocumentError;
use crate::text::Paragraphs;

const DOCUMENT_PART: &str = "word/document.xml";

/// Extracts paragraph text from an Office Open XML word-processing container.
///
/// Every `w:p` element becomes one paragraph, including those inside table
/// cells, so a table flattens to its cells in reading order.
pub struct DocxExtractor {
    max_part_size: u64,
}

impl DocxExtractor {
    pub fn new() -> Self {
        Self {
            max_part_size: 64 * 1024 * 1024,
        }
    }

    /// Limit the uncompressed size of `word/document.xml`.
    pub fn with_max_part_size(mut self, bytes: u64) -> Self {
        self.max_part_size = bytes;
        self
    }

    /// Extract normalized paragraphs from `.docx` bytes.
    pub fn extract_paragraphs(&self, data: &[u8]) -> Result<Paragraphs> {
        let xml = self.read_document_xml(data)?;
        let raw = parse_document_xml(&xml)?;
        debug!("Extracted {} raw paragraphs from {}", raw.len(), DOCUMENT_PART);
        Ok(Paragraphs::from_lines(raw))
    }

    fn read_document_xml(&self, data: &[u8]) -> Result<String> {
        let mut archive = zip::ZipArchive::new(Cursor::new(data))?;
        let part = archive.by_name(DOCUMENT_PART)?;

        if part.size() > self.max_part_size {
            return Err(DocumentError::Archive(format!(
                "{} is {} bytes, limit is {}",
                DOCUMENT_PART,
                part.size(),
                self.max_part_size
            )));
        }

        let mut bytes = Vec::with_capacity(part.size() as usize);
        part.take(self.max_part_size)
            .read_to_end(&mut bytes)
            .map_err(|e| DocumentError::Archive(e.to_string()))?;

        Ok(String::from_utf8(bytes)?)
    }
}

impl Default for DocxExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Walk the document XML and collect the text of every paragraph.
fn parse_document_xml(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);

    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:p" => {
                    // Nested paragraphs (text boxes) flush their parent first.
                    if depth > 0 && !current.is_empty() {
                        paragraphs.push(std::mem::take(&mut current));
                    }
                    depth += 1;
                }
                b"w:t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:tab" if depth > 0 => current.push('\t'),
                b"w:br" | b"w:cr" if depth > 0 => current.push('\n'),
                b"w:p" => paragraphs.push(String::new()),
                _ => {}
            },
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => {
                    depth = depth.saturating_sub(1);
                    paragraphs.push(std::mem::take(&mut current));
                }
                _ => {}
            },
            Ok(Event::Text(e)) if in_text && depth > 0 => {
                let text = e.unescape().map_err(|e| DocumentError::Xml(e.to_string()))?;
                current.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(DocumentError::Xml(format!(
                    "error at position {}: {}",
                    reader.buffer_position(),
                    e
                )));
            }
            _ => {}
        }
    }

    trace!("Parsed {} paragraph elements", paragraphs.len());
    Ok(paragraphs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const SAMPLE_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>Supplier</w:t></w:r><w:r><w:t xml:space="preserve"> Name</w:t></w:r></w:p>
    <w:p><w:r><w:t>Acme &amp; Sons</w:t></w:r></w:p>
    <w:p/>
    <w:tbl>
      <w:tr>
        <w:tc><w:p><w:r><w:t>ABC123-XY</w:t></w:r></w:p></w:tc>
        <w:tc><w:p><w:r><w:t>art1</w:t></w:r></w:p></w:tc>
      </w:tr>
    </w:tbl>
    <w:p><w:r><w:t>line one</w:t><w:br/><w:t>line two</w:t></w:r></w:p>
  </w:body>
</w:document>"#;

    fn build_docx(xml: &str) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut buffer);
            let options = zip::write::SimpleFileOptions::default();
            writer.start_file(DOCUMENT_PART, options).unwrap();
            writer.write_all(xml.as_bytes()).unwrap();
            writer.finish().unwrap();
        }
        buffer.into_inner()
    }

    #[test]
    fn test_parse_document_xml_joins_runs() {
        let raw = parse_document_xml(SAMPLE_XML).unwrap();
        assert_eq!(raw[0], "Supplier Name");
        assert_eq!(raw[1], "Acme & Sons");
    }

    #[test]
    fn test_extract_paragraphs_flattens_table_cells() {
        let data = build_docx(SAMPLE_XML);
        let paragraphs = DocxExtractor::new().extract_paragraphs(&data).unwrap();
        assert_eq!(
            paragraphs.as_slice(),
            &["Supplier Name", "Acme & Sons", "ABC123-XY", "art1", "line one", "line two"]
        );
    }

    #[test]
    fn test_missing_document_part() {
        let mut buffer = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut buffer);
            writer
                .start_file("word/styles.xml", zip::write::SimpleFileOptions::default())
                .unwrap();
            writer.write_all(b"<styles/>").unwrap();
            writer.finish().unwrap();
        }
        let err = DocxExtractor::new()
            .extract_paragraphs(&buffer.into_inner())
            .unwrap_err();
        assert!(matches!(err, DocumentError::MissingPart(_)));
    }

    #[test]
    fn test_corrupt_container() {
        let err = DocxExtractor::new()
            .extract_paragraphs(b"PK\x03\x04 not really a zip")
            .unwrap_err();
        assert!(matches!(err, DocumentError::Archive(_)));
    }

    #[test]
    fn test_part_size_limit() {
        let data = build_docx(SAMPLE_XML);
        let err = DocxExtractor::new()
            .with_max_part_size(16)
            .extract_paragraphs(&data)
            .unwrap_err();
        assert!(matches!(err, DocumentError::Archive(_)));
    }
}
