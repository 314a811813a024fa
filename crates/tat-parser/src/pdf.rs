//! PDF parser using pdf-extract
//!
//! Pages are split on form feeds in the extracted text; each page is
//! sanitized on its own and followed by a newline.

use tat_core::sanitize;

use crate::{DocumentParser, FileType, ParsedDocument, ParserError, Result};

const PAGE_BREAK: char = '\x0C';

/// PDF document parser
pub struct PdfParser;

impl PdfParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PdfParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Sanitize page by page and join; returns the text and page count
pub fn join_pages(raw: &str) -> (String, u32) {
    let raw = raw.strip_suffix(PAGE_BREAK).unwrap_or(raw);
    if raw.trim().is_empty() {
        return (String::new(), 0);
    }

    let mut text = String::with_capacity(raw.len());
    let mut pages = 0u32;
    for page in raw.split(PAGE_BREAK) {
        text.push_str(&sanitize(page));
        text.push('\n');
        pages += 1;
    }
    (text, pages)
}

impl DocumentParser for PdfParser {
    fn parse_bytes(&self, file_name: &str, bytes: &[u8]) -> Result<ParsedDocument> {
        // Font parsing inside pdf-extract can panic on malformed input
        let raw = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes))
            .map_err(|_| ParserError::PdfError("extractor panicked".to_string()))?
            .map_err(|e| ParserError::PdfError(e.to_string()))?;

        let (content, pages) = join_pages(&raw);
        if pages == 0 {
            tracing::warn!("No text found in {}", file_name);
        }

        Ok(ParsedDocument::new(file_name, FileType::Pdf)
            .with_content(content)
            .with_page_count(pages))
    }

    fn file_type(&self) -> FileType {
        FileType::Pdf
    }
}
