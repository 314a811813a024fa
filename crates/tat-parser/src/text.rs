//! Plain text parser

use tat_core::sanitize;

use crate::{DocumentParser, FileType, ParsedDocument, Result};

/// UTF-8 text; invalid sequences are replaced rather than rejected
pub struct PlainTextParser;

impl DocumentParser for PlainTextParser {
    fn parse_bytes(&self, file_name: &str, bytes: &[u8]) -> Result<ParsedDocument> {
        let text = String::from_utf8_lossy(bytes);
        let text = text.strip_prefix('\u{feff}').unwrap_or(&text);

        Ok(ParsedDocument::new(file_name, FileType::PlainText).with_content(sanitize(text)))
    }

    fn file_type(&self) -> FileType {
        FileType::PlainText
    }
}
