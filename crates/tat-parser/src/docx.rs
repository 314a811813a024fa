//! DOCX parser using docx-rs
//!
//! Extracts raw text: each body paragraph, and each paragraph inside a table
//! cell, becomes its own block separated by a blank line. Styles and
//! headings are ignored.

use docx_rs::{read_docx, DocumentChild, Paragraph, ParagraphChild, RunChild, TableCellContent, TableChild, TableRowChild};
use tat_core::sanitize;

use crate::{DocumentParser, FileType, ParsedDocument, ParserError, Result};

const BLOCK_SEPARATOR: &str = "\n\n";

/// DOCX document parser
pub struct DocxParser {
    /// Include text from tables
    pub include_tables: bool,
}

impl DocxParser {
    pub fn new() -> Self {
        Self { include_tables: true }
    }

    pub fn with_tables(mut self, enabled: bool) -> Self {
        self.include_tables = enabled;
        self
    }
}

impl Default for DocxParser {
    fn default() -> Self {
        Self::new()
    }
}

fn paragraph_text(para: &Paragraph) -> String {
    let mut text = String::new();
    for child in &para.children {
        if let ParagraphChild::Run(run) = child {
            for run_child in &run.children {
                if let RunChild::Text(t) = run_child {
                    text.push_str(&t.text);
                }
            }
        }
    }
    text
}

impl DocumentParser for DocxParser {
    fn parse_bytes(&self, file_name: &str, bytes: &[u8]) -> Result<ParsedDocument> {
        let docx = read_docx(bytes).map_err(|e| ParserError::DocxError(e.to_string()))?;

        let mut content = String::new();
        for child in &docx.document.children {
            match child {
                DocumentChild::Paragraph(para) => {
                    content.push_str(&paragraph_text(para));
                    content.push_str(BLOCK_SEPARATOR);
                }
                DocumentChild::Table(tbl) if self.include_tables => {
                    for row in &tbl.rows {
                        let TableChild::TableRow(tr) = row;
                        for cell in &tr.cells {
                            let TableRowChild::TableCell(tc) = cell;
                            for cell_child in &tc.children {
                                if let TableCellContent::Paragraph(para) = cell_child {
                                    content.push_str(&paragraph_text(para));
                                    content.push_str(BLOCK_SEPARATOR);
                                }
                            }
                        }
                    }
                }
                _ => {}
            }
        }

        Ok(ParsedDocument::new(file_name, FileType::Docx).with_content(sanitize(&content)))
    }

    fn file_type(&self) -> FileType {
        FileType::Docx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_rs::{Docx, Run, Table, TableCell, TableRow};
    use std::io::Cursor;

    fn pack(docx: Docx) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        docx.build().pack(&mut cursor).unwrap();
        cursor.into_inner()
    }

    fn para(text: &str) -> Paragraph {
        Paragraph::new().add_run(Run::new().add_text(text))
    }

    #[test]
    fn test_paragraphs_become_blocks() {
        let bytes = pack(
            Docx::new()
                .add_paragraph(para("Apple Inc. announced results."))
                .add_paragraph(para("Tim Cook <b>spoke</b>.")),
        );

        let doc = DocxParser::new().parse_bytes("a.docx", &bytes).unwrap();
        assert_eq!(doc.file_type, FileType::Docx);
        assert_eq!(doc.content, "Apple Inc. announced results.\n\nTim Cook spoke.\n\n");
    }

    #[test]
    fn test_table_cells() {
        let table = Table::new(vec![TableRow::new(vec![
            TableCell::new().add_paragraph(para("Cupertino")),
            TableCell::new().add_paragraph(para("Redmond")),
        ])]);
        let bytes = pack(Docx::new().add_paragraph(para("Offices")).add_table(table));

        let doc = DocxParser::new().parse_bytes("a.docx", &bytes).unwrap();
        assert_eq!(doc.content, "Offices\n\nCupertino\n\nRedmond\n\n");

        let doc = DocxParser::new()
            .with_tables(false)
            .parse_bytes("a.docx", &bytes)
            .unwrap();
        assert_eq!(doc.content, "Offices\n\n");
    }

    #[test]
    fn test_not_a_docx() {
        let err = DocxParser::new().parse_bytes("a.docx", b"plain").unwrap_err();
        assert!(err.to_string().starts_with("Error reading DOCX file:"));
    }
}
