//! TAT Parser - File ingestion for the annotation pipeline
//!
//! Supports reading:
//! - Plain text files
//! - Microsoft Word (DOCX)
//! - PDF documents
//!
//! Each parser implements the `DocumentParser` trait and turns raw bytes into
//! sanitized text. [`FileLoader`] validates size and type before anything is
//! read, then runs the parser off the async runtime.

pub mod docx;
pub mod pdf;
pub mod text;

pub use docx::DocxParser;
pub use pdf::PdfParser;
pub use text::PlainTextParser;

use std::path::Path;

use tat_core::UploadConfig;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

const MIB: u64 = 1024 * 1024;

/// Errors that can occur while loading a file
#[derive(Error, Debug)]
pub enum ParserError {
    /// Extension is not on the whitelist or has no parser
    #[error("Unsupported file type")]
    UnsupportedFormat(String),

    /// Declared content type is not one of the accepted MIME types
    #[error("Invalid file type. Please upload a .txt, .docx, or .pdf file")]
    InvalidMimeType(String),

    /// File is larger than the configured limit
    #[error("File size exceeds {} limit", display_limit(.limit))]
    FileTooLarge { size: u64, limit: u64 },

    /// IO error while reading the file
    #[error("Error reading file {path}: {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Error reading PDF file: {0}")]
    PdfError(String),

    #[error("Error reading DOCX file: {0}")]
    DocxError(String),

    /// The blocking parse task did not complete
    #[error("Parsing task failed: {0}")]
    TaskFailed(String),
}

fn display_limit(limit: &u64) -> String {
    let limit = *limit;
    if limit >= MIB && limit % MIB == 0 {
        format!("{}MB", limit / MIB)
    } else {
        format!("{limit} bytes")
    }
}

pub type Result<T> = std::result::Result<T, ParserError>;

impl From<ParserError> for tat_core::TatError {
    fn from(err: ParserError) -> Self {
        match err {
            ParserError::IoError { source, .. } => tat_core::TatError::Io(source),
            other => tat_core::TatError::InvalidInput(other.to_string()),
        }
    }
}

// ============================================================================
// File Types
// ============================================================================

/// Supported file types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
    PlainText,
    Docx,
    Pdf,
}

impl FileType {
    pub const ALL: [FileType; 3] = [Self::PlainText, Self::Docx, Self::Pdf];

    /// Detect file type from extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "txt" => Some(Self::PlainText),
            "docx" => Some(Self::Docx),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }

    /// Detect file type from the last extension of a file name
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    pub fn from_mime_type(mime: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.mime_type() == mime)
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::PlainText => "txt",
            Self::Docx => "docx",
            Self::Pdf => "pdf",
        }
    }

    /// Get MIME type
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::PlainText => "text/plain",
            Self::Docx => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            Self::Pdf => "application/pdf",
        }
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PlainText => write!(f, "text"),
            Self::Docx => write!(f, "docx"),
            Self::Pdf => write!(f, "pdf"),
        }
    }
}

// ============================================================================
// Parsed Document
// ============================================================================

/// Text read from an uploaded or local file
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    /// File name as given by the caller
    pub file_name: String,

    pub file_type: FileType,

    /// Sanitized text content
    pub content: String,

    /// Number of pages, for paged formats
    pub page_count: Option<u32>,
}

impl ParsedDocument {
    pub fn new(file_name: impl Into<String>, file_type: FileType) -> Self {
        Self {
            file_name: file_name.into(),
            file_type,
            content: String::new(),
            page_count: None,
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_page_count(mut self, pages: u32) -> Self {
        self.page_count = Some(pages);
        self
    }

    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }

    /// Get total word count (approximate)
    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }
}

// ============================================================================
// Parser Trait
// ============================================================================

/// Trait for file-format parsers
pub trait DocumentParser: Send + Sync {
    /// Parse raw file bytes into a document named `file_name`
    fn parse_bytes(&self, file_name: &str, bytes: &[u8]) -> Result<ParsedDocument>;

    fn file_type(&self) -> FileType;
}

fn parser_for(file_type: FileType) -> Box<dyn DocumentParser> {
    match file_type {
        FileType::PlainText => Box::new(PlainTextParser),
        FileType::Docx => Box::new(DocxParser::new()),
        FileType::Pdf => Box::new(PdfParser::new()),
    }
}

// ============================================================================
// Loader
// ============================================================================

/// Validates and reads files within the upload limits
#[derive(Debug, Clone)]
pub struct FileLoader {
    max_file_size: u64,
    allowed: Vec<FileType>,
}

impl FileLoader {
    pub fn new() -> Self {
        Self::from_config(&UploadConfig::default())
    }

    /// Build from upload limits; unknown extensions in the config are ignored
    pub fn from_config(config: &UploadConfig) -> Self {
        let allowed = config
            .allowed_extensions
            .iter()
            .filter_map(|ext| {
                let file_type = FileType::from_extension(ext);
                if file_type.is_none() {
                    tracing::warn!("Ignoring unsupported extension in upload config: {}", ext);
                }
                file_type
            })
            .collect();

        Self {
            max_file_size: config.max_file_size,
            allowed,
        }
    }

    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = bytes;
        self
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    /// Check size and extension without reading anything
    pub fn validate(&self, file_name: &str, size: u64) -> Result<FileType> {
        if size > self.max_file_size {
            return Err(ParserError::FileTooLarge {
                size,
                limit: self.max_file_size,
            });
        }

        let file_type = FileType::from_path(Path::new(file_name))
            .filter(|t| self.allowed.contains(t))
            .ok_or_else(|| ParserError::UnsupportedFormat(file_name.to_string()))?;

        Ok(file_type)
    }

    /// Check a declared content type against the accepted formats
    pub fn validate_mime(&self, mime: &str) -> Result<FileType> {
        FileType::from_mime_type(mime)
            .filter(|t| self.allowed.contains(t))
            .ok_or_else(|| ParserError::InvalidMimeType(mime.to_string()))
    }

    /// Read and parse a file from disk
    pub async fn load_file(&self, path: &Path) -> Result<ParsedDocument> {
        let display = path.display().to_string();
        let io_error = |source| ParserError::IoError {
            path: display.clone(),
            source,
        };

        let metadata = tokio::fs::metadata(path).await.map_err(io_error)?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(&display)
            .to_string();
        self.validate(&file_name, metadata.len())?;

        let bytes = tokio::fs::read(path).await.map_err(io_error)?;
        self.load_bytes(&file_name, bytes).await
    }

    /// Parse file content received in memory (e.g. an upload)
    pub async fn load_bytes(&self, file_name: &str, bytes: Vec<u8>) -> Result<ParsedDocument> {
        let file_type = self.validate(file_name, bytes.len() as u64)?;
        tracing::info!("Reading {} ({}, {} bytes)", file_name, file_type, bytes.len());

        let name = file_name.to_string();
        let doc = tokio::task::spawn_blocking(move || parser_for(file_type).parse_bytes(&name, &bytes))
            .await
            .map_err(|e| ParserError::TaskFailed(e.to_string()))??;

        tracing::debug!(
            "Read {} chars, {} words from {}",
            doc.char_count(),
            doc.word_count(),
            doc.file_name
        );
        Ok(doc)
    }
}

impl Default for FileLoader {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_file_type_detection() {
        assert_eq!(FileType::from_extension("pdf"), Some(FileType::Pdf));
        assert_eq!(FileType::from_extension("PDF"), Some(FileType::Pdf));
        assert_eq!(FileType::from_extension("docx"), Some(FileType::Docx));
        assert_eq!(FileType::from_extension("txt"), Some(FileType::PlainText));
        assert_eq!(FileType::from_extension("xlsx"), None);
        assert_eq!(FileType::from_path(Path::new("notes.final.TXT")), Some(FileType::PlainText));
        assert_eq!(FileType::from_path(Path::new("README")), None);
    }

    #[test]
    fn test_mime_types() {
        assert_eq!(FileType::from_mime_type("application/pdf"), Some(FileType::Pdf));
        assert_eq!(FileType::from_mime_type("text/html"), None);
        for file_type in FileType::ALL {
            assert_eq!(FileType::from_mime_type(file_type.mime_type()), Some(file_type));
        }
    }

    #[test]
    fn test_size_checked_before_type() {
        let loader = FileLoader::new();
        let err = loader.validate("huge.exe", 6 * MIB).unwrap_err();
        assert_eq!(err.to_string(), "File size exceeds 5MB limit");

        assert!(loader.validate("exact.txt", 5 * MIB).is_ok());
    }

    #[test]
    fn test_unsupported_extension() {
        let err = FileLoader::new().validate("sheet.xlsx", 10).unwrap_err();
        assert_eq!(err.to_string(), "Unsupported file type");
    }

    #[test]
    fn test_config_whitelist() {
        let config = UploadConfig {
            max_file_size: 100,
            allowed_extensions: vec!["txt".to_string(), "exe".to_string()],
        };
        let loader = FileLoader::from_config(&config);

        assert!(loader.validate("a.txt", 100).is_ok());
        assert!(matches!(
            loader.validate("a.pdf", 10),
            Err(ParserError::UnsupportedFormat(_))
        ));
        assert_eq!(
            loader.validate("a.txt", 101).unwrap_err().to_string(),
            "File size exceeds 100 bytes limit"
        );
    }

    #[test]
    fn test_validate_mime() {
        let loader = FileLoader::new();
        assert_eq!(loader.validate_mime("text/plain").unwrap(), FileType::PlainText);
        let err = loader.validate_mime("image/png").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid file type. Please upload a .txt, .docx, or .pdf file"
        );
    }

    #[tokio::test]
    async fn test_load_text_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, "Tim Cook <script>alert(1)</script>visited Cupertino.").unwrap();

        let doc = FileLoader::new().load_file(&path).await.unwrap();
        assert_eq!(doc.file_name, "report.txt");
        assert_eq!(doc.file_type, FileType::PlainText);
        assert_eq!(doc.content, "Tim Cook visited Cupertino.");
        assert_eq!(doc.word_count(), 4);
    }

    #[tokio::test]
    async fn test_load_file_too_large() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        file.write_all(&[b'a'; 64]).unwrap();

        let loader = FileLoader::new().with_max_file_size(32);
        let err = loader.load_file(file.path()).await.unwrap_err();
        assert!(matches!(err, ParserError::FileTooLarge { size: 64, limit: 32 }));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let err = FileLoader::new()
            .load_file(Path::new("/nonexistent/input.txt"))
            .await
            .unwrap_err();
        assert!(matches!(err, ParserError::IoError { .. }));
    }

    #[tokio::test]
    async fn test_load_corrupt_docx() {
        let err = FileLoader::new()
            .load_bytes("broken.docx", b"not a zip archive".to_vec())
            .await
            .unwrap_err();
        assert!(matches!(err, ParserError::DocxError(_)));
    }

    #[test]
    fn test_into_tat_error() {
        let err: tat_core::TatError = ParserError::UnsupportedFormat("x.exe".to_string()).into();
        assert!(matches!(err, tat_core::TatError::InvalidInput(_)));
    }
}
