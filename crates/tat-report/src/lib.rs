//! TAT Report - Export of analysis results
//!
//! A [`Report`] snapshots the input text, the knowledge-graph data and the run
//! statistics. It renders as pretty JSON, CSV or plain text; PDF output is
//! recognised but not produced.

mod render;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tat_core::{AnalysisResult, TatError};
use tat_extractor::{Analysis, GraphData, GraphLink, GraphNode};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Unsupported report format: {0}")]
    UnsupportedFormat(ReportFormat),

    #[error("Failed to serialize report: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ReportError>;

impl From<ReportError> for TatError {
    fn from(err: ReportError) -> Self {
        TatError::Report(err.to_string())
    }
}

// ============================================================================
// Formats
// ============================================================================

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Json,
    Csv,
    Txt,
    Pdf,
}

impl ReportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Txt => "txt",
            Self::Pdf => "pdf",
        }
    }

    /// Parse a format name; anything unrecognised falls back to JSON
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_else(|_| {
            tracing::debug!("Unknown report format {:?}, using json", s);
            Self::Json
        })
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Csv => "text/csv",
            Self::Txt => "text/plain",
            Self::Pdf => "application/pdf",
        }
    }

    /// `text-analysis-report-YYYY-MM-DD.<ext>`
    pub fn file_name(&self, date: NaiveDate) -> String {
        format!("text-analysis-report-{}.{}", date.format("%Y-%m-%d"), self.as_str())
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = TatError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "txt" | "text" => Ok(Self::Txt),
            "pdf" => Ok(Self::Pdf),
            other => Err(TatError::InvalidInput(format!("unknown report format: {other}"))),
        }
    }
}

// ============================================================================
// Report
// ============================================================================

/// Entity and relation counts shown in the report header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub entity_count: usize,
    pub relation_count: usize,
}

/// Snapshot of one analysis, ready to render
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// UTC, RFC 3339 with milliseconds
    pub timestamp: String,
    pub input_text: String,
    pub entities: Vec<GraphNode>,
    pub relations: Vec<GraphLink>,
    /// e.g. "42ms"
    pub processing_time: String,
    pub statistics: Statistics,

    #[serde(skip)]
    generated_at: DateTime<Utc>,
}

impl Report {
    pub fn new(input_text: impl Into<String>, graph: &GraphData, result: &AnalysisResult) -> Self {
        Self {
            timestamp: String::new(),
            input_text: input_text.into(),
            entities: graph.nodes.clone(),
            relations: graph.links.clone(),
            processing_time: result.processing_time_label(),
            statistics: Statistics {
                entity_count: result.entity_count(),
                relation_count: result.relation_count(),
            },
            generated_at: DateTime::<Utc>::MIN_UTC,
        }
        .with_timestamp(Utc::now())
    }

    pub fn from_analysis(input_text: impl Into<String>, analysis: &Analysis) -> Self {
        Self::new(input_text, &analysis.graph, &analysis.result)
    }

    pub fn with_timestamp(mut self, at: DateTime<Utc>) -> Self {
        self.timestamp = at.to_rfc3339_opts(SecondsFormat::Millis, true);
        self.generated_at = at;
        self
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    /// Render in `format`
    pub fn render(&self, format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::Json => Ok(serde_json::to_string_pretty(self)?),
            ReportFormat::Csv => Ok(render::csv(self)),
            ReportFormat::Txt => Ok(render::text(self)),
            ReportFormat::Pdf => Err(ReportError::UnsupportedFormat(format)),
        }
    }

    /// Render and name the download
    pub fn export(&self, format: ReportFormat) -> Result<ExportedReport> {
        let body = self.render(format)?;
        tracing::info!("Exported {} report ({} bytes)", format, body.len());

        Ok(ExportedReport {
            file_name: format.file_name(self.generated_at.date_naive()),
            mime_type: format.mime_type(),
            body,
        })
    }
}

/// A rendered report with its download name and content type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedReport {
    pub file_name: String,
    pub mime_type: &'static str,
    pub body: String,
}
