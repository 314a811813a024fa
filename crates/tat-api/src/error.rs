//! API error handling

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tat_core::TatError;
use tat_parser::ParserError;
use tat_report::ReportError;
use utoipa::ToSchema;

/// API error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// Error code
    #[schema(example = "BAD_REQUEST")]
    pub code: String,
    /// Human-readable message
    #[schema(example = "Please enter some text to analyze.")]
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }

    pub fn internal_error() -> Self {
        Self::new("INTERNAL_ERROR", "Internal server error")
    }
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    /// Another operation holds the session
    Busy(String),
    PayloadTooLarge(String),
    UnsupportedMediaType(String),
    /// The upload was accepted but could not be read
    Unreadable(String),
    /// A pipeline stage failed
    Analysis(String),
    /// The sample-text provider failed
    Upstream(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ApiError::bad_request(msg)),
            AppError::Busy(msg) => (StatusCode::CONFLICT, ApiError::new("BUSY", msg)),
            AppError::PayloadTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, ApiError::new("FILE_TOO_LARGE", msg))
            }
            AppError::UnsupportedMediaType(msg) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                ApiError::new("UNSUPPORTED_FILE_TYPE", msg),
            ),
            AppError::Unreadable(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::new("UNREADABLE_FILE", msg),
            ),
            AppError::Analysis(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("ANALYSIS_FAILED", msg),
            ),
            AppError::Upstream(msg) => (
                StatusCode::BAD_GATEWAY,
                ApiError::new("UPSTREAM_ERROR", "Sample text provider failed").with_details(msg),
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::internal_error().with_details(msg),
            ),
        };

        if status.is_server_error() {
            tracing::error!("{} {}: {}", status, error.code, error.message);
        }

        (status, Json(error)).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<TatError> for AppError {
    fn from(err: TatError) -> Self {
        match err {
            TatError::InvalidInput(msg) => AppError::BadRequest(msg),
            TatError::Busy(_) => AppError::Busy(err.to_string()),
            TatError::UpstreamParse { .. } | TatError::Stage { .. } => AppError::Analysis(err.to_string()),
            TatError::LlmError(_) => AppError::Upstream(err.to_string()),
            TatError::ConfigError(_) | TatError::Report(_) | TatError::Io(_) | TatError::Other(_) => {
                AppError::Internal(err.to_string())
            }
        }
    }
}

impl From<ParserError> for AppError {
    fn from(err: ParserError) -> Self {
        match err {
            ParserError::FileTooLarge { .. } => AppError::PayloadTooLarge(err.to_string()),
            ParserError::UnsupportedFormat(_) | ParserError::InvalidMimeType(_) => {
                AppError::UnsupportedMediaType(err.to_string())
            }
            ParserError::PdfError(_) | ParserError::DocxError(_) => AppError::Unreadable(err.to_string()),
            ParserError::IoError { .. } | ParserError::TaskFailed(_) => AppError::Internal(err.to_string()),
        }
    }
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::UnsupportedFormat(_) => AppError::BadRequest(err.to_string()),
            ReportError::Serialization(_) => AppError::Internal(err.to_string()),
        }
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::BadRequest(format!("Invalid upload: {}", err.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tat_core::PipelineStage;

    #[test]
    fn test_busy_maps_to_conflict() {
        let response = AppError::from(TatError::Busy("analysis".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_stage_failure_keeps_message() {
        let err = TatError::Stage {
            stage: PipelineStage::Relations,
            source: Box::new(TatError::upstream(PipelineStage::Relations, "bad span")),
        };
        match AppError::from(err) {
            AppError::Analysis(msg) => assert_eq!(
                msg,
                "Analysis failed during relations: Failed to extract relations: bad span"
            ),
            other => panic!("unexpected mapping: {other:?}"),
        }
    }

    #[test]
    fn test_parser_error_statuses() {
        let cases = [
            (
                ParserError::FileTooLarge {
                    size: 6 * 1024 * 1024,
                    limit: 5 * 1024 * 1024,
                },
                StatusCode::PAYLOAD_TOO_LARGE,
            ),
            (ParserError::UnsupportedFormat("a.exe".into()), StatusCode::UNSUPPORTED_MEDIA_TYPE),
            (ParserError::InvalidMimeType("image/png".into()), StatusCode::UNSUPPORTED_MEDIA_TYPE),
            (ParserError::PdfError("truncated".into()), StatusCode::UNPROCESSABLE_ENTITY),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).into_response().status(), status);
        }
    }

    #[test]
    fn test_llm_error_is_bad_gateway() {
        let response = AppError::from(TatError::LlmError("quota".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
