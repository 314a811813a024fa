//! Report export handler

use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;
use tat_extractor::{NoProgress, Operation};
use tat_report::{Report, ReportError, ReportFormat};
use utoipa::ToSchema;

/// Report request body
#[derive(Debug, Deserialize, ToSchema)]
pub struct ReportRequest {
    /// Text to analyze and report on
    pub text: String,

    /// json, csv or txt; anything else yields json
    #[serde(default)]
    #[schema(example = "csv")]
    pub format: Option<String>,
}

/// Analyze the text and return the report as a download
#[utoipa::path(
    post,
    path = "/api/v1/report",
    tag = "report",
    request_body = ReportRequest,
    responses(
        (status = 200, description = "Report file", body = String, content_type = "text/plain"),
        (status = 400, description = "Empty text or PDF requested", body = crate::error::ApiError),
        (status = 409, description = "Another operation is in progress", body = crate::error::ApiError)
    )
)]
pub async fn export_report(
    State(state): State<Arc<AppState>>,
    axum::Json(req): axum::Json<ReportRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.increment_requests();

    let format = ReportFormat::parse_lenient(req.format.as_deref().unwrap_or_default());
    if format == ReportFormat::Pdf {
        return Err(ReportError::UnsupportedFormat(format).into());
    }

    let worker = Arc::clone(&state);
    let exported = tokio::task::spawn_blocking(move || {
        let _guard = worker.session.begin(Operation::ReportExport)?;
        let analysis = worker.pipeline.run(&req.text, &NoProgress)?;
        let report = Report::from_analysis(req.text, &analysis);
        Ok::<_, AppError>(report.export(format)?)
    })
    .await
    .map_err(|e| AppError::Internal(format!("Report task failed: {e}")))??;

    let disposition = format!("attachment; filename=\"{}\"", exported.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, exported.mime_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        exported.body,
    ))
}
