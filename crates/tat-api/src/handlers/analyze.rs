//! Text analysis handler

use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tat_core::{AnalysisResult, EntityType, TatError};
use tat_extractor::{GraphData, ProgressRecorder, ProgressUpdate};
use utoipa::ToSchema;

/// Analysis request body
#[derive(Debug, Deserialize, ToSchema)]
pub struct AnalyzeRequest {
    /// Text to annotate
    #[schema(example = "Apple Inc. announced on Monday that Tim Cook will visit Cupertino next month.")]
    pub text: String,

    /// Keep only entities of this type ("all" keeps everything)
    #[serde(default)]
    #[schema(example = "person")]
    pub entity_type: Option<String>,
}

/// Analysis response body
#[derive(Debug, Serialize, ToSchema)]
pub struct AnalyzeResponse {
    /// Entities, relations, events, temporal expressions and POS tags
    #[schema(value_type = Object)]
    pub result: AnalysisResult,

    /// Knowledge-graph nodes and links over all entities
    #[schema(value_type = Object)]
    pub graph: GraphData,

    /// Stage progress in the order it was reported
    #[schema(value_type = Vec<Object>)]
    pub progress: Vec<ProgressUpdate>,
}

fn entity_filter(requested: Option<&str>) -> Result<Option<EntityType>, TatError> {
    match requested.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) if s.eq_ignore_ascii_case("all") => Ok(None),
        Some(s) => s.parse().map(Some),
    }
}

/// Run the annotation pipeline over the request text
#[utoipa::path(
    post,
    path = "/api/v1/analyze",
    tag = "analysis",
    request_body = AnalyzeRequest,
    responses(
        (status = 200, description = "Analysis complete", body = AnalyzeResponse),
        (status = 400, description = "Empty text or unknown entity type", body = crate::error::ApiError),
        (status = 409, description = "Another operation is in progress", body = crate::error::ApiError),
        (status = 500, description = "A pipeline stage failed", body = crate::error::ApiError)
    )
)]
pub async fn analyze_text(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.increment_requests();

    let filter = entity_filter(req.entity_type.as_deref())?;

    let worker = Arc::clone(&state);
    let (mut analysis, progress) = tokio::task::spawn_blocking(move || {
        let recorder = ProgressRecorder::new();
        let analysis = worker.session.analyze(&worker.pipeline, &req.text, &recorder)?;
        Ok::<_, TatError>((analysis, recorder.updates()))
    })
    .await
    .map_err(|e| AppError::Internal(format!("Analysis task failed: {e}")))??;

    if let Some(entity_type) = filter {
        analysis.result.entities.retain(|e| e.entity_type == entity_type);
    }

    Ok(Json(AnalyzeResponse {
        result: analysis.result,
        graph: analysis.graph,
        progress,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_filter() {
        assert_eq!(entity_filter(None).unwrap(), None);
        assert_eq!(entity_filter(Some("all")).unwrap(), None);
        assert_eq!(entity_filter(Some(" Person ")).unwrap(), Some(EntityType::Person));
        assert!(matches!(
            entity_filter(Some("animal")),
            Err(TatError::InvalidInput(_))
        ));
    }
}
