//! Sample text handler

use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;
use tat_extractor::Operation;
use tat_sample::SampleSource;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct SampleResponse {
    pub text: String,
    #[schema(value_type = String, example = "llm")]
    pub source: SampleSource,
}

/// Fetch a paragraph to try the analyzer on
#[utoipa::path(
    get,
    path = "/api/v1/sample",
    tag = "sample",
    responses(
        (status = 200, description = "Sample paragraph", body = SampleResponse),
        (status = 409, description = "Another operation is in progress", body = crate::error::ApiError),
        (status = 502, description = "The LLM request failed", body = crate::error::ApiError)
    )
)]
pub async fn sample_text(State(state): State<Arc<AppState>>) -> Result<Json<SampleResponse>, AppError> {
    state.increment_requests();

    let _guard = state.session.begin(Operation::SampleText)?;
    let sample = state.sampler.generate().await?;

    Ok(Json(SampleResponse {
        text: sample.text,
        source: sample.source,
    }))
}
