//! File upload handler

use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use tat_extractor::Operation;
use tat_parser::ParsedDocument;
use utoipa::ToSchema;

/// Multipart field carrying the file
const FILE_FIELD: &str = "file";

/// Clients that cannot tell send this; the extension decides instead
const GENERIC_MIME: &str = "application/octet-stream";

/// Multipart form accepted by the upload endpoint
#[derive(Debug, ToSchema)]
pub struct UploadForm {
    /// A .txt, .docx or .pdf file
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

/// Text read from an uploaded file
#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    pub file_name: String,
    #[schema(example = "docx")]
    pub file_type: String,
    /// Sanitized text, ready for analysis
    pub content: String,
    pub char_count: usize,
    pub word_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,
}

impl From<ParsedDocument> for UploadResponse {
    fn from(doc: ParsedDocument) -> Self {
        Self {
            char_count: doc.char_count(),
            word_count: doc.word_count(),
            file_type: doc.file_type.extension().to_string(),
            file_name: doc.file_name,
            content: doc.content,
            page_count: doc.page_count,
        }
    }
}

/// Read a .txt, .docx or .pdf upload into text
#[utoipa::path(
    post,
    path = "/api/v1/upload",
    tag = "upload",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "File read", body = UploadResponse),
        (status = 400, description = "No file in the request", body = crate::error::ApiError),
        (status = 409, description = "Another operation is in progress", body = crate::error::ApiError),
        (status = 413, description = "File size exceeds the limit", body = crate::error::ApiError),
        (status = 415, description = "Unsupported file type", body = crate::error::ApiError),
        (status = 422, description = "File could not be read", body = crate::error::ApiError)
    )
)]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    state.increment_requests();

    let _guard = state.session.begin(Operation::FileRead)?;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::BadRequest("Uploaded file has no name".to_string()))?;
        // parameters such as charset are not part of the match
        let content_type = field
            .content_type()
            .and_then(|ct| ct.split(';').next())
            .map(|ct| ct.trim().to_ascii_lowercase());
        let bytes = field.bytes().await?;

        state.loader.validate(&file_name, bytes.len() as u64)?;
        if let Some(mime) = content_type.as_deref().filter(|m| *m != GENERIC_MIME) {
            state.loader.validate_mime(mime)?;
        }

        let doc = state.loader.load_bytes(&file_name, bytes.to_vec()).await?;
        return Ok(Json(doc.into()));
    }

    Err(AppError::BadRequest("Please select a file to upload".to_string()))
}
