//! API route definitions

use crate::handlers::{analyze, report, sample, upload};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Create API v1 routes
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/analyze", post(analyze::analyze_text))
        .route("/report", post(report::export_report))
        .route("/sample", get(sample::sample_text))
        .route("/upload", post(upload::upload_file))
}
