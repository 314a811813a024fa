//! TAT API - HTTP server for the text analysis toolkit
//!
//! Exposes the annotation pipeline, report export, sample text and file
//! upload over JSON endpoints under `/api/v1`, with an OpenAPI document and
//! Swagger UI.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Text Analysis Toolkit API",
        description = "Heuristic entity, relation, event, temporal and POS annotation"
    ),
    paths(
        handlers::health::health_check,
        handlers::analyze::analyze_text,
        handlers::report::export_report,
        handlers::sample::sample_text,
        handlers::upload::upload_file,
    ),
    components(schemas(
        error::ApiError,
        handlers::health::HealthResponse,
        handlers::analyze::AnalyzeRequest,
        handlers::analyze::AnalyzeResponse,
        handlers::report::ReportRequest,
        handlers::sample::SampleResponse,
        handlers::upload::UploadForm,
        handlers::upload::UploadResponse,
    )),
    tags(
        (name = "health", description = "Liveness"),
        (name = "analysis", description = "Annotation pipeline"),
        (name = "report", description = "Report export"),
        (name = "sample", description = "Sample text"),
        (name = "upload", description = "File ingestion"),
    )
)]
pub struct ApiDoc;

/// CORS for the configured origins; `None` when no origin is configured
fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    if origins.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
            .expose_headers([header::CONTENT_DISPOSITION])
            .allow_origin(origins),
    )
}

/// Build the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let max_body_size = state.config.server.max_body_size;
    let cors = cors_layer(&state.config.server.cors_origins);

    let router = Router::new()
        .route("/health", get(handlers::health::health_check))
        .nest("/api/v1", routes::api_routes())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(axum::middleware::from_fn(middleware::security_headers_middleware))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body_size))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    match cors {
        Some(cors) => router.layer(cors),
        None => router,
    }
}

/// Router over default state with the built-in sample paragraph
pub fn create_router_for_testing() -> Router {
    create_router(Arc::new(AppState::default()))
}
