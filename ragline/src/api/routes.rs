use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers;
use super::openapi;
use super::AppState;

/// Room for multipart boundaries and part headers on top of the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let server = &state.config.server;
    let json_limit = DefaultBodyLimit::max(server.json_body_limit);
    let upload_limit = DefaultBodyLimit::max(server.max_upload_size + MULTIPART_OVERHEAD);

    let api = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ingest", post(handlers::ingest_document).layer(json_limit))
        .route("/query", post(handlers::query).layer(json_limit))
        .route("/upload", post(handlers::upload_document).layer(upload_limit))
        .route("/openapi.json", get(openapi::openapi_json))
        .merge(openapi::redoc_router())
        .fallback(api_not_found);

    Router::new()
        .nest("/api", api)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn api_not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "API route not found" })),
    )
}
