use axum::Json;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

use super::dto;
use super::handlers;
use crate::models::RetrievedChunk;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Ragline API",
        version = "0.1.0",
        description = "Ingest documents into a vector store and answer questions grounded in them.",
    ),
    paths(
        handlers::health::health_check,
        handlers::ingest::ingest_document,
        handlers::upload::upload_document,
        handlers::query::query,
    ),
    components(schemas(
        dto::IngestRequest,
        dto::IngestResponse,
        dto::UploadForm,
        dto::QueryRequest,
        dto::QueryResponse,
        dto::HealthResponse,
        dto::ErrorResponse,
        RetrievedChunk,
    )),
    tags(
        (name = "health", description = "Health check"),
        (name = "ingest", description = "Document and file ingestion"),
        (name = "query", description = "Retrieval-augmented question answering"),
    ),
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn redoc_router<S: Clone + Send + Sync + 'static>() -> axum::Router<S> {
    Redoc::with_url("/docs", ApiDoc::openapi()).into()
}
