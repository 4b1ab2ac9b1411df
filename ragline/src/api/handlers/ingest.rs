use axum::{extract::State, http::StatusCode, Json};

use crate::api::dto::{chunk_label, ErrorResponse, IngestRequest, IngestResponse};
use crate::api::extractors::AppJson;
use crate::api::state::AppState;
use crate::error::{RagError, Result};

/// `POST /api/ingest`
#[utoipa::path(
    post,
    path = "/api/ingest",
    tag = "ingest",
    request_body = IngestRequest,
    responses(
        (status = 201, description = "Document chunked and stored", body = IngestResponse),
        (status = 400, description = "Missing or empty content", body = ErrorResponse),
        (status = 502, description = "Vector store failure", body = ErrorResponse),
    )
)]
pub async fn ingest_document(
    State(state): State<AppState>,
    AppJson(request): AppJson<IngestRequest>,
) -> Result<(StatusCode, Json<IngestResponse>)> {
    let content = request.content().ok_or_else(|| {
        RagError::Validation("Request body must include a non-empty 'content' string".to_string())
    })?;

    let document = state
        .ingest
        .store_document(content.trim(), request.source.as_deref())
        .await?;

    let message = format!(
        "Document ingested successfully ({})",
        chunk_label(document.chunk_count)
    );

    Ok((
        StatusCode::CREATED,
        Json(IngestResponse::stored(message, &document)),
    ))
}
