use axum::{extract::State, Json};

use crate::api::dto::{ErrorResponse, QueryRequest, QueryResponse};
use crate::api::extractors::AppJson;
use crate::api::state::AppState;
use crate::error::{RagError, Result};

/// `POST /api/query`
#[utoipa::path(
    post,
    path = "/api/query",
    tag = "query",
    request_body = QueryRequest,
    responses(
        (status = 200, description = "Generated answer with the chunks it drew on", body = QueryResponse),
        (status = 400, description = "Missing or empty question", body = ErrorResponse),
        (status = 502, description = "Vector store or LLM failure", body = ErrorResponse),
    )
)]
pub async fn query(
    State(state): State<AppState>,
    AppJson(request): AppJson<QueryRequest>,
) -> Result<Json<QueryResponse>> {
    let question = request.question().ok_or_else(|| {
        RagError::Validation("Request body must include a non-empty 'question' string".to_string())
    })?;

    let answer = state.query.answer(question).await?;

    Ok(Json(answer.into()))
}
