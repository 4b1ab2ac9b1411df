use axum::{extract::State, Json};
use chrono::Utc;

use crate::api::dto::HealthResponse;
use crate::api::state::AppState;

/// `GET /api/health`
///
/// Always 200; the vector store's reachability is reported in the body.
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses(
        (status = 200, description = "Service health status", body = HealthResponse),
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let vector_store = match state.store.ready().await {
        Ok(()) => "ok",
        Err(e) => {
            tracing::warn!(error = %e, "Vector store readiness check failed");
            "unreachable"
        }
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now().to_rfc3339(),
        vector_store: vector_store.to_string(),
    })
}
