use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RagError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    UnsupportedInput(String),

    #[error("Failed to extract text: {0}")]
    Extraction(String),

    #[error("Vector store error: {0}")]
    VectorStore(String),

    #[error("LLM API returned {status}: {body}")]
    UpstreamLlm { status: u16, body: String },

    #[error("LLM returned no choices")]
    EmptyLlmResponse,

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl RagError {
    pub fn status(&self) -> StatusCode {
        match self {
            RagError::Validation(_) => StatusCode::BAD_REQUEST,
            RagError::UnsupportedInput(_) => StatusCode::BAD_REQUEST,
            RagError::Extraction(_) => StatusCode::BAD_REQUEST,
            RagError::VectorStore(_) => StatusCode::BAD_GATEWAY,
            RagError::UpstreamLlm { .. } => StatusCode::BAD_GATEWAY,
            RagError::EmptyLlmResponse => StatusCode::BAD_GATEWAY,
            RagError::Http(_) => StatusCode::BAD_GATEWAY,
            RagError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RagError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RagError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %message, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %message, "Request rejected");
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, RagError>;
