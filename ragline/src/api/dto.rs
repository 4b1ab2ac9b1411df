use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::models::{Answer, RetrievedChunk, StoredDocument};

/// Body of `POST /api/ingest`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct IngestRequest {
    /// Text to ingest. Must be a non-empty string.
    #[schema(value_type = String)]
    #[serde(default)]
    pub content: Option<Value>,
    /// Free-text label stored with every chunk. Defaults to `manual`.
    #[serde(default)]
    pub source: Option<String>,
}

impl IngestRequest {
    /// The content when it is a string with non-whitespace characters.
    pub fn content(&self) -> Option<&str> {
        self.content
            .as_ref()
            .and_then(Value::as_str)
            .filter(|content| !content.trim().is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IngestResponse {
    pub success: bool,
    pub message: String,
    /// Id of the first stored chunk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl IngestResponse {
    pub fn stored(message: String, document: &StoredDocument) -> Self {
        Self {
            success: true,
            message,
            id: document.first_id().map(str::to_string),
        }
    }
}

/// Multipart form accepted by `POST /api/upload`.
#[derive(Debug, ToSchema)]
pub struct UploadForm {
    /// PDF, CSV, XLS/XLSX, DOC/DOCX, TXT, MD or JSON file.
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

/// Body of `POST /api/query`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct QueryRequest {
    /// Question to answer. Must be a non-empty string.
    #[schema(value_type = String)]
    #[serde(default)]
    pub question: Option<Value>,
}

impl QueryRequest {
    pub fn question(&self) -> Option<&str> {
        self.question
            .as_ref()
            .and_then(Value::as_str)
            .filter(|question| !question.trim().is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QueryResponse {
    pub answer: String,
    pub sources: Vec<RetrievedChunk>,
}

impl From<Answer> for QueryResponse {
    fn from(answer: Answer) -> Self {
        Self {
            answer: answer.answer,
            sources: answer.sources,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    /// RFC 3339 time at which the check ran.
    pub timestamp: String,
    /// `ok` or `unreachable`.
    pub vector_store: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// `"1 chunk"`, `"3 chunks"`.
pub fn chunk_label(count: usize) -> String {
    if count == 1 {
        "1 chunk".to_string()
    } else {
        format!("{count} chunks")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ingest_content_must_be_non_blank_string() {
        let parse = |body: Value| serde_json::from_value::<IngestRequest>(body).unwrap();

        assert_eq!(parse(json!({ "content": "hi" })).content(), Some("hi"));
        assert_eq!(parse(json!({ "content": "   " })).content(), None);
        assert_eq!(parse(json!({ "content": 42 })).content(), None);
        assert_eq!(parse(json!({})).content(), None);
    }

    #[test]
    fn test_query_question_must_be_non_blank_string() {
        let parse = |body: Value| serde_json::from_value::<QueryRequest>(body).unwrap();

        assert_eq!(
            parse(json!({ "question": " Why? " })).question(),
            Some(" Why? ")
        );
        assert_eq!(parse(json!({ "question": "" })).question(), None);
        assert_eq!(parse(json!({ "question": null })).question(), None);
    }

    #[test]
    fn test_ingest_response_omits_missing_id() {
        let document = StoredDocument {
            ids: Vec::new(),
            chunk_count: 0,
        };
        let body = serde_json::to_value(IngestResponse::stored("ok".into(), &document)).unwrap();
        assert_eq!(body, json!({ "success": true, "message": "ok" }));
    }

    #[test]
    fn test_chunk_label() {
        assert_eq!(chunk_label(1), "1 chunk");
        assert_eq!(chunk_label(0), "0 chunks");
        assert_eq!(chunk_label(4), "4 chunks");
    }
}
