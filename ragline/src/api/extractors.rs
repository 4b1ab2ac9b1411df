use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;

use crate::error::RagError;

/// `axum::Json` with rejections reported as `{ "error": ... }` bodies.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(RagError))]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for RagError {
    fn from(rejection: JsonRejection) -> Self {
        let message = match rejection {
            JsonRejection::JsonDataError(err) => format!("Invalid request body: {}", err.body_text()),
            JsonRejection::JsonSyntaxError(err) => format!("JSON syntax error: {}", err.body_text()),
            JsonRejection::MissingJsonContentType(_) => {
                "Missing `Content-Type: application/json` header".to_string()
            }
            JsonRejection::BytesRejection(err) => {
                format!("Failed to read request body: {}", err.body_text())
            }
            other => other.body_text(),
        };

        RagError::Validation(message)
    }
}
