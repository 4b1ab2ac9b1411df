use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};

use crate::api::dto::{chunk_label, ErrorResponse, IngestResponse, UploadForm};
use crate::api::state::AppState;
use crate::error::{RagError, Result};

const FILE_FIELD: &str = "file";

struct UploadedFile {
    filename: String,
    mime_type: String,
    bytes: Vec<u8>,
}

/// `POST /api/upload`
///
/// Accepts a multipart form with a single `file` part. The text extracted
/// from the file is ingested under the file name as its source.
#[utoipa::path(
    post,
    path = "/api/upload",
    tag = "ingest",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "File extracted, chunked and stored", body = IngestResponse),
        (status = 400, description = "Missing file, unsupported type or no extractable text", body = ErrorResponse),
        (status = 502, description = "Vector store failure", body = ErrorResponse),
    )
)]
pub async fn upload_document(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<IngestResponse>)> {
    let max_size = state.config.server.max_upload_size;
    let upload = read_file_field(multipart, max_size)
        .await?
        .ok_or_else(|| RagError::Validation("No file provided".to_string()))?;

    tracing::info!(
        filename = %upload.filename,
        mime_type = %upload.mime_type,
        size = upload.bytes.len(),
        "Received upload"
    );

    let extractor = state.extractor;
    let extracted = tokio::task::spawn_blocking(move || {
        extractor.extract(&upload.bytes, &upload.filename, &upload.mime_type)
    })
    .await
    .map_err(|e| RagError::Extraction(format!("extraction task failed: {e}")))??;

    let document = state
        .ingest
        .store_document(&extracted.text, Some(&extracted.filename))
        .await?;

    let message = format!(
        "File \"{}\" ingested successfully ({} chars, {})",
        extracted.filename,
        extracted.text.chars().count(),
        chunk_label(document.chunk_count)
    );

    Ok((
        StatusCode::CREATED,
        Json(IngestResponse::stored(message, &document)),
    ))
}

async fn read_file_field(mut multipart: Multipart, max_size: usize) -> Result<Option<UploadedFile>> {
    let too_large = || {
        RagError::Validation(format!(
            "File too large (max {} bytes)",
            max_size
        ))
    };

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            too_large()
        } else {
            RagError::Validation(format!("Invalid multipart body: {}", e.body_text()))
        }
    })? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or("upload").to_string();
        let mime_type = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_else(|| {
                mime_guess::from_path(&filename)
                    .first_or_octet_stream()
                    .essence_str()
                    .to_string()
            });

        let bytes = field.bytes().await.map_err(|e| {
            if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                too_large()
            } else {
                RagError::Validation(format!("Failed to read file: {}", e.body_text()))
            }
        })?;

        if bytes.len() > max_size {
            return Err(too_large());
        }

        return Ok(Some(UploadedFile {
            filename,
            mime_type,
            bytes: bytes.to_vec(),
        }));
    }

    Ok(None)
}
