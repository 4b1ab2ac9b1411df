use std::fmt;

use super::extractors::{CsvExtractor, DocxExtractor, XlsxExtractor};
use crate::error::{RagError, Result};

/// File kinds accepted by the upload endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Pdf,
    Csv,
    Excel,
    Docx,
    /// Legacy Word files; handed to the DOCX parser.
    Doc,
    Text,
}

impl FileType {
    pub fn from_mime(mime_type: &str) -> Option<Self> {
        // Ignore parameters such as `; charset=utf-8`.
        let essence = mime_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase();

        match essence.as_str() {
            "application/pdf" => Some(Self::Pdf),
            "text/csv" => Some(Self::Csv),
            "application/vnd.ms-excel"
            | "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet" => {
                Some(Self::Excel)
            }
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                Some(Self::Docx)
            }
            "application/msword" => Some(Self::Doc),
            "text/plain" | "text/markdown" | "application/json" => Some(Self::Text),
            _ => None,
        }
    }

    pub fn from_extension(filename: &str) -> Option<Self> {
        let (_, extension) = filename.rsplit_once('.')?;

        match extension.to_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "csv" => Some(Self::Csv),
            "xls" | "xlsx" => Some(Self::Excel),
            "doc" => Some(Self::Doc),
            "docx" => Some(Self::Docx),
            "txt" | "md" | "json" => Some(Self::Text),
            _ => None,
        }
    }

    /// Resolves the file type from the declared MIME type, falling back to the
    /// file extension. Content is not sniffed.
    pub fn detect(mime_type: &str, filename: &str) -> Result<Self> {
        Self::from_mime(mime_type)
            .or_else(|| Self::from_extension(filename))
            .ok_or_else(|| {
                RagError::UnsupportedInput(format!(
                    "Unsupported file type: {mime_type} ({filename})"
                ))
            })
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pdf => "pdf",
            Self::Csv => "csv",
            Self::Excel => "excel",
            Self::Docx => "docx",
            Self::Doc => "doc",
            Self::Text => "text",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct ExtractedFile {
    pub text: String,
    pub filename: String,
    pub mime_type: String,
    pub file_type: FileType,
}

/// Turns uploaded file bytes into plain text.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileExtractor;

impl FileExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extracts trimmed text. Parsing is CPU-bound; call from a blocking task.
    pub fn extract(&self, bytes: &[u8], filename: &str, mime_type: &str) -> Result<ExtractedFile> {
        let file_type = FileType::detect(mime_type, filename)?;

        tracing::info!(
            file_type = %file_type,
            filename,
            mime_type,
            size = bytes.len(),
            "Extracting text from file"
        );

        let text = match file_type {
            FileType::Pdf => Self::extract_pdf(bytes)?,
            FileType::Csv => CsvExtractor::extract(bytes)?,
            FileType::Excel => XlsxExtractor::extract(bytes)?,
            FileType::Docx | FileType::Doc => DocxExtractor::extract(bytes)?,
            FileType::Text => String::from_utf8_lossy(bytes).into_owned(),
        };

        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(RagError::UnsupportedInput(
                "No text content could be extracted from the file".to_string(),
            ));
        }

        tracing::info!(filename, extracted_length = text.len(), "Text extracted");

        Ok(ExtractedFile {
            text,
            filename: filename.to_string(),
            mime_type: mime_type.to_string(),
            file_type,
        })
    }

    fn extract_pdf(bytes: &[u8]) -> Result<String> {
        pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| RagError::Extraction(format!("PDF extraction failed: {e}")))
    }
}
