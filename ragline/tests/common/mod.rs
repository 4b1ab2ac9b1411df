#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::Router;
use serde_json::Value;

use ragline::api::{create_router, AppState};
use ragline::config::{
    Config, LlmConfig, ProcessingConfig, RetrievalConfig, ServerConfig, VectorStoreConfig,
};
use ragline::db::VectorStore;
use ragline::error::{RagError, Result};
use ragline::models::{ChunkRecord, StoredMatch};

/// Vector store double that keeps inserted records in memory and serves a
/// fixed list of hits.
#[derive(Default)]
pub struct InMemoryStore {
    records: Mutex<HashMap<String, ChunkRecord>>,
    hits: Vec<StoredMatch>,
    fail_on_insert: Option<usize>,
    unreachable: bool,
    insert_calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    query_calls: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hits(hits: Vec<StoredMatch>) -> Self {
        Self {
            hits,
            ..Self::default()
        }
    }

    /// Rejects the `n`th insert (zero-based).
    pub fn failing_on_insert(n: usize) -> Self {
        Self {
            fail_on_insert: Some(n),
            ..Self::default()
        }
    }

    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    pub fn record(&self, id: &str) -> Option<ChunkRecord> {
        self.records.lock().unwrap().get(id).cloned()
    }

    pub fn stored_count(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn query_calls(&self) -> usize {
        self.query_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VectorStore for InMemoryStore {
    async fn collection_exists(&self) -> Result<bool> {
        Ok(true)
    }

    async fn create_collection(&self) -> Result<()> {
        Ok(())
    }

    async fn insert(&self, record: &ChunkRecord) -> Result<String> {
        let call = self.insert_calls.fetch_add(1, Ordering::SeqCst);
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);

        // Later calls finish first so completion order differs from call order.
        tokio::time::sleep(Duration::from_millis(20u64.saturating_sub(call as u64 % 20))).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail_on_insert == Some(call) {
            return Err(RagError::VectorStore("insert returned 500: boom".to_string()));
        }

        let id = format!("obj-{call}");
        self.records
            .lock()
            .unwrap()
            .insert(id.clone(), record.clone());
        Ok(id)
    }

    async fn near_text(&self, _query: &str, limit: usize) -> Result<Vec<StoredMatch>> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        if self.unreachable {
            return Err(RagError::VectorStore("query failed: connection refused".to_string()));
        }
        Ok(self.hits.iter().take(limit).cloned().collect())
    }

    async fn ready(&self) -> Result<()> {
        if self.unreachable {
            return Err(RagError::VectorStore("readiness check failed".to_string()));
        }
        Ok(())
    }
}

pub fn stored_match(content: &str, source: Option<&str>, distance: Option<f64>) -> StoredMatch {
    StoredMatch {
        content: content.to_string(),
        source: source.map(str::to_string),
        distance,
    }
}

pub fn test_config(llm_base_url: &str) -> Config {
    Config {
        server: ServerConfig::default(),
        vector_store: VectorStoreConfig::default(),
        llm: LlmConfig {
            timeout_secs: 5,
            ..LlmConfig::new(llm_base_url, "test-model", "test-key")
        },
        processing: ProcessingConfig::default(),
        retrieval: RetrievalConfig::default(),
    }
}

pub fn test_state(store: Arc<InMemoryStore>, llm_base_url: &str) -> AppState {
    AppState::new(test_config(llm_base_url), store).expect("state")
}

pub fn test_app(store: Arc<InMemoryStore>, llm_base_url: &str) -> Router {
    create_router(test_state(store, llm_base_url))
}

pub async fn body_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn completion_body(content: &str) -> Value {
    serde_json::json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "created": 1_700_000_000u64,
        "model": "test-model",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

pub const BOUNDARY: &str = "ragline-test-boundary";

/// A `multipart/form-data` body with one file part.
pub fn multipart_file(
    field: &str,
    filename: &str,
    content_type: Option<&str>,
    bytes: &[u8],
) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n")
            .as_bytes(),
    );
    if let Some(content_type) = content_type {
        body.extend_from_slice(format!("Content-Type: {content_type}\r\n").as_bytes());
    }
    body.extend_from_slice(b"\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={BOUNDARY}")
}

pub fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
    use docx_rs::{Docx, Paragraph, Run};

    let docx = paragraphs.iter().fold(Docx::new(), |docx, text| {
        docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*text)))
    });

    let mut buffer = Cursor::new(Vec::new());
    docx.build().pack(&mut buffer).expect("Failed to pack DOCX");
    buffer.into_inner()
}

/// Minimal single-sheet workbook: a header row and two data rows.
pub fn xlsx_bytes() -> Vec<u8> {
    use std::io::Write;
    use zip::write::FileOptions;
    use zip::CompressionMethod;

    let mut buffer = Cursor::new(Vec::new());
    {
        let mut zip = zip::ZipWriter::new(&mut buffer);
        let options: FileOptions<zip::write::ExtendedFileOptions> =
            FileOptions::default().compression_method(CompressionMethod::Deflated);

        let parts = [
            ("[Content_Types].xml", XLSX_CONTENT_TYPES),
            ("_rels/.rels", XLSX_RELS),
            ("xl/workbook.xml", XLSX_WORKBOOK),
            ("xl/_rels/workbook.xml.rels", XLSX_WORKBOOK_RELS),
            ("xl/worksheets/sheet1.xml", XLSX_SHEET),
            ("xl/sharedStrings.xml", XLSX_SHARED_STRINGS),
        ];

        for (name, content) in parts {
            zip.start_file(name, options.clone()).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }

        zip.finish().unwrap();
    }

    buffer.into_inner()
}

const XLSX_CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
    <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
    <Default Extension="xml" ContentType="application/xml"/>
    <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
    <Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
    <Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/>
</Types>"#;

const XLSX_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#;

const XLSX_WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
    <sheets>
        <sheet name="Boiling" sheetId="1" r:id="rId1"/>
    </sheets>
</workbook>"#;

const XLSX_WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
    <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/>
</Relationships>"#;

const XLSX_SHEET: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
    <sheetData>
        <row r="1">
            <c r="A1" t="s"><v>0</v></c>
            <c r="B1" t="s"><v>1</v></c>
        </row>
        <row r="2">
            <c r="A2" t="s"><v>2</v></c>
            <c r="B2"><v>100</v></c>
        </row>
        <row r="3">
            <c r="A3" t="s"><v>3</v></c>
            <c r="B3"><v>78.5</v></c>
        </row>
    </sheetData>
</worksheet>"#;

const XLSX_SHARED_STRINGS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="4" uniqueCount="4">
    <si><t>Liquid</t></si>
    <si><t>Boiling point</t></si>
    <si><t>Water</t></si>
    <si><t>Ethanol</t></si>
</sst>"#;
