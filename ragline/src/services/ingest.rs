use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;

use crate::config::ProcessingConfig;
use crate::db::VectorStore;
use crate::error::Result;
use crate::models::{ChunkRecord, StoredDocument, DEFAULT_SOURCE};
use crate::processing::TextChunker;

/// Chunks documents and writes the chunks to the vector store.
#[derive(Clone)]
pub struct IngestService {
    store: Arc<dyn VectorStore>,
    chunker: TextChunker,
    batch_size: usize,
}

impl IngestService {
    pub fn new(store: Arc<dyn VectorStore>, config: &ProcessingConfig) -> Self {
        Self {
            store,
            chunker: TextChunker::new(config),
            batch_size: config.insert_batch_size.max(1),
        }
    }

    /// Stores one document and returns the ids of its chunks in chunk order.
    ///
    /// Inserts within a batch run concurrently; batches run one after another.
    /// The first failed insert fails the whole call, and chunks already
    /// written stay in the store.
    pub async fn store_document(&self, text: &str, source: Option<&str>) -> Result<StoredDocument> {
        let source = source
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SOURCE);
        let ingested_at = Utc::now();

        let records: Vec<ChunkRecord> = self
            .chunker
            .chunk_text(text)
            .into_iter()
            .map(|content| ChunkRecord::new(content, source, ingested_at))
            .collect();

        tracing::info!(
            source,
            text_len = text.len(),
            chunk_count = records.len(),
            batch_size = self.batch_size,
            "Storing document"
        );

        let mut ids = Vec::with_capacity(records.len());
        for (batch_index, batch) in records.chunks(self.batch_size).enumerate() {
            let inserts = batch.iter().map(|record| self.store.insert(record));
            let batch_ids = join_all(inserts)
                .await
                .into_iter()
                .collect::<Result<Vec<String>>>()?;

            tracing::debug!(batch = batch_index, inserted = batch_ids.len(), "Batch stored");
            ids.extend(batch_ids);
        }

        tracing::info!(source, chunk_count = ids.len(), "Document stored");

        Ok(StoredDocument {
            chunk_count: ids.len(),
            ids,
        })
    }
}
