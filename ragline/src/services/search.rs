use std::sync::Arc;
use std::time::Instant;

use crate::db::VectorStore;
use crate::error::Result;
use crate::models::RetrievedChunk;

/// Semantic retrieval over the vector store.
#[derive(Clone)]
pub struct SearchService {
    store: Arc<dyn VectorStore>,
}

impl SearchService {
    pub fn new(store: Arc<dyn VectorStore>) -> Self {
        Self { store }
    }

    /// Up to `limit` chunks ordered by descending relevance. An empty result
    /// is not an error.
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<RetrievedChunk>> {
        let started = Instant::now();

        let chunks: Vec<RetrievedChunk> = self
            .store
            .near_text(query, limit)
            .await?
            .into_iter()
            .map(RetrievedChunk::from)
            .collect();

        if chunks.is_empty() {
            tracing::warn!(limit, "No chunks matched the query");
            return Ok(chunks);
        }

        tracing::info!(
            limit,
            results = chunks.len(),
            top_score = chunks.first().map(|c| c.score),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Retrieved chunks"
        );

        Ok(chunks)
    }
}
