use async_trait::async_trait;

use crate::error::Result;
use crate::models::{ChunkRecord, StoredMatch};

/// A text collection that vectorizes content on insert and answers
/// nearest-neighbor queries from free text.
#[async_trait]
pub trait VectorStore: Send + Sync {
    async fn collection_exists(&self) -> Result<bool>;

    async fn create_collection(&self) -> Result<()>;

    /// Inserts one chunk and returns the store-assigned id.
    async fn insert(&self, record: &ChunkRecord) -> Result<String>;

    /// Up to `limit` nearest chunks to `query`, closest first.
    async fn near_text(&self, query: &str, limit: usize) -> Result<Vec<StoredMatch>>;

    /// Succeeds when the store is reachable and ready to serve.
    async fn ready(&self) -> Result<()>;

    /// Creates the collection unless it is already there.
    async fn ensure_collection(&self) -> Result<()> {
        if self.collection_exists().await? {
            tracing::info!("Vector store collection already exists");
            return Ok(());
        }

        self.create_collection().await?;
        tracing::info!("Vector store collection created");
        Ok(())
    }
}
