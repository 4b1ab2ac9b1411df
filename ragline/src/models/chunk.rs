use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Source label applied when an ingest does not name one.
pub const DEFAULT_SOURCE: &str = "manual";

/// A chunk as persisted in the vector store collection.
///
/// Every chunk of one document shares the same `source` and `ingested_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkRecord {
    pub content: String,
    pub source: String,
    pub ingested_at: DateTime<Utc>,
}

impl ChunkRecord {
    pub fn new(
        content: impl Into<String>,
        source: impl Into<String>,
        ingested_at: DateTime<Utc>,
    ) -> Self {
        Self {
            content: content.into(),
            source: source.into(),
            ingested_at,
        }
    }
}

/// A nearest-neighbor hit as decoded from the vector store response.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredMatch {
    pub content: String,
    pub source: Option<String>,
    pub distance: Option<f64>,
}

/// A chunk returned by a similarity query, ranked by `score`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct RetrievedChunk {
    pub content: String,
    /// `1 - distance`, or `0` when the store reported no distance.
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl RetrievedChunk {
    pub fn new(content: impl Into<String>, score: f64, source: Option<String>) -> Self {
        Self {
            content: content.into(),
            score,
            source,
        }
    }
}

impl From<StoredMatch> for RetrievedChunk {
    fn from(hit: StoredMatch) -> Self {
        Self {
            content: hit.content,
            score: score_from_distance(hit.distance),
            // The store hands back "" for objects inserted without a label.
            source: hit.source.filter(|source| !source.is_empty()),
        }
    }
}

/// Maps a raw store distance to a relevance score. Unbounded metrics are
/// passed through unclamped.
pub fn score_from_distance(distance: Option<f64>) -> f64 {
    match distance {
        Some(distance) => 1.0 - distance,
        None => 0.0,
    }
}

/// Outcome of storing one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDocument {
    /// Store-assigned ids, in chunk order.
    pub ids: Vec<String>,
    pub chunk_count: usize,
}

impl StoredDocument {
    pub fn first_id(&self) -> Option<&str> {
        self.ids.first().map(String::as_str)
    }
}
