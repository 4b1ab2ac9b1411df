use serde::{Deserialize, Serialize};

use super::RetrievedChunk;

/// Reply returned when retrieval finds nothing for a question.
pub const NO_RESULTS_ANSWER: &str = "I don't have any relevant information in my knowledge base to answer this question. Please ingest some documents first.";

/// An answer together with the chunks it was generated from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub answer: String,
    pub sources: Vec<RetrievedChunk>,
}

impl Answer {
    pub fn no_results() -> Self {
        Self {
            answer: NO_RESULTS_ANSWER.to_string(),
            sources: Vec::new(),
        }
    }
}
