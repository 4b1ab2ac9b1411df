use crate::error::Result;
use crate::llm::AnswerGenerator;
use crate::models::Answer;
use crate::services::SearchService;

/// Answers questions: retrieve, short-circuit when nothing is found,
/// otherwise generate from the retrieved chunks.
#[derive(Clone)]
pub struct QueryService {
    search: SearchService,
    generator: AnswerGenerator,
    limit: usize,
}

impl QueryService {
    pub fn new(search: SearchService, generator: AnswerGenerator, limit: usize) -> Self {
        Self {
            search,
            generator,
            limit,
        }
    }

    pub async fn answer(&self, question: &str) -> Result<Answer> {
        let question = question.trim();

        let chunks = self.search.search(question, self.limit).await?;
        if chunks.is_empty() {
            tracing::info!("No relevant chunks found, skipping generation");
            return Ok(Answer::no_results());
        }

        let answer = self.generator.generate(question, &chunks).await?;

        Ok(Answer {
            answer,
            sources: chunks,
        })
    }
}
