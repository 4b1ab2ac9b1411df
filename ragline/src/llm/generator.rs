use crate::config::LlmConfig;
use crate::error::Result;
use crate::llm::api::LlmApiClient;
use crate::llm::prompts::{build_prompt, PromptBudget, SYSTEM_PROMPT};
use crate::models::RetrievedChunk;

/// Produces an answer to a question grounded in retrieved chunks.
#[derive(Clone)]
pub struct AnswerGenerator {
    client: LlmApiClient,
    budget: PromptBudget,
}

impl AnswerGenerator {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        Ok(Self {
            client: LlmApiClient::new(config)?,
            budget: PromptBudget::from_config(config),
        })
    }

    pub async fn generate(&self, question: &str, chunks: &[RetrievedChunk]) -> Result<String> {
        let prompt = build_prompt(chunks, question, self.budget);

        let answer = self.client.complete(SYSTEM_PROMPT, &prompt).await?;
        tracing::info!(
            model = %self.client.model(),
            answer_len = answer.len(),
            "Answer generated"
        );

        Ok(answer)
    }
}
