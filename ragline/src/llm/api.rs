use std::time::Duration;

use async_openai::types::{
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequest, CreateChatCompletionRequestArgs,
};
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION},
    Client,
};
use serde::Deserialize;

use crate::config::LlmConfig;
use crate::error::{RagError, Result};

#[derive(Debug, Deserialize)]
struct CompletionBody {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for an OpenAI-compatible `/chat/completions` endpoint.
///
/// Requests are sent once; a non-success status is surfaced with the
/// upstream body so callers can report it.
#[derive(Clone)]
pub struct LlmApiClient {
    client: Client,
    endpoint: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl LlmApiClient {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", config.api_key))
                .map_err(|e| RagError::Config(format!("Invalid LLM API key header: {e}")))?,
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| RagError::Config(format!("Failed to create LLM HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends a system and a user message and returns the first choice's
    /// content unchanged.
    pub async fn complete(&self, system_prompt: &str, prompt: &str) -> Result<String> {
        let request = self.build_request(system_prompt, prompt)?;

        tracing::info!(
            model = %self.model,
            url = %self.endpoint,
            prompt_len = prompt.len(),
            "Sending chat completion"
        );

        let response = self.client.post(&self.endpoint).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), body = %body, "LLM API returned an error");
            return Err(RagError::UpstreamLlm {
                status: status.as_u16(),
                body,
            });
        }

        let body: CompletionBody = response.json().await?;
        let choice = body
            .choices
            .into_iter()
            .next()
            .ok_or(RagError::EmptyLlmResponse)?;

        Ok(choice.message.content.unwrap_or_default())
    }

    fn build_request(&self, system_prompt: &str, prompt: &str) -> Result<CreateChatCompletionRequest> {
        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system_prompt)
                .build()
                .map_err(|error| RagError::Internal(format!("Invalid system prompt: {error}")))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|error| RagError::Internal(format!("Invalid user prompt: {error}")))?
                .into(),
        ];

        CreateChatCompletionRequestArgs::default()
            .model(self.model.clone())
            .messages(messages)
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .build()
            .map_err(|error| RagError::Internal(format!("Invalid LLM completion request: {error}")))
    }
}
