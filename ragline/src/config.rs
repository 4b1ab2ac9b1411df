use serde::Deserialize;
use std::env;

use crate::error::{RagError, Result};

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

/// Reads the first non-empty variable out of `names`.
fn first_env(names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| env::var(name).ok())
        .find(|value| !value.trim().is_empty())
}

fn require_env(names: &[&str]) -> Result<String> {
    first_env(names).ok_or_else(|| {
        RagError::Config(format!(
            "Missing required environment variable: {}",
            names.join(" or ")
        ))
    })
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub vector_store: VectorStoreConfig,
    pub llm: LlmConfig,
    pub processing: ProcessingConfig,
    pub retrieval: RetrievalConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Maximum JSON request body, in bytes.
    pub json_body_limit: usize,
    /// Maximum size of an uploaded file, in bytes.
    pub max_upload_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VectorStoreConfig {
    pub url: String,
    pub api_key: Option<String>,
    pub collection: String,
    pub timeout_secs: u64,
}

/// Chat-completion endpoint settings. All three of `base_url`, `model` and
/// `api_key` must be present for the process to start.
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: String,
    pub timeout_secs: u64,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Total context window of the model, in tokens.
    pub context_window: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProcessingConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub insert_batch_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetrievalConfig {
    pub limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            json_body_limit: 10 * 1024 * 1024,
            max_upload_size: 20 * 1024 * 1024,
        }
    }
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8090".to_string(),
            api_key: None,
            collection: "Document".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
            insert_batch_size: 20,
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { limit: 5 }
    }
}

impl LlmConfig {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            api_key: api_key.into(),
            timeout_secs: 120,
            temperature: 0.7,
            max_tokens: 2048,
            context_window: 32_769,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let server_defaults = ServerConfig::default();
        let store_defaults = VectorStoreConfig::default();
        let processing_defaults = ProcessingConfig::default();

        let llm_defaults = LlmConfig::new(
            require_env(&["LLM_API_BASE", "HF_API_BASE"])?,
            require_env(&["LLM_MODEL", "HF_MODEL"])?,
            require_env(&["LLM_API_KEY", "HF_API_KEY"])?,
        );

        let config = Self {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or(server_defaults.host),
                port: parse_env_or("PORT", server_defaults.port),
                json_body_limit: parse_env_or("JSON_BODY_LIMIT", server_defaults.json_body_limit),
                max_upload_size: parse_env_or("MAX_UPLOAD_SIZE", server_defaults.max_upload_size),
            },
            vector_store: VectorStoreConfig {
                url: env::var("WEAVIATE_HOST").unwrap_or(store_defaults.url),
                api_key: first_env(&["WEAVIATE_API_KEY"]),
                collection: env::var("WEAVIATE_COLLECTION").unwrap_or(store_defaults.collection),
                timeout_secs: parse_env_or("VECTOR_STORE_TIMEOUT", store_defaults.timeout_secs),
            },
            llm: LlmConfig {
                timeout_secs: parse_env_or("LLM_TIMEOUT", llm_defaults.timeout_secs),
                temperature: parse_env_or("LLM_TEMPERATURE", llm_defaults.temperature),
                max_tokens: parse_env_or("LLM_MAX_TOKENS", llm_defaults.max_tokens),
                context_window: parse_env_or("MODEL_CONTEXT_TOKENS", llm_defaults.context_window),
                ..llm_defaults
            },
            processing: ProcessingConfig {
                chunk_size: parse_env_or("CHUNK_SIZE", processing_defaults.chunk_size),
                chunk_overlap: parse_env_or("CHUNK_OVERLAP", processing_defaults.chunk_overlap),
                insert_batch_size: parse_env_or(
                    "INGEST_BATCH_SIZE",
                    processing_defaults.insert_batch_size,
                ),
            },
            retrieval: RetrievalConfig {
                limit: parse_env_or("RETRIEVAL_LIMIT", RetrievalConfig::default().limit),
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.processing.chunk_size == 0 {
            return Err(RagError::Config("CHUNK_SIZE must be at least 1".to_string()));
        }
        if self.processing.chunk_overlap >= self.processing.chunk_size {
            return Err(RagError::Config(format!(
                "CHUNK_OVERLAP ({}) must be smaller than CHUNK_SIZE ({})",
                self.processing.chunk_overlap, self.processing.chunk_size
            )));
        }
        if self.processing.insert_batch_size == 0 {
            return Err(RagError::Config(
                "INGEST_BATCH_SIZE must be at least 1".to_string(),
            ));
        }
        if self.retrieval.limit == 0 {
            return Err(RagError::Config("RETRIEVAL_LIMIT must be at least 1".to_string()));
        }
        Ok(())
    }
}
