use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION},
    Client, Response, StatusCode,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::VectorStoreConfig;
use crate::db::schema::{collection_schema, near_text_query};
use crate::db::traits::VectorStore;
use crate::error::{RagError, Result};
use crate::models::{ChunkRecord, StoredMatch};

#[derive(Debug, Deserialize)]
struct CreatedObject {
    id: String,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct Hit {
    content: String,
    #[serde(default)]
    source: Option<String>,
    #[serde(rename = "_additional", default)]
    additional: Option<HitAdditional>,
}

#[derive(Debug, Deserialize)]
struct HitAdditional {
    #[serde(default)]
    distance: Option<f64>,
}

impl From<Hit> for StoredMatch {
    fn from(hit: Hit) -> Self {
        Self {
            content: hit.content,
            source: hit.source,
            distance: hit.additional.and_then(|a| a.distance),
        }
    }
}

/// REST/GraphQL client for a Weaviate instance holding a single collection.
#[derive(Clone)]
pub struct WeaviateClient {
    client: Client,
    base_url: String,
    collection: String,
}

impl WeaviateClient {
    pub fn new(config: &VectorStoreConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(ref api_key) = config.api_key {
            let value = HeaderValue::from_str(&format!("Bearer {api_key}"))
                .map_err(|e| RagError::Config(format!("Invalid WEAVIATE_API_KEY header: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| RagError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            collection: config.collection.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1{}", self.base_url, path)
    }

    async fn send(&self, request: reqwest::RequestBuilder, action: &str) -> Result<Response> {
        request
            .send()
            .await
            .map_err(|e| RagError::VectorStore(format!("{action} failed: {e}")))
    }

    async fn expect_success(response: Response, action: &str) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(RagError::VectorStore(format!(
            "{action} returned {}: {body}",
            status.as_u16()
        )))
    }

    fn decode_hits(&self, response: GraphQlResponse) -> Result<Vec<StoredMatch>> {
        if let Some(errors) = response.errors.filter(|errors| !errors.is_empty()) {
            let messages = errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(RagError::VectorStore(format!("query failed: {messages}")));
        }

        let hits = response
            .data
            .as_ref()
            .and_then(|data| data.get("Get"))
            .and_then(|get| get.get(&self.collection))
            .cloned()
            .unwrap_or(Value::Null);

        if hits.is_null() {
            return Ok(Vec::new());
        }

        let hits: Vec<Hit> = serde_json::from_value(hits)
            .map_err(|e| RagError::VectorStore(format!("unexpected query response: {e}")))?;

        Ok(hits.into_iter().map(StoredMatch::from).collect())
    }
}

#[async_trait]
impl VectorStore for WeaviateClient {
    async fn collection_exists(&self) -> Result<bool> {
        let url = self.url(&format!("/schema/{}", self.collection));
        let response = self.send(self.client.get(&url), "schema lookup").await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            status if status.is_success() => Ok(true),
            _ => Self::expect_success(response, "schema lookup")
                .await
                .map(|_| false),
        }
    }

    async fn create_collection(&self) -> Result<()> {
        let schema = collection_schema(&self.collection);
        let response = self
            .send(self.client.post(self.url("/schema")).json(&schema), "create collection")
            .await?;

        Self::expect_success(response, "create collection").await?;
        tracing::info!(collection = %self.collection, "Created vector store collection");
        Ok(())
    }

    async fn insert(&self, record: &ChunkRecord) -> Result<String> {
        let body = json!({
            "class": self.collection,
            "properties": record,
        });

        let response = self
            .send(self.client.post(self.url("/objects")).json(&body), "insert")
            .await?;
        let response = Self::expect_success(response, "insert").await?;

        let created: CreatedObject = response
            .json()
            .await
            .map_err(|e| RagError::VectorStore(format!("unexpected insert response: {e}")))?;

        Ok(created.id)
    }

    async fn near_text(&self, query: &str, limit: usize) -> Result<Vec<StoredMatch>> {
        let body = json!({ "query": near_text_query(&self.collection, query, limit) });

        let response = self
            .send(self.client.post(self.url("/graphql")).json(&body), "query")
            .await?;
        let response = Self::expect_success(response, "query").await?;

        let decoded: GraphQlResponse = response
            .json()
            .await
            .map_err(|e| RagError::VectorStore(format!("unexpected query response: {e}")))?;

        self.decode_hits(decoded)
    }

    async fn ready(&self) -> Result<()> {
        let response = self
            .send(self.client.get(self.url("/.well-known/ready")), "readiness check")
            .await?;
        Self::expect_success(response, "readiness check").await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> WeaviateClient {
        WeaviateClient::new(&VectorStoreConfig {
            url: "http://localhost:8090/".to_string(),
            ..VectorStoreConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_url_strips_trailing_slash() {
        assert_eq!(
            client().url("/schema"),
            "http://localhost:8090/v1/schema"
        );
    }

    #[test]
    fn test_decode_hits_reads_distance() {
        let response: GraphQlResponse = serde_json::from_value(json!({
            "data": { "Get": { "Document": [
                { "content": "The sky is blue.", "source": "manual", "_additional": { "distance": 0.25 } },
                { "content": "Grass is green.", "source": null, "_additional": {} }
            ] } }
        }))
        .unwrap();

        let hits = client().decode_hits(response).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].distance, Some(0.25));
        assert_eq!(hits[0].source.as_deref(), Some("manual"));
        assert_eq!(hits[1].distance, None);
        assert_eq!(hits[1].source, None);
    }

    #[test]
    fn test_decode_hits_null_class_is_empty() {
        let response: GraphQlResponse =
            serde_json::from_value(json!({ "data": { "Get": { "Document": null } } })).unwrap();
        assert!(client().decode_hits(response).unwrap().is_empty());
    }

    #[test]
    fn test_decode_hits_surfaces_graphql_errors() {
        let response: GraphQlResponse = serde_json::from_value(json!({
            "data": null,
            "errors": [{ "message": "Cannot query field" }]
        }))
        .unwrap();

        let err = client().decode_hits(response).unwrap_err();
        assert!(matches!(err, RagError::VectorStore(_)));
        assert!(err.to_string().contains("Cannot query field"));
    }
}
