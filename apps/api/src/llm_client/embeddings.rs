use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::llm_client::{post_with_retry, LlmError};
use crate::matching::Embedding;

const EMBEDDINGS_API_URL: &str = "https://api.openai.com/v1/embeddings";
pub const EMBEDDING_MODEL: &str = "text-embedding-3-large";
/// Dimensionality of every vector in one deployment, résumés and jobs alike.
pub const EMBEDDING_DIMENSIONS: usize = 3072;

/// Turns text into a fixed-length embedding.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Embedding, LlmError>;
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
    dimensions: usize,
}

#[derive(Debug, Deserialize)]
pub struct EmbeddingResponse {
    pub data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
pub struct EmbeddingData {
    #[serde(default)]
    pub index: usize,
    pub embedding: Vec<f64>,
}

impl EmbeddingResponse {
    /// The vector for the first (and only) input.
    pub fn into_embedding(self) -> Option<Embedding> {
        self.data
            .into_iter()
            .min_by_key(|d| d.index)
            .map(|d| d.embedding)
            .filter(|e| !e.is_empty())
    }
}

#[derive(Clone)]
pub struct EmbeddingClient {
    client: Client,
    api_key: String,
    dimensions: usize,
}

impl EmbeddingClient {
    pub fn new(client: Client, api_key: String) -> Self {
        Self {
            client,
            api_key,
            dimensions: EMBEDDING_DIMENSIONS,
        }
    }
}

#[async_trait]
impl Embedder for EmbeddingClient {
    /// Blank text maps to the zero vector without calling the API.
    async fn embed(&self, text: &str) -> Result<Embedding, LlmError> {
        if text.trim().is_empty() {
            return Ok(vec![0.0; self.dimensions]);
        }

        let request = EmbeddingRequest {
            model: EMBEDDING_MODEL,
            input: text,
            dimensions: self.dimensions,
        };
        let response: EmbeddingResponse =
            post_with_retry(&self.client, EMBEDDINGS_API_URL, &self.api_key, &request).await?;

        let embedding = response.into_embedding().ok_or(LlmError::EmptyContent)?;
        debug!(
            chars = text.len(),
            dimensions = embedding.len(),
            "Embedding call succeeded"
        );
        Ok(embedding)
    }
}
