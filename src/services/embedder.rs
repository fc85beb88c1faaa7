use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use sha2::{Digest, Sha256};

use crate::{
    config::OpenAiSettings,
    errors::{AppResult, EmbeddingError},
    models::domain::EmbeddingVector,
};

pub const DEFAULT_HASH_DIMENSIONS: usize = 256;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> AppResult<EmbeddingVector>;

    fn embedder_name(&self) -> &'static str;
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponseBody {
    #[serde(default)]
    data: Vec<EmbeddingDatum>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingDatum {
    embedding: Vec<f32>,
}

/// Calls the OpenAI `/embeddings` endpoint (or any compatible server).
pub struct OpenAiEmbedder {
    http: reqwest::Client,
    api_key: SecretString,
    api_base: String,
    model: String,
}

impl OpenAiEmbedder {
    /// `http` should carry the outbound request timeout.
    pub fn new(http: reqwest::Client, settings: &OpenAiSettings) -> Self {
        Self {
            http,
            api_key: settings.api_key.clone(),
            api_base: settings.api_base.trim_end_matches('/').to_string(),
            model: settings.embedding_model.clone(),
        }
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> AppResult<EmbeddingVector> {
        let response = self
            .http
            .post(format!("{}/embeddings", self.api_base))
            .bearer_auth(self.api_key.expose_secret())
            .json(&json!({ "model": self.model, "input": text }))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    EmbeddingError::Service(format!("request timed out: {}", e))
                } else {
                    EmbeddingError::Service(format!("HTTP request failed: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::warn!("Embedding request returned {}: {}", status, body);
            return Err(EmbeddingError::Service(format!("HTTP {}: {}", status, body)).into());
        }

        let body: EmbeddingResponseBody = response
            .json()
            .await
            .map_err(|e| EmbeddingError::Service(format!("invalid response body: {}", e)))?;

        let vector = body
            .data
            .into_iter()
            .next()
            .map(|datum| datum.embedding)
            .filter(|embedding| !embedding.is_empty())
            .ok_or(EmbeddingError::EmptyResult)?;

        log::debug!("Embedded {} chars into {} dimensions", text.len(), vector.len());
        Ok(vector)
    }

    fn embedder_name(&self) -> &'static str {
        "openai"
    }
}

/// Offline embedder using signed feature hashing over lower-cased tokens.
/// Identical texts map to identical vectors and texts sharing vocabulary
/// score high under cosine similarity, which is enough for local caching.
pub struct HashEmbedder {
    dimensions: usize,
}

impl HashEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    fn embed_tokens(&self, text: &str) -> EmbeddingVector {
        let mut vector = vec![0.0f32; self.dimensions];

        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let digest = Sha256::digest(token.to_lowercase().as_bytes());
            let mut bucket_bytes = [0u8; 8];
            bucket_bytes.copy_from_slice(&digest[..8]);
            let bucket = (u64::from_le_bytes(bucket_bytes) % self.dimensions as u64) as usize;
            let sign = if digest[8] & 1 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|x| *x /= norm);
        }
        vector
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_HASH_DIMENSIONS)
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    async fn embed(&self, text: &str) -> AppResult<EmbeddingVector> {
        let vector = self.embed_tokens(text);
        if vector.iter().all(|x| *x == 0.0) {
            return Err(EmbeddingError::EmptyResult.into());
        }
        Ok(vector)
    }

    fn embedder_name(&self) -> &'static str {
        "hash"
    }
}
