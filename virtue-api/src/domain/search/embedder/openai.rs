//! OpenAI embedder implementation.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::domain::search::traits::{Embedder, Result, SearchError};

pub const OPENAI_EMBEDDING_MODEL: &str = "text-embedding-3-small";
pub const OPENAI_EMBEDDING_DIMENSIONS: usize = 1536;

const API_BASE: &str = "https://api.openai.com/v1";

/// Embedder backed by OpenAI's `/embeddings` endpoint.
///
/// Batches are sent as a single request with an array input. Empty texts
/// short-circuit to zero vectors without a network call.
#[derive(Clone)]
pub struct OpenAiEmbedder {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiEmbedder {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_model(api_key, OPENAI_EMBEDDING_MODEL)
    }

    pub fn with_model(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Self::DEFAULT_TIMEOUT)
            .build()
            .expect("reqwest client");

        Self {
            http,
            api_key: api_key.into(),
            model: model.into(),
            base_url: API_BASE.to_string(),
        }
    }

    async fn request_embeddings(&self, inputs: &[&str]) -> Result<Vec<Vec<f32>>> {
        let response = self
            .http
            .post(format!("{}/embeddings", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": self.model,
                "input": inputs,
            }))
            .send()
            .await
            .map_err(|e| SearchError::Embedding(e.to_string()))?
            .error_for_status()
            .map_err(|e| SearchError::Embedding(e.to_string()))?;

        let body: EmbeddingsResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Embedding(format!("malformed response: {e}")))?;

        if body.data.len() != inputs.len() {
            return Err(SearchError::Embedding(format!(
                "expected {} embeddings, got {}",
                inputs.len(),
                body.data.len()
            )));
        }

        // The API may return entries out of order; `index` is authoritative.
        let mut results = vec![Vec::new(); inputs.len()];
        for entry in body.data {
            let slot = results
                .get_mut(entry.index)
                .ok_or_else(|| SearchError::Embedding("embedding index out of range".into()))?;
            *slot = entry.embedding;
        }

        Ok(results)
    }
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingEntry>,
}

#[derive(Deserialize)]
struct EmbeddingEntry {
    index: usize,
    embedding: Vec<f32>,
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if text.is_empty() {
            return Ok(vec![0.0; OPENAI_EMBEDDING_DIMENSIONS]);
        }

        let mut embeddings = self.request_embeddings(&[text]).await?;
        Ok(embeddings.remove(0))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        // Empty strings are rejected by the API; keep their slots as zeros.
        let non_empty: Vec<(usize, &str)> = texts
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.is_empty())
            .map(|(i, t)| (i, *t))
            .collect();

        let mut results = vec![vec![0.0f32; OPENAI_EMBEDDING_DIMENSIONS]; texts.len()];
        if non_empty.is_empty() {
            return Ok(results);
        }

        let inputs: Vec<&str> = non_empty.iter().map(|(_, t)| *t).collect();
        let embeddings = self.request_embeddings(&inputs).await?;

        for ((original_idx, _), embedding) in non_empty.into_iter().zip(embeddings) {
            results[original_idx] = embedding;
        }

        Ok(results)
    }

    fn dimensions(&self) -> usize {
        OPENAI_EMBEDDING_DIMENSIONS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_entries_are_reordered_by_index() {
        let payload = r#"{
            "data": [
                {"index": 1, "embedding": [2.0]},
                {"index": 0, "embedding": [1.0]}
            ]
        }"#;
        let body: EmbeddingsResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(body.data.len(), 2);
        assert_eq!(body.data[0].index, 1);
    }

    #[tokio::test]
    async fn empty_text_embeds_to_zeros_without_network() {
        let embedder = OpenAiEmbedder::new("test-key");
        let embedding = embedder.embed("").await.unwrap();
        assert_eq!(embedding.len(), OPENAI_EMBEDDING_DIMENSIONS);
        assert!(embedding.iter().all(|&x| x == 0.0));
    }

    #[tokio::test]
    async fn empty_batch_is_a_noop() {
        let embedder = OpenAiEmbedder::new("test-key");
        assert!(embedder.embed_batch(&[]).await.unwrap().is_empty());
    }
}
