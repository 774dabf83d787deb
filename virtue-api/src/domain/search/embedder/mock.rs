//! Mock embedder implementation for testing.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::search::traits::{Embedder, Result};

/// Mock embedder that returns configurable vectors and counts calls.
#[derive(Clone)]
pub struct MockEmbedder {
    responses: Arc<Vec<Vec<f32>>>,
    call_count: Arc<AtomicUsize>,
    dimensions: usize,
}

impl MockEmbedder {
    /// Mock that always returns the same vector.
    pub fn returning(vector: Vec<f32>) -> Self {
        let dimensions = vector.len();
        Self {
            responses: Arc::new(vec![vector]),
            call_count: Arc::new(AtomicUsize::new(0)),
            dimensions,
        }
    }

    /// Mock that returns vectors in sequence, wrapping around when exhausted.
    pub fn with_sequence(vectors: Vec<Vec<f32>>) -> Self {
        let dimensions = vectors.first().map(Vec::len).unwrap_or(1536);
        Self {
            responses: Arc::new(vectors),
            call_count: Arc::new(AtomicUsize::new(0)),
            dimensions,
        }
    }

    /// Number of texts embedded so far, batches counted per item.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

impl Default for MockEmbedder {
    fn default() -> Self {
        Self::returning(vec![0.1; 1536])
    }
}

#[async_trait]
impl Embedder for MockEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        let idx = self.call_count.fetch_add(1, Ordering::SeqCst);
        Ok(self.responses[idx % self.responses.len()].clone())
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for _ in texts {
            let idx = self.call_count.fetch_add(1, Ordering::SeqCst);
            results.push(self.responses[idx % self.responses.len()].clone());
        }
        Ok(results)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_fixed_vector() {
        let embedder = MockEmbedder::returning(vec![1.0, 2.0]);
        assert_eq!(embedder.embed("a").await.unwrap(), vec![1.0, 2.0]);
        assert_eq!(embedder.embed("b").await.unwrap(), vec![1.0, 2.0]);
        assert_eq!(embedder.dimensions(), 2);
    }

    #[tokio::test]
    async fn sequence_wraps_around() {
        let embedder = MockEmbedder::with_sequence(vec![vec![1.0], vec![2.0]]);
        assert_eq!(embedder.embed("a").await.unwrap(), vec![1.0]);
        assert_eq!(embedder.embed("b").await.unwrap(), vec![2.0]);
        assert_eq!(embedder.embed("c").await.unwrap(), vec![1.0]);
    }

    #[tokio::test]
    async fn batch_counts_per_item() {
        let embedder = MockEmbedder::default();
        embedder.embed_batch(&["a", "b", "c"]).await.unwrap();
        assert_eq!(embedder.call_count(), 3);
    }
}
