//! Trait definitions for the search domain abstractions.
//!
//! These traits enable dependency injection and easy testing through mocking.

use async_trait::async_trait;

use super::types::{HybridQuery, PoemDocument, SearchHit};

/// Error type for search operations.
///
/// Unlike moderation there is no safe default for "did this embed/search",
/// so every variant except `EmptyQuery` surfaces to the caller as a hard
/// error.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Rejected before any external call is made.
    #[error("query text must not be empty")]
    EmptyQuery,

    #[error("embedding generation failed: {0}")]
    Embedding(String),

    #[error("search index error: {0}")]
    Index(String),

    #[error("poem source error: {0}")]
    Source(String),
}

pub type Result<T> = std::result::Result<T, SearchError>;

/// Text embedding generation.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate an embedding for a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for multiple texts in a batch.
    ///
    /// Default implementation calls `embed` sequentially; implementations
    /// should override it with a real batch call.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }

    /// Embedding dimensionality of this embedder's model.
    fn dimensions(&self) -> usize;
}

/// The search engine, abstracted over its wire protocol.
#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Create the index if needed and declare its schema: searchable
    /// {title, content, chapter}, filterable {language, chapter}, sortable
    /// {title, chapter}, and a user-provided vector of `dimensions` floats.
    /// Idempotent.
    async fn configure(&self, dimensions: usize) -> Result<()>;

    /// Delete every document. Tolerates the index not existing yet.
    async fn clear(&self) -> Result<()>;

    /// Bulk-add documents in one operation.
    async fn add_documents(&self, documents: &[PoemDocument]) -> Result<()>;

    /// Execute one hybrid (keyword + vector) query. Hits are returned in
    /// engine ranking order.
    async fn search(&self, query: &HybridQuery) -> Result<Vec<SearchHit>>;

    /// Total number of indexed documents.
    async fn document_count(&self) -> Result<usize>;
}

/// Raw poem content lookup, abstracted over storage.
#[async_trait]
pub trait PoemSource: Send + Sync {
    /// Load the raw markup of one poem. `Ok(None)` when the poem has no
    /// backing content in this language; a partial corpus is acceptable.
    async fn load(&self, language: &str, chapter_key: &str, slug: &str) -> Result<Option<String>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // The service and indexer hold these behind generics, but the traits must
    // stay object-safe for AppState wiring.
    fn _assert_embedder_object_safe(_: &dyn Embedder) {}
    fn _assert_index_object_safe(_: &dyn SearchIndex) {}
    fn _assert_source_object_safe(_: &dyn PoemSource) {}
}
