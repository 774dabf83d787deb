//! Query engine combining embedding generation and hybrid search.

use super::traits::{Embedder, Result, SearchError, SearchIndex};
use super::types::{HybridQuery, IndexFilter, SearchHit};

/// Configuration for the query side of search.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Result cap per query.
    pub limit: usize,
    /// Semantic share of the blended ranking: 0.7 means 70% vector
    /// similarity, 30% keyword relevance.
    pub semantic_ratio: f32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            limit: 20,
            semantic_ratio: 0.7,
        }
    }
}

/// Answers one search request with two sequential calls: embed the query
/// text, then issue a single hybrid query with AND-combined filters. Hits are
/// returned in engine order; no local re-ranking.
pub struct SearchService<E, I>
where
    E: Embedder,
    I: SearchIndex,
{
    embedder: E,
    index: I,
    config: SearchConfig,
}

impl<E, I> SearchService<E, I>
where
    E: Embedder,
    I: SearchIndex,
{
    pub fn new(embedder: E, index: I, config: SearchConfig) -> Self {
        Self {
            embedder,
            index,
            config,
        }
    }

    pub fn with_defaults(embedder: E, index: I) -> Self {
        Self::new(embedder, index, SearchConfig::default())
    }

    /// Execute a search query.
    ///
    /// An empty or whitespace-only query is rejected with
    /// [`SearchError::EmptyQuery`] before any external call.
    pub async fn search(
        &self,
        query_text: &str,
        language: Option<&str>,
        chapter: Option<&str>,
    ) -> Result<Vec<SearchHit>> {
        let query_text = query_text.trim();
        if query_text.is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        let embedding = self.embedder.embed(query_text).await?;

        let query = HybridQuery {
            text: query_text.to_string(),
            embedding,
            filter: IndexFilter {
                language: language.map(str::to_string),
                chapter: chapter.map(str::to_string),
            },
            semantic_ratio: self.config.semantic_ratio,
            limit: self.config.limit,
        };

        self.index.search(&query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::search::embedder::MockEmbedder;
    use crate::domain::search::index::MockSearchIndex;
    use crate::domain::search::types::PoemDocument;

    fn doc(id: &str, title: &str, language: &str, chapter: &str) -> PoemDocument {
        PoemDocument {
            id: id.into(),
            title: title.into(),
            content: format!("{title} full text"),
            chapter: chapter.into(),
            language: language.into(),
            path: format!("/{id}"),
            embedding: vec![],
        }
    }

    #[tokio::test]
    async fn empty_query_is_rejected_without_external_calls() {
        let embedder = MockEmbedder::default();
        let index = MockSearchIndex::new();
        let service = SearchService::with_defaults(embedder.clone(), index.clone());

        for query in ["", "   ", "\n\t"] {
            let err = service.search(query, None, None).await.unwrap_err();
            assert!(matches!(err, SearchError::EmptyQuery));
        }

        assert_eq!(embedder.call_count(), 0);
        assert_eq!(index.search_calls(), 0);
    }

    #[tokio::test]
    async fn query_embeds_once_and_searches_once() {
        let embedder = MockEmbedder::default();
        let index = MockSearchIndex::new();
        let service = SearchService::with_defaults(embedder.clone(), index.clone());

        service.search("faith", None, None).await.unwrap();

        assert_eq!(embedder.call_count(), 1);
        assert_eq!(index.search_calls(), 1);
    }

    #[tokio::test]
    async fn returns_matching_hits() {
        let index = MockSearchIndex::new().with_documents(vec![
            doc("en-salvation-have-faith", "Have Faith", "en", "Salvation"),
            doc("en-being-together-make-peace", "Make Peace", "en", "Being Together"),
        ]);
        let service = SearchService::with_defaults(MockEmbedder::default(), index);

        let hits = service.search("faith", None, None).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Have Faith");
        assert_eq!(hits[0].formatted_title, "Have <mark>Faith</mark>");
    }

    #[tokio::test]
    async fn language_filter_never_leaks_other_languages() {
        let index = MockSearchIndex::new().with_documents(vec![
            doc("en-salvation-have-faith", "Have Faith", "en", "Salvation"),
            doc("fr-salvation-have-faith", "Have Faith", "fr", "Salvation"),
            doc("es-salvation-have-faith", "Have Faith", "es", "Salvation"),
        ]);
        let service = SearchService::with_defaults(MockEmbedder::default(), index);

        let hits = service.search("faith", Some("fr"), None).await.unwrap();
        assert!(!hits.is_empty());
        assert!(hits.iter().all(|hit| hit.language == "fr"));
    }

    #[tokio::test]
    async fn chapter_filter_is_and_combined_with_language() {
        let index = MockSearchIndex::new().with_documents(vec![
            doc("en-salvation-have-faith", "Have Faith", "en", "Salvation"),
            doc("en-the-way-do-good", "Do Good", "en", "The Way"),
            doc("fr-salvation-have-faith", "Have Faith", "fr", "Salvation"),
        ]);
        let service = SearchService::with_defaults(MockEmbedder::default(), index);

        let hits = service
            .search("a", Some("en"), Some("Salvation"))
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "en-salvation-have-faith");
    }

    #[tokio::test]
    async fn respects_the_result_cap() {
        let docs: Vec<PoemDocument> = (0..30)
            .map(|i| doc(&format!("en-x-{i}"), &format!("Faith {i}"), "en", "Salvation"))
            .collect();
        let index = MockSearchIndex::new().with_documents(docs);
        let service = SearchService::new(
            MockEmbedder::default(),
            index,
            SearchConfig {
                limit: 20,
                semantic_ratio: 0.7,
            },
        );

        let hits = service.search("faith", None, None).await.unwrap();
        assert_eq!(hits.len(), 20);
    }
}
