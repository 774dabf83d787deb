//! Full-corpus indexer: catalog walk, text extraction, embeddings, bulk load.

use tracing::{debug, info};

use super::corpus::{catalog, extract_plain_text, languages};
use super::traits::{Embedder, PoemSource, Result, SearchIndex};
use super::types::{IndexingOutcome, PoemDocument};

/// Configuration for the search indexer.
#[derive(Debug, Clone)]
pub struct IndexerConfig {
    /// Documents embedded per batch request.
    pub embedding_batch_size: usize,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            embedding_batch_size: 100,
        }
    }
}

/// Rebuilds the search index from scratch.
///
/// A rebuild fully replaces the prior index generation: the index is cleared
/// before documents are collected, so there is no incremental upsert and no
/// duplicate accumulation across runs. Missing poems are skipped (a partial
/// corpus is acceptable); an embedding batch failure aborts the whole run,
/// since a half-embedded corpus has no defined search semantics.
///
/// Not safe to run concurrently with itself - the caller serializes rebuilds
/// (see the rebuild guard in `AppState`).
pub struct SearchIndexer<E, I, S>
where
    E: Embedder,
    I: SearchIndex,
    S: PoemSource,
{
    embedder: E,
    index: I,
    source: S,
    config: IndexerConfig,
}

impl<E, I, S> SearchIndexer<E, I, S>
where
    E: Embedder,
    I: SearchIndex,
    S: PoemSource,
{
    pub fn new(embedder: E, index: I, source: S, config: IndexerConfig) -> Self {
        Self {
            embedder,
            index,
            source,
            config,
        }
    }

    pub fn with_defaults(embedder: E, index: I, source: S) -> Self {
        Self::new(embedder, index, source, IndexerConfig::default())
    }

    /// Clear and rebuild the whole index.
    pub async fn rebuild(&self) -> Result<IndexingOutcome> {
        info!("Starting full poem index rebuild");

        self.index.clear().await?;
        self.index.configure(self.embedder.dimensions()).await?;

        let (mut documents, embedding_texts, outcome) = self.collect_documents().await?;
        info!(
            documents = documents.len(),
            skipped = outcome.documents_skipped,
            "Collected poem documents"
        );

        self.assign_embeddings(&mut documents, &embedding_texts)
            .await?;

        self.index.add_documents(&documents).await?;

        info!(
            documents = outcome.documents_indexed,
            skipped = outcome.documents_skipped,
            languages = outcome.languages_seen,
            "Poem index rebuild completed"
        );

        Ok(outcome)
    }

    /// Walk the catalog for every language, building documents with empty
    /// embeddings plus the `title + content` text each will be embedded from.
    async fn collect_documents(&self) -> Result<(Vec<PoemDocument>, Vec<String>, IndexingOutcome)> {
        let mut documents = Vec::new();
        let mut embedding_texts = Vec::new();
        let mut outcome = IndexingOutcome::default();

        for language in languages() {
            let mut seen_any = false;

            for chapter in catalog() {
                for poem in chapter.poems {
                    let slug = poem.slug();
                    let Some(raw) = self.source.load(language, chapter.key, slug).await? else {
                        debug!(language, chapter = chapter.key, slug, "Skipping missing poem");
                        outcome.documents_skipped += 1;
                        continue;
                    };

                    let content = extract_plain_text(&raw);
                    let path = if *language == "en" {
                        poem.path.to_string()
                    } else {
                        format!("/{language}{}", poem.path)
                    };

                    embedding_texts.push(format!("{} {}", poem.title, content));
                    documents.push(PoemDocument {
                        id: format!("{language}-{}-{slug}", chapter.key),
                        title: poem.title.to_string(),
                        content,
                        chapter: chapter.title.to_string(),
                        language: language.to_string(),
                        path,
                        embedding: Vec::new(),
                    });
                    seen_any = true;
                }
            }

            if seen_any {
                outcome.languages_seen += 1;
            }
        }

        outcome.documents_indexed = documents.len();
        Ok((documents, embedding_texts, outcome))
    }

    async fn assign_embeddings(
        &self,
        documents: &mut [PoemDocument],
        embedding_texts: &[String],
    ) -> Result<()> {
        let batch_size = self.config.embedding_batch_size.max(1);

        for (docs, texts) in documents
            .chunks_mut(batch_size)
            .zip(embedding_texts.chunks(batch_size))
        {
            let text_refs: Vec<&str> = texts.iter().map(String::as_str).collect();
            let embeddings = self.embedder.embed_batch(&text_refs).await?;

            for (doc, embedding) in docs.iter_mut().zip(embeddings) {
                doc.embedding = embedding;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::search::embedder::MockEmbedder;
    use crate::domain::search::index::MockSearchIndex;
    use crate::domain::search::traits::SearchError;
    use async_trait::async_trait;
    use std::collections::HashMap;

    /// Poem source backed by a map from (language, chapter, slug) to markup.
    #[derive(Default)]
    struct MapPoemSource {
        poems: HashMap<(String, String, String), String>,
    }

    impl MapPoemSource {
        fn with_poem(mut self, language: &str, chapter: &str, slug: &str, raw: &str) -> Self {
            self.poems.insert(
                (language.into(), chapter.into(), slug.into()),
                raw.to_string(),
            );
            self
        }

        /// Every catalog poem present for the given languages.
        fn full_for_languages(languages: &[&str]) -> Self {
            let mut source = Self::default();
            for language in languages {
                for chapter in catalog() {
                    for poem in chapter.poems {
                        source = source.with_poem(
                            language,
                            chapter.key,
                            poem.slug(),
                            &format!("<Stanza>{} in {language}</Stanza>", poem.title),
                        );
                    }
                }
            }
            source
        }
    }

    #[async_trait]
    impl PoemSource for MapPoemSource {
        async fn load(
            &self,
            language: &str,
            chapter_key: &str,
            slug: &str,
        ) -> Result<Option<String>> {
            Ok(self
                .poems
                .get(&(language.into(), chapter_key.into(), slug.into()))
                .cloned())
        }
    }

    struct FailingEmbedder;

    #[async_trait]
    impl Embedder for FailingEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Err(SearchError::Embedding("embedding service down".into()))
        }

        fn dimensions(&self) -> usize {
            1536
        }
    }

    #[tokio::test]
    async fn rebuild_indexes_available_poems() {
        let index = MockSearchIndex::new();
        let source = MapPoemSource::full_for_languages(&["en", "fr"]);
        let indexer =
            SearchIndexer::with_defaults(MockEmbedder::default(), index.clone(), source);

        let outcome = indexer.rebuild().await.unwrap();

        // 60 catalog poems per available language.
        assert_eq!(outcome.documents_indexed, 120);
        assert_eq!(outcome.languages_seen, 2);
        assert_eq!(index.len(), 120);
        // The other eight languages have no content at all.
        assert_eq!(outcome.documents_skipped, 8 * 60);
    }

    #[tokio::test]
    async fn rebuild_replaces_the_previous_generation() {
        let index = MockSearchIndex::new();
        let source = MapPoemSource::full_for_languages(&["en"]);
        let indexer =
            SearchIndexer::with_defaults(MockEmbedder::default(), index.clone(), source);

        indexer.rebuild().await.unwrap();
        let first_count = index.len();
        assert_eq!(first_count, 60);

        indexer.rebuild().await.unwrap();
        assert_eq!(index.len(), first_count, "rebuild must not duplicate documents");
        assert_eq!(index.clear_calls(), 2);
    }

    #[tokio::test]
    async fn rebuild_declares_the_embedder_dimensions() {
        let index = MockSearchIndex::new();
        let embedder = MockEmbedder::returning(vec![0.5; 8]);
        let source = MapPoemSource::full_for_languages(&["en"]);
        let indexer = SearchIndexer::with_defaults(embedder, index.clone(), source);

        indexer.rebuild().await.unwrap();
        assert_eq!(index.configured_dimensions(), Some(8));
    }

    #[tokio::test]
    async fn documents_get_their_embeddings_assigned() {
        let index = MockSearchIndex::new();
        let embedder = MockEmbedder::returning(vec![0.25; 4]);
        let source = MapPoemSource::full_for_languages(&["en"]);
        let indexer = SearchIndexer::new(
            embedder.clone(),
            index.clone(),
            source,
            IndexerConfig {
                embedding_batch_size: 7,
            },
        );

        indexer.rebuild().await.unwrap();

        assert_eq!(embedder.call_count(), 60);
        assert!(index
            .all_documents()
            .iter()
            .all(|doc| doc.embedding == vec![0.25; 4]));
    }

    #[tokio::test]
    async fn content_is_stripped_and_ids_are_composite() {
        let index = MockSearchIndex::new();
        let source = MapPoemSource::default().with_poem(
            "es",
            "salvation",
            "have-faith",
            "---\ntitle: x\n---\n<Stanza>La fe es un regalo</Stanza>",
        );
        let indexer =
            SearchIndexer::with_defaults(MockEmbedder::default(), index.clone(), source);

        indexer.rebuild().await.unwrap();

        let docs = index.all_documents();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, "es-salvation-have-faith");
        assert_eq!(docs[0].content, "La fe es un regalo");
        assert_eq!(docs[0].chapter, "Salvation");
        assert_eq!(docs[0].path, "/es/salvation/have-faith");
    }

    #[tokio::test]
    async fn embedding_failure_aborts_the_rebuild() {
        let index = MockSearchIndex::new();
        let source = MapPoemSource::full_for_languages(&["en"]);
        let indexer = SearchIndexer::with_defaults(FailingEmbedder, index.clone(), source);

        let err = indexer.rebuild().await.unwrap_err();
        assert!(matches!(err, SearchError::Embedding(_)));
        // The clear already happened but nothing was loaded.
        assert!(index.is_empty());
    }

    #[tokio::test]
    async fn empty_corpus_still_succeeds() {
        let index = MockSearchIndex::new();
        let indexer = SearchIndexer::with_defaults(
            MockEmbedder::default(),
            index.clone(),
            MapPoemSource::default(),
        );

        let outcome = indexer.rebuild().await.unwrap();
        assert_eq!(outcome.documents_indexed, 0);
        assert_eq!(outcome.languages_seen, 0);
        assert!(index.is_empty());
    }
}
