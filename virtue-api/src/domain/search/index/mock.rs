//! In-memory mock search index for testing.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::domain::search::traits::{Result, SearchIndex};
use crate::domain::search::types::{HybridQuery, PoemDocument, SearchHit};

/// Mock search index backed by an in-memory document map.
///
/// Search is a naive case-insensitive substring match over title and content,
/// honoring the language/chapter filters and the limit. Matches get the same
/// `<mark>` highlighting markers as the real engine.
#[derive(Clone, Default)]
pub struct MockSearchIndex {
    documents: Arc<RwLock<Vec<PoemDocument>>>,
    configured_dimensions: Arc<RwLock<Option<usize>>>,
    search_calls: Arc<AtomicUsize>,
    clear_calls: Arc<AtomicUsize>,
}

impl MockSearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_documents(self, docs: Vec<PoemDocument>) -> Self {
        self.documents.write().unwrap().extend(docs);
        self
    }

    pub fn len(&self) -> usize {
        self.documents.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.read().unwrap().is_empty()
    }

    pub fn all_documents(&self) -> Vec<PoemDocument> {
        self.documents.read().unwrap().clone()
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn clear_calls(&self) -> usize {
        self.clear_calls.load(Ordering::SeqCst)
    }

    pub fn configured_dimensions(&self) -> Option<usize> {
        *self.configured_dimensions.read().unwrap()
    }
}

fn highlight(text: &str, needle: &str) -> String {
    if needle.is_empty() {
        return text.to_string();
    }
    let lower_text = text.to_lowercase();
    let lower_needle = needle.to_lowercase();
    match lower_text.find(&lower_needle) {
        Some(start) if text.is_char_boundary(start) => {
            let end = start + lower_needle.len();
            if !text.is_char_boundary(end) {
                return text.to_string();
            }
            format!(
                "{}<mark>{}</mark>{}",
                &text[..start],
                &text[start..end],
                &text[end..]
            )
        }
        _ => text.to_string(),
    }
}

#[async_trait]
impl SearchIndex for MockSearchIndex {
    async fn configure(&self, dimensions: usize) -> Result<()> {
        *self.configured_dimensions.write().unwrap() = Some(dimensions);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.clear_calls.fetch_add(1, Ordering::SeqCst);
        self.documents.write().unwrap().clear();
        Ok(())
    }

    async fn add_documents(&self, documents: &[PoemDocument]) -> Result<()> {
        self.documents.write().unwrap().extend_from_slice(documents);
        Ok(())
    }

    async fn search(&self, query: &HybridQuery) -> Result<Vec<SearchHit>> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);

        let needle = query.text.to_lowercase();
        let documents = self.documents.read().unwrap();

        let hits = documents
            .iter()
            .filter(|doc| {
                if let Some(language) = &query.filter.language {
                    if &doc.language != language {
                        return false;
                    }
                }
                if let Some(chapter) = &query.filter.chapter {
                    if &doc.chapter != chapter {
                        return false;
                    }
                }
                doc.title.to_lowercase().contains(&needle)
                    || doc.content.to_lowercase().contains(&needle)
            })
            .take(query.limit)
            .map(|doc| SearchHit {
                id: doc.id.clone(),
                title: doc.title.clone(),
                content: doc.content.clone(),
                chapter: doc.chapter.clone(),
                language: doc.language.clone(),
                path: doc.path.clone(),
                formatted_title: highlight(&doc.title, &query.text),
                formatted_content: highlight(&doc.content, &query.text),
                score: None,
            })
            .collect();

        Ok(hits)
    }

    async fn document_count(&self) -> Result<usize> {
        Ok(self.len())
    }
}
