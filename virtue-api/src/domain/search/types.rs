//! Core types for the search domain.

use serde::{Deserialize, Serialize};

/// A poem prepared for indexing.
///
/// `id` is unique across the whole corpus: `{language}-{chapter_key}-{slug}`.
/// The embedding length is fixed per deployment by the embedder model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoemDocument {
    pub id: String,
    pub title: String,
    /// Plain text with markup stripped.
    pub content: String,
    /// Chapter display title, used for filtering and grouping.
    pub chapter: String,
    /// ISO language code.
    pub language: String,
    /// Route to the poem page, language-prefixed for non-English.
    pub path: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embedding: Vec<f32>,
}

/// One ranked hit from a search query.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub id: String,
    pub title: String,
    pub content: String,
    pub chapter: String,
    pub language: String,
    pub path: String,
    /// Title with query matches wrapped in `<mark>` tags.
    pub formatted_title: String,
    /// Content with query matches wrapped in `<mark>` tags.
    pub formatted_content: String,
    /// Engine-reported relevance, when available. Hits arrive ranked either
    /// way; no local re-ranking is performed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

/// Equality filters applied as an AND-combination.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexFilter {
    pub language: Option<String>,
    pub chapter: Option<String>,
}

impl IndexFilter {
    pub fn is_empty(&self) -> bool {
        self.language.is_none() && self.chapter.is_none()
    }
}

/// One hybrid query against the index.
#[derive(Debug, Clone)]
pub struct HybridQuery {
    pub text: String,
    pub embedding: Vec<f32>,
    pub filter: IndexFilter,
    /// Share of the vector-similarity score in the blended ranking,
    /// 0.0 (pure keyword) to 1.0 (pure semantic).
    pub semantic_ratio: f32,
    pub limit: usize,
}

/// Summary of a full index rebuild.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IndexingOutcome {
    pub documents_indexed: usize,
    /// Catalog entries skipped because their backing content was missing.
    pub documents_skipped: usize,
    pub languages_seen: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_embedding_is_omitted_from_json() {
        let doc = PoemDocument {
            id: "en-salvation-have-faith".into(),
            title: "Have Faith".into(),
            content: "Faith is the substance of things hoped for".into(),
            chapter: "Salvation".into(),
            language: "en".into(),
            path: "/salvation/have-faith".into(),
            embedding: vec![],
        };

        let json = serde_json::to_value(&doc).unwrap();
        assert!(json.get("embedding").is_none());
    }

    #[test]
    fn filter_emptiness() {
        assert!(IndexFilter::default().is_empty());
        assert!(!IndexFilter {
            language: Some("fr".into()),
            chapter: None,
        }
        .is_empty());
    }
}
