//! Meilisearch-backed search index over its HTTP API.
//!
//! Write operations (clear, add) are task-based on the Meilisearch side; this
//! client returns once the task is enqueued, matching the engine's
//! eventually-consistent contract.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::domain::search::traits::{Result, SearchError, SearchIndex};
use crate::domain::search::types::{HybridQuery, PoemDocument, SearchHit};

pub const POEMS_INDEX: &str = "poems";

/// The named embedder every document's vector is stored under.
const EMBEDDER_NAME: &str = "default";

const HIGHLIGHT_PRE_TAG: &str = "<mark>";
const HIGHLIGHT_POST_TAG: &str = "</mark>";

#[derive(Clone)]
pub struct MeiliIndex {
    http: reqwest::Client,
    host: String,
    api_key: Option<String>,
    index_uid: String,
}

impl MeiliIndex {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(host: impl Into<String>, api_key: Option<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Self::DEFAULT_TIMEOUT)
            .build()
            .expect("reqwest client");

        Self {
            http,
            host: host.into().trim_end_matches('/').to_string(),
            api_key,
            index_uid: POEMS_INDEX.to_string(),
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self.http.request(method, format!("{}{}", self.host, path));
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }
        builder
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(SearchError::Index(format!("{status}: {body}")))
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    hits: Vec<MeiliHit>,
}

#[derive(Deserialize)]
struct MeiliHit {
    id: String,
    title: String,
    content: String,
    chapter: String,
    language: String,
    path: String,
    #[serde(rename = "_formatted")]
    formatted: Option<FormattedFields>,
    #[serde(rename = "_rankingScore")]
    ranking_score: Option<f64>,
}

#[derive(Deserialize)]
struct FormattedFields {
    title: Option<String>,
    content: Option<String>,
}

#[derive(Deserialize)]
struct IndexStats {
    #[serde(rename = "numberOfDocuments")]
    number_of_documents: usize,
}

fn filter_expression(query: &HybridQuery) -> Option<String> {
    let mut clauses = Vec::new();
    if let Some(language) = &query.filter.language {
        clauses.push(format!(r#"language = "{}""#, sanitize(language)));
    }
    if let Some(chapter) = &query.filter.chapter {
        clauses.push(format!(r#"chapter = "{}""#, sanitize(chapter)));
    }
    if clauses.is_empty() {
        None
    } else {
        Some(clauses.join(" AND "))
    }
}

// Filter values are interpolated into the engine's filter syntax; quotes and
// backslashes must not break out of the string literal.
fn sanitize(value: &str) -> String {
    value.replace(['"', '\\'], "")
}

fn to_meili_document(doc: &PoemDocument) -> Value {
    json!({
        "id": doc.id,
        "title": doc.title,
        "content": doc.content,
        "chapter": doc.chapter,
        "language": doc.language,
        "path": doc.path,
        "_vectors": { EMBEDDER_NAME: doc.embedding },
    })
}

#[async_trait]
impl SearchIndex for MeiliIndex {
    async fn configure(&self, dimensions: usize) -> Result<()> {
        // Index creation is idempotent at the task level; an already-existing
        // index fails its task without affecting the settings update below.
        let response = self
            .request(reqwest::Method::POST, "/indexes")
            .json(&json!({ "uid": self.index_uid, "primaryKey": "id" }))
            .send()
            .await
            .map_err(|e| SearchError::Index(e.to_string()))?;
        Self::check(response).await?;

        let settings = json!({
            "searchableAttributes": ["title", "content", "chapter"],
            "filterableAttributes": ["language", "chapter"],
            "sortableAttributes": ["title", "chapter"],
            "embedders": {
                EMBEDDER_NAME: {
                    "source": "userProvided",
                    "dimensions": dimensions,
                }
            },
        });

        let response = self
            .request(
                reqwest::Method::PATCH,
                &format!("/indexes/{}/settings", self.index_uid),
            )
            .json(&settings)
            .send()
            .await
            .map_err(|e| SearchError::Index(e.to_string()))?;
        Self::check(response).await?;

        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let response = self
            .request(
                reqwest::Method::DELETE,
                &format!("/indexes/{}/documents", self.index_uid),
            )
            .send()
            .await
            .map_err(|e| SearchError::Index(e.to_string()))?;

        // A fresh deployment has no index yet; nothing to clear.
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        Self::check(response).await?;
        Ok(())
    }

    async fn add_documents(&self, documents: &[PoemDocument]) -> Result<()> {
        let payload: Vec<Value> = documents.iter().map(to_meili_document).collect();

        let response = self
            .request(
                reqwest::Method::POST,
                &format!("/indexes/{}/documents", self.index_uid),
            )
            .json(&payload)
            .send()
            .await
            .map_err(|e| SearchError::Index(e.to_string()))?;
        Self::check(response).await?;

        Ok(())
    }

    async fn search(&self, query: &HybridQuery) -> Result<Vec<SearchHit>> {
        let mut body = json!({
            "q": query.text,
            "vector": query.embedding,
            "hybrid": {
                "embedder": EMBEDDER_NAME,
                "semanticRatio": query.semantic_ratio,
            },
            "limit": query.limit,
            "attributesToHighlight": ["title", "content"],
            "highlightPreTag": HIGHLIGHT_PRE_TAG,
            "highlightPostTag": HIGHLIGHT_POST_TAG,
            "showRankingScore": true,
        });
        if let Some(filter) = filter_expression(query) {
            body["filter"] = Value::String(filter);
        }

        let response = self
            .request(
                reqwest::Method::POST,
                &format!("/indexes/{}/search", self.index_uid),
            )
            .json(&body)
            .send()
            .await
            .map_err(|e| SearchError::Index(e.to_string()))?;
        let response = Self::check(response).await?;

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Index(format!("malformed response: {e}")))?;

        Ok(body
            .hits
            .into_iter()
            .map(|hit| {
                let formatted_title = hit
                    .formatted
                    .as_ref()
                    .and_then(|f| f.title.clone())
                    .unwrap_or_else(|| hit.title.clone());
                let formatted_content = hit
                    .formatted
                    .as_ref()
                    .and_then(|f| f.content.clone())
                    .unwrap_or_else(|| hit.content.clone());
                SearchHit {
                    id: hit.id,
                    title: hit.title,
                    content: hit.content,
                    chapter: hit.chapter,
                    language: hit.language,
                    path: hit.path,
                    formatted_title,
                    formatted_content,
                    score: hit.ranking_score,
                }
            })
            .collect())
    }

    async fn document_count(&self) -> Result<usize> {
        let response = self
            .request(
                reqwest::Method::GET,
                &format!("/indexes/{}/stats", self.index_uid),
            )
            .send()
            .await
            .map_err(|e| SearchError::Index(e.to_string()))?;
        let response = Self::check(response).await?;

        let stats: IndexStats = response
            .json()
            .await
            .map_err(|e| SearchError::Index(format!("malformed response: {e}")))?;
        Ok(stats.number_of_documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::search::types::IndexFilter;

    fn query_with_filter(filter: IndexFilter) -> HybridQuery {
        HybridQuery {
            text: "faith".into(),
            embedding: vec![0.0; 4],
            filter,
            semantic_ratio: 0.7,
            limit: 20,
        }
    }

    #[test]
    fn no_filter_yields_none() {
        assert_eq!(filter_expression(&query_with_filter(IndexFilter::default())), None);
    }

    #[test]
    fn filters_are_and_combined() {
        let filter = IndexFilter {
            language: Some("fr".into()),
            chapter: Some("Salvation".into()),
        };
        assert_eq!(
            filter_expression(&query_with_filter(filter)).as_deref(),
            Some(r#"language = "fr" AND chapter = "Salvation""#)
        );
    }

    #[test]
    fn filter_values_cannot_escape_the_string_literal() {
        let filter = IndexFilter {
            language: Some(r#"fr" OR language = "en"#.into()),
            chapter: None,
        };
        assert_eq!(
            filter_expression(&query_with_filter(filter)).as_deref(),
            Some(r#"language = "fr OR language = en""#)
        );
    }

    #[test]
    fn documents_carry_vectors_under_the_default_embedder() {
        let doc = PoemDocument {
            id: "en-salvation-have-faith".into(),
            title: "Have Faith".into(),
            content: "text".into(),
            chapter: "Salvation".into(),
            language: "en".into(),
            path: "/salvation/have-faith".into(),
            embedding: vec![0.5, 0.25],
        };

        let value = to_meili_document(&doc);
        assert_eq!(value["_vectors"]["default"], json!([0.5, 0.25]));
        assert_eq!(value["id"], "en-salvation-have-faith");
    }

    #[test]
    fn hit_parsing_falls_back_to_plain_fields() {
        let payload = r#"{
            "hits": [{
                "id": "en-salvation-have-faith",
                "title": "Have Faith",
                "content": "Faith is a gift",
                "chapter": "Salvation",
                "language": "en",
                "path": "/salvation/have-faith",
                "_rankingScore": 0.87
            }]
        }"#;

        let body: SearchResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(body.hits.len(), 1);
        assert!(body.hits[0].formatted.is_none());
        assert_eq!(body.hits[0].ranking_score, Some(0.87));
    }
}
