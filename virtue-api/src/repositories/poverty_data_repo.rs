use async_trait::async_trait;
use serde::Serialize;
use sqlx::PgPool;
use time::OffsetDateTime;

use super::repo_error::RepositoryError;

/// A crowdsourced pointer to an external poverty dataset, with the tabular
/// data itself stored as a JSON document.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PovertyDataSource {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub source_url: String,
    pub source_org: Option<String>,
    pub data_table: serde_json::Value,
    pub geographic_scope: String,
    pub time_range: Option<String>,
    pub data_type: String,
    pub submission_notes: Option<String>,
    pub is_verified: bool,
    pub submitter_id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewPovertyDataSource {
    pub title: String,
    pub description: Option<String>,
    pub source_url: String,
    pub source_org: Option<String>,
    pub data_table: serde_json::Value,
    pub geographic_scope: String,
    pub time_range: Option<String>,
    pub data_type: String,
    pub submission_notes: Option<String>,
    pub submitter_id: String,
}

/// Optional filters, AND-combined. `search` matches title, description and
/// source org as a case-insensitive substring.
#[derive(Debug, Clone, Default)]
pub struct PovertyDataFilter {
    pub search: Option<String>,
    pub data_type: Option<String>,
    pub geographic_scope: Option<String>,
    pub verified_only: bool,
}

#[derive(Debug, Clone)]
pub struct PovertyDataPage {
    pub records: Vec<PovertyDataSource>,
    pub total: i64,
}

#[async_trait]
pub trait PovertyDataRepository {
    async fn list(
        &self,
        filter: &PovertyDataFilter,
        offset: i64,
        limit: i64,
    ) -> Result<PovertyDataPage, RepositoryError>;
    async fn create(
        &self,
        source: NewPovertyDataSource,
    ) -> Result<PovertyDataSource, RepositoryError>;
}

#[derive(Clone)]
pub struct PovertyDataRepositoryImpl {
    pool: PgPool,
}

impl PovertyDataRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const COLUMNS: &str = "id, title, description, source_url, source_org, data_table, \
     geographic_scope, time_range, data_type, submission_notes, is_verified, \
     submitter_id, created_at";

// Every filter is always bound; a NULL parameter disables its clause. One
// static statement instead of dynamic SQL assembly.
const FILTER_CLAUSE: &str = "is_active = TRUE \
     AND ($1::text IS NULL \
          OR title ILIKE '%' || $1 || '%' \
          OR description ILIKE '%' || $1 || '%' \
          OR source_org ILIKE '%' || $1 || '%') \
     AND ($2::text IS NULL OR data_type ILIKE '%' || $2 || '%') \
     AND ($3::text IS NULL OR geographic_scope ILIKE '%' || $3 || '%') \
     AND (NOT $4 OR is_verified)";

#[async_trait]
impl PovertyDataRepository for PovertyDataRepositoryImpl {
    async fn list(
        &self,
        filter: &PovertyDataFilter,
        offset: i64,
        limit: i64,
    ) -> Result<PovertyDataPage, RepositoryError> {
        let records = sqlx::query_as::<_, PovertyDataSource>(&format!(
            "SELECT {COLUMNS} FROM poverty_data_sources \
             WHERE {FILTER_CLAUSE} \
             ORDER BY created_at DESC \
             OFFSET $5 LIMIT $6"
        ))
        .bind(&filter.search)
        .bind(&filter.data_type)
        .bind(&filter.geographic_scope)
        .bind(filter.verified_only)
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        let (total,): (i64,) = sqlx::query_as(&format!(
            "SELECT COUNT(*) FROM poverty_data_sources WHERE {FILTER_CLAUSE}"
        ))
        .bind(&filter.search)
        .bind(&filter.data_type)
        .bind(&filter.geographic_scope)
        .bind(filter.verified_only)
        .fetch_one(&self.pool)
        .await?;

        Ok(PovertyDataPage { records, total })
    }

    async fn create(
        &self,
        source: NewPovertyDataSource,
    ) -> Result<PovertyDataSource, RepositoryError> {
        let record = sqlx::query_as::<_, PovertyDataSource>(&format!(
            "INSERT INTO poverty_data_sources \
                 (title, description, source_url, source_org, data_table, \
                  geographic_scope, time_range, data_type, submission_notes, submitter_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {COLUMNS}"
        ))
        .bind(&source.title)
        .bind(&source.description)
        .bind(&source.source_url)
        .bind(&source.source_org)
        .bind(&source.data_table)
        .bind(&source.geographic_scope)
        .bind(&source.time_range)
        .bind(&source.data_type)
        .bind(&source.submission_notes)
        .bind(&source.submitter_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }
}
