use async_trait::async_trait;
use serde::Serialize;
use sqlx::PgPool;
use time::OffsetDateTime;

use super::repo_error::RepositoryError;

/// A request for a printed copy of the book, fulfilled manually.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BookRequest {
    pub id: i64,
    pub user_id: String,
    pub requester_name: String,
    pub address: String,
    pub language: String,
    pub status: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewBookRequest {
    pub user_id: String,
    pub requester_name: String,
    pub address: String,
    pub language: String,
}

#[async_trait]
pub trait BookRequestRepository {
    async fn create(&self, request: NewBookRequest) -> Result<BookRequest, RepositoryError>;
    async fn list(&self) -> Result<Vec<BookRequest>, RepositoryError>;
}

#[derive(Clone)]
pub struct BookRequestRepositoryImpl {
    pool: PgPool,
}

impl BookRequestRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookRequestRepository for BookRequestRepositoryImpl {
    async fn create(&self, request: NewBookRequest) -> Result<BookRequest, RepositoryError> {
        let request = sqlx::query_as::<_, BookRequest>(
            r#"
            INSERT INTO book_requests (user_id, requester_name, address, language)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, requester_name, address, language, status, created_at
            "#,
        )
        .bind(&request.user_id)
        .bind(&request.requester_name)
        .bind(&request.address)
        .bind(&request.language)
        .fetch_one(&self.pool)
        .await?;

        Ok(request)
    }

    async fn list(&self) -> Result<Vec<BookRequest>, RepositoryError> {
        let requests = sqlx::query_as::<_, BookRequest>(
            r#"
            SELECT id, user_id, requester_name, address, language, status, created_at
            FROM book_requests
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }
}
