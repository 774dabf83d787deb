use async_trait::async_trait;
use serde::Serialize;
use sqlx::PgPool;
use time::OffsetDateTime;

use super::repo_error::RepositoryError;

/// A discussion thread attached to one poem stanza.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Thread {
    pub id: i64,
    /// Route of the stanza this thread discusses, e.g.
    /// `/salvation/have-faith#2`.
    pub stanza_path: String,
    pub title: String,
    pub content: String,
    pub author_id: String,
    pub is_locked: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewThread {
    pub stanza_path: String,
    pub title: String,
    pub content: String,
    pub author_id: String,
}

#[async_trait]
pub trait ThreadRepository {
    async fn create(&self, thread: NewThread) -> Result<Thread, RepositoryError>;
    async fn get(&self, id: i64) -> Result<Thread, RepositoryError>;
    async fn list_by_stanza(&self, stanza_path: &str) -> Result<Vec<Thread>, RepositoryError>;
}

#[derive(Clone)]
pub struct ThreadRepositoryImpl {
    pool: PgPool,
}

impl ThreadRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ThreadRepository for ThreadRepositoryImpl {
    async fn create(&self, thread: NewThread) -> Result<Thread, RepositoryError> {
        let thread = sqlx::query_as::<_, Thread>(
            r#"
            INSERT INTO threads (stanza_path, title, content, author_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, stanza_path, title, content, author_id, is_locked, created_at
            "#,
        )
        .bind(&thread.stanza_path)
        .bind(&thread.title)
        .bind(&thread.content)
        .bind(&thread.author_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(thread)
    }

    async fn get(&self, id: i64) -> Result<Thread, RepositoryError> {
        sqlx::query_as::<_, Thread>(
            r#"
            SELECT id, stanza_path, title, content, author_id, is_locked, created_at
            FROM threads
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| RepositoryError::NotFound(format!("thread {id}")))
    }

    async fn list_by_stanza(&self, stanza_path: &str) -> Result<Vec<Thread>, RepositoryError> {
        let threads = sqlx::query_as::<_, Thread>(
            r#"
            SELECT id, stanza_path, title, content, author_id, is_locked, created_at
            FROM threads
            WHERE stanza_path = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(stanza_path)
        .fetch_all(&self.pool)
        .await?;

        Ok(threads)
    }
}
