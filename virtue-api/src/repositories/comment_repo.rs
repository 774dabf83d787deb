use async_trait::async_trait;
use serde::Serialize;
use sqlx::PgPool;
use time::OffsetDateTime;

use super::repo_error::RepositoryError;

/// A comment in a thread, optionally replying to another comment.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub thread_id: i64,
    pub parent_id: Option<i64>,
    pub content: String,
    pub author_id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub thread_id: i64,
    pub parent_id: Option<i64>,
    pub content: String,
    pub author_id: String,
}

#[async_trait]
pub trait CommentRepository {
    async fn create(&self, comment: NewComment) -> Result<Comment, RepositoryError>;
    async fn get(&self, id: i64) -> Result<Comment, RepositoryError>;
    async fn list_by_thread(&self, thread_id: i64) -> Result<Vec<Comment>, RepositoryError>;
}

#[derive(Clone)]
pub struct CommentRepositoryImpl {
    pool: PgPool,
}

impl CommentRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for CommentRepositoryImpl {
    async fn create(&self, comment: NewComment) -> Result<Comment, RepositoryError> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (thread_id, parent_id, content, author_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, thread_id, parent_id, content, author_id, created_at
            "#,
        )
        .bind(comment.thread_id)
        .bind(comment.parent_id)
        .bind(&comment.content)
        .bind(&comment.author_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(comment)
    }

    async fn get(&self, id: i64) -> Result<Comment, RepositoryError> {
        sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, thread_id, parent_id, content, author_id, created_at
            FROM comments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| RepositoryError::NotFound(format!("comment {id}")))
    }

    async fn list_by_thread(&self, thread_id: i64) -> Result<Vec<Comment>, RepositoryError> {
        let comments = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, thread_id, parent_id, content, author_id, created_at
            FROM comments
            WHERE thread_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(thread_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }
}
