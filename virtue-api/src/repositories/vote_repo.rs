use async_trait::async_trait;
use serde::Serialize;
use sqlx::PgPool;
use time::OffsetDateTime;

use super::repo_error::RepositoryError;

/// One user's vote on a thread or comment. A user holds at most one vote per
/// target; a repeat vote overwrites the previous value.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub id: i64,
    pub user_id: String,
    pub target_type: String,
    pub target_id: i64,
    pub value: i16,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewVote {
    pub user_id: String,
    pub target_type: String,
    pub target_id: i64,
    pub value: i16,
}

#[async_trait]
pub trait VoteRepository {
    async fn upsert(&self, vote: NewVote) -> Result<Vote, RepositoryError>;
}

#[derive(Clone)]
pub struct VoteRepositoryImpl {
    pool: PgPool,
}

impl VoteRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VoteRepository for VoteRepositoryImpl {
    async fn upsert(&self, vote: NewVote) -> Result<Vote, RepositoryError> {
        let vote = sqlx::query_as::<_, Vote>(
            r#"
            INSERT INTO votes (user_id, target_type, target_id, value)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, target_type, target_id)
            DO UPDATE SET value = EXCLUDED.value
            RETURNING id, user_id, target_type, target_id, value, created_at
            "#,
        )
        .bind(&vote.user_id)
        .bind(&vote.target_type)
        .bind(vote.target_id)
        .bind(vote.value)
        .fetch_one(&self.pool)
        .await?;

        Ok(vote)
    }
}
