use async_trait::async_trait;
use serde::Serialize;
use sqlx::PgPool;
use time::OffsetDateTime;

use super::repo_error::RepositoryError;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Church {
    pub id: i64,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub website: Option<String>,
    pub created_by: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewChurch {
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub website: Option<String>,
    pub created_by: String,
}

#[async_trait]
pub trait ChurchRepository {
    async fn list(&self) -> Result<Vec<Church>, RepositoryError>;
    async fn create(&self, church: NewChurch) -> Result<Church, RepositoryError>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Church>, RepositoryError>;
    async fn add_member(&self, church_id: i64, user_id: &str) -> Result<(), RepositoryError>;
}

#[derive(Clone)]
pub struct ChurchRepositoryImpl {
    pool: PgPool,
}

impl ChurchRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChurchRepository for ChurchRepositoryImpl {
    async fn list(&self) -> Result<Vec<Church>, RepositoryError> {
        let churches = sqlx::query_as::<_, Church>(
            r#"
            SELECT id, slug, name, description, city, country, website, created_by, created_at
            FROM churches
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(churches)
    }

    async fn create(&self, church: NewChurch) -> Result<Church, RepositoryError> {
        let church = sqlx::query_as::<_, Church>(
            r#"
            INSERT INTO churches (slug, name, description, city, country, website, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, slug, name, description, city, country, website, created_by, created_at
            "#,
        )
        .bind(&church.slug)
        .bind(&church.name)
        .bind(&church.description)
        .bind(&church.city)
        .bind(&church.country)
        .bind(&church.website)
        .bind(&church.created_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(church)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Church>, RepositoryError> {
        let church = sqlx::query_as::<_, Church>(
            r#"
            SELECT id, slug, name, description, city, country, website, created_by, created_at
            FROM churches
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(church)
    }

    async fn add_member(&self, church_id: i64, user_id: &str) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO church_members (church_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (church_id, user_id) DO NOTHING
            "#,
        )
        .bind(church_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
