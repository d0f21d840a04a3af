/*
 * Responsibility
 * - users テーブル向け SQLx 操作
 * - token → identity 解決に使う UserDirectory trait と PostgreSQL 実装
 * - DB エラーは RepoError で返す (AppError への変換は error.rs)
 */
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::RepoError;

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    #[sqlx(rename = "userId")]
    pub id: Uuid,
    #[sqlx(rename = "userName")]
    pub user_name: String,
    #[sqlx(rename = "imageUrl")]
    pub image_url: Option<String>,
}

/// Looks up users by id. The auth guard only depends on this trait.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find(&self, user_id: Uuid) -> Result<Option<UserRow>, RepoError>;
}

#[derive(Clone, Debug)]
pub struct PgUserDirectory {
    db: PgPool,
}

impl PgUserDirectory {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn find(&self, user_id: Uuid) -> Result<Option<UserRow>, RepoError> {
        get(&self.db, user_id).await
    }
}

pub async fn get(db: &PgPool, user_id: Uuid) -> Result<Option<UserRow>, RepoError> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT "userId", "userName", "imageUrl"
        FROM users
        WHERE "userId" = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(db)
    .await?;

    Ok(row)
}
