//! PostgreSQL user repository implementation

use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::{DbError, DbResult};
use crate::models::UserRow;
use crate::repo::{NewUser, UserRepository};

/// PostgreSQL user repository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: i32) -> DbResult<Option<UserRow>> {
        let user = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, telegram_id, name, avatar, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_telegram_id(&self, telegram_id: i64) -> DbResult<Option<UserRow>> {
        let user = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, telegram_id, name, avatar, created_at, updated_at
            FROM users
            WHERE telegram_id = $1
            "#,
        )
        .bind(telegram_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create(&self, user: NewUser) -> DbResult<UserRow> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (telegram_id, name, avatar)
            VALUES ($1, $2, $3)
            RETURNING id, telegram_id, name, avatar, created_at, updated_at
            "#,
        )
        .bind(user.telegram_id)
        .bind(&user.name)
        .bind(&user.avatar)
        .fetch_one(&self.pool)
        .await
        .map_err(DbError::from_sqlx)?;

        Ok(row)
    }

    async fn update_profile(&self, id: i32, name: &str, avatar: Option<&str>) -> DbResult<()> {
        // COALESCE keeps the stored avatar when the claim carried none
        sqlx::query(
            r#"
            UPDATE users
            SET name = $1, avatar = COALESCE($2, avatar), updated_at = now()
            WHERE id = $3
            "#,
        )
        .bind(name)
        .bind(avatar)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
