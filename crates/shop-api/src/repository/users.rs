//! User Repository
//!
//! users 테이블 관련 데이터베이스 연산을 담당합니다.

use async_trait::async_trait;
use shop_core::{NewUser, StoreResult, User, UserChanges, UserStore};
use sqlx::PgPool;

const USER_COLUMNS: &str = "id, username, email, hashed_password, role, created_at, updated_at";

/// Postgres 사용자 저장소.
#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserRepository {
    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let record = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (username, email, hashed_password, role)
            VALUES ($1, $2, $3, $4)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.hashed_password)
        .bind(user.role.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    async fn find_user(&self, id: i64) -> StoreResult<Option<User>> {
        let record =
            sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(record)
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let record = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn update_user(&self, id: i64, changes: UserChanges) -> StoreResult<Option<User>> {
        // 부분 업데이트: NULL 파라미터는 기존 값을 유지
        let record = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET
                username = COALESCE($2, username),
                email = COALESCE($3, email),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&changes.username)
        .bind(&changes.email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn delete_user(&self, id: i64) -> StoreResult<bool> {
        // orders.user_id FK가 ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let records =
            sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"))
                .fetch_all(&self.pool)
                .await?;

        Ok(records)
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
