//! Order Repository
//!
//! orders 테이블 관련 데이터베이스 연산을 담당합니다.

use async_trait::async_trait;
use shop_core::{NewOrder, Order, OrderChanges, OrderStore, StoreResult};
use sqlx::PgPool;

const ORDER_COLUMNS: &str =
    "id, user_id, order_date, total_amount, status, created_at, updated_at";

/// Postgres 주문 저장소.
#[derive(Debug, Clone)]
pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderStore for PgOrderRepository {
    async fn create_order(&self, order: NewOrder) -> StoreResult<Order> {
        // 존재하지 않는 user_id는 FK 위반 → StoreError::InvalidReference
        let record = sqlx::query_as::<_, Order>(&format!(
            r#"
            INSERT INTO orders (user_id, total_amount, status)
            VALUES ($1, $2, $3)
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(order.user_id)
        .bind(order.total_amount)
        .bind(order.status)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    async fn find_order(&self, id: i64) -> StoreResult<Option<Order>> {
        let record = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn update_order(&self, id: i64, changes: OrderChanges) -> StoreResult<Option<Order>> {
        let record = sqlx::query_as::<_, Order>(&format!(
            r#"
            UPDATE orders
            SET
                status = COALESCE($2, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.status)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn delete_order(&self, id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_orders(&self) -> StoreResult<Vec<Order>> {
        let records = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn list_orders_by_user(&self, user_id: i64) -> StoreResult<Vec<Order>> {
        let records = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY id"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}
