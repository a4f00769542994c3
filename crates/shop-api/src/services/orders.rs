//! 주문 관리.

use rust_decimal::Decimal;
use shop_core::{NewOrder, Order, OrderChanges, OrderStatus, OrderStore, User};
use tracing::info;

use crate::auth::policy;
use crate::error::{ApiError, ApiResult};
use crate::metrics;

/// 주문 서비스.
pub struct OrderService<'a> {
    store: &'a dyn OrderStore,
}

impl<'a> OrderService<'a> {
    pub fn new(store: &'a dyn OrderStore) -> Self {
        Self { store }
    }

    /// 요청자 소유의 주문 생성.
    pub async fn place_order(
        &self,
        owner: &User,
        total_amount: Decimal,
        status: OrderStatus,
    ) -> ApiResult<Order> {
        let order = self
            .store
            .create_order(NewOrder {
                user_id: owner.id,
                total_amount,
                status,
            })
            .await?;

        metrics::record_order_created(order.status);
        info!(order_id = order.id, user_id = owner.id, %total_amount, "Order created");
        Ok(order)
    }

    /// 조회 후 소유권 검사. 없으면 404, 권한이 없으면 403.
    pub async fn get_authorized(&self, actor: &User, id: i64) -> ApiResult<Order> {
        let order = self
            .store
            .find_order(id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Order not found".to_string()))?;

        policy::ensure_owner_or_admin(actor, &order)?;
        Ok(order)
    }

    /// 소유자 또는 관리자만 부분 업데이트.
    pub async fn update_order(
        &self,
        actor: &User,
        id: i64,
        changes: OrderChanges,
    ) -> ApiResult<Order> {
        let current = self.get_authorized(actor, id).await?;
        if changes.is_empty() {
            return Ok(current);
        }

        let order = self
            .store
            .update_order(id, changes)
            .await?
            .ok_or_else(|| ApiError::BadRequest("Could not update order".to_string()))?;

        info!(order_id = id, status = %order.status, "Order updated");
        Ok(order)
    }

    /// 소유자 또는 관리자만 삭제.
    pub async fn delete_order(&self, actor: &User, id: i64) -> ApiResult<()> {
        self.get_authorized(actor, id).await?;

        if !self.store.delete_order(id).await? {
            return Err(ApiError::BadRequest("Could not delete order".to_string()));
        }
        info!(order_id = id, "Order deleted");
        Ok(())
    }

    /// 전체 주문 목록.
    pub async fn list_orders(&self) -> ApiResult<Vec<Order>> {
        Ok(self.store.list_orders().await?)
    }

    /// 특정 사용자의 주문 목록.
    pub async fn list_orders_by_user(&self, user_id: i64) -> ApiResult<Vec<Order>> {
        Ok(self.store.list_orders_by_user(user_id).await?)
    }
}
