//! 저장소 추상화.
//!
//! HTTP 핸들러는 이 trait들만 알고 있으며, Postgres 구현과 메모리 구현을
//! 교체할 수 있습니다. 모든 메서드는 단일 요청 범위 안에서 호출됩니다.

use async_trait::async_trait;

use super::{NewOrder, NewUser, Order, OrderChanges, User, UserChanges};
use crate::error::StoreResult;

/// 사용자 저장소 trait.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// 새 사용자 저장. username/email 중복 시 `StoreError::Conflict`.
    async fn create_user(&self, user: NewUser) -> StoreResult<User>;

    /// ID로 사용자 조회.
    async fn find_user(&self, id: i64) -> StoreResult<Option<User>>;

    /// username으로 사용자 조회.
    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    /// `None`이 아닌 필드만 적용. 사용자가 없으면 `Ok(None)`.
    async fn update_user(&self, id: i64, changes: UserChanges) -> StoreResult<Option<User>>;

    /// 하드 삭제. 소유한 주문도 함께 삭제됩니다. 삭제 여부 반환.
    async fn delete_user(&self, id: i64) -> StoreResult<bool>;

    /// 전체 사용자 목록 (페이지네이션 없음).
    async fn list_users(&self) -> StoreResult<Vec<User>>;

    /// 저장소 연결 상태 확인.
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

/// 주문 저장소 trait.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// 새 주문 저장. 소유자가 없으면 `StoreError::InvalidReference`.
    async fn create_order(&self, order: NewOrder) -> StoreResult<Order>;

    /// ID로 주문 조회.
    async fn find_order(&self, id: i64) -> StoreResult<Option<Order>>;

    /// `None`이 아닌 필드만 적용. 주문이 없으면 `Ok(None)`.
    async fn update_order(&self, id: i64, changes: OrderChanges) -> StoreResult<Option<Order>>;

    /// 하드 삭제. 삭제 여부 반환.
    async fn delete_order(&self, id: i64) -> StoreResult<bool>;

    /// 전체 주문 목록.
    async fn list_orders(&self) -> StoreResult<Vec<Order>>;

    /// 특정 사용자의 주문 목록.
    async fn list_orders_by_user(&self, user_id: i64) -> StoreResult<Vec<Order>>;
}
