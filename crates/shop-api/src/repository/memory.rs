//! 메모리 저장소.
//!
//! 데이터베이스 URL이 설정되지 않았을 때와 테스트에서 사용합니다.
//! Postgres 스키마와 같은 제약(고유 username/email, 주문 소유자 FK,
//! 사용자 삭제 시 주문 CASCADE)을 지킵니다. 재시작하면 데이터가 사라집니다.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use shop_core::{
    NewOrder, NewUser, Order, OrderChanges, OrderStore, StoreError, StoreResult, User,
    UserChanges, UserStore,
};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    orders: BTreeMap<i64, Order>,
    next_user_id: i64,
    next_order_id: i64,
}

impl Tables {
    /// username/email 고유성 검사. `except`는 업데이트 대상 자신.
    fn check_unique(
        &self,
        username: Option<&str>,
        email: Option<&str>,
        except: Option<i64>,
    ) -> StoreResult<()> {
        for user in self.users.values().filter(|u| Some(u.id) != except) {
            if username == Some(user.username.as_str()) {
                return Err(StoreError::Conflict("users_username_key".to_string()));
            }
            if email == Some(user.email.as_str()) {
                return Err(StoreError::Conflict("users_email_key".to_string()));
            }
        }
        Ok(())
    }
}

/// 사용자/주문 메모리 저장소.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let mut tables = self.tables.write().await;
        tables.check_unique(Some(&user.username), Some(&user.email), None)?;

        tables.next_user_id += 1;
        let now = Utc::now();
        let record = User {
            id: tables.next_user_id,
            username: user.username,
            email: user.email,
            hashed_password: user.hashed_password,
            role: user.role,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_user(&self, id: i64) -> StoreResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.username == username).cloned())
    }

    async fn update_user(&self, id: i64, changes: UserChanges) -> StoreResult<Option<User>> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&id) {
            return Ok(None);
        }
        tables.check_unique(changes.username.as_deref(), changes.email.as_deref(), Some(id))?;

        let Some(user) = tables.users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(username) = changes.username {
            user.username = username;
        }
        if let Some(email) = changes.email {
            user.email = email;
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn delete_user(&self, id: i64) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Ok(false);
        }
        tables.orders.retain(|_, order| order.user_id != id);
        Ok(true)
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        Ok(self.tables.read().await.users.values().cloned().collect())
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn create_order(&self, order: NewOrder) -> StoreResult<Order> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&order.user_id) {
            return Err(StoreError::InvalidReference(
                "orders_user_id_fkey".to_string(),
            ));
        }

        tables.next_order_id += 1;
        let now = Utc::now();
        let record = Order {
            id: tables.next_order_id,
            user_id: order.user_id,
            order_date: now,
            total_amount: order.total_amount,
            status: order.status,
            created_at: now,
            updated_at: now,
        };
        tables.orders.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_order(&self, id: i64) -> StoreResult<Option<Order>> {
        Ok(self.tables.read().await.orders.get(&id).cloned())
    }

    async fn update_order(&self, id: i64, changes: OrderChanges) -> StoreResult<Option<Order>> {
        let mut tables = self.tables.write().await;
        let Some(order) = tables.orders.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(status) = changes.status {
            order.status = status;
        }
        order.updated_at = Utc::now();
        Ok(Some(order.clone()))
    }

    async fn delete_order(&self, id: i64) -> StoreResult<bool> {
        Ok(self.tables.write().await.orders.remove(&id).is_some())
    }

    async fn list_orders(&self) -> StoreResult<Vec<Order>> {
        Ok(self.tables.read().await.orders.values().cloned().collect())
    }

    async fn list_orders_by_user(&self, user_id: i64) -> StoreResult<Vec<Order>> {
        let tables = self.tables.read().await;
        Ok(tables
            .orders
            .values()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use shop_core::{OrderStatus, Role};

    fn new_user(name: &str) -> NewUser {
        NewUser {
            username: name.to_string(),
            email: format!("{}@example.com", name),
            hashed_password: "hash".to_string(),
            role: Role::Customer,
        }
    }

    fn new_order(user_id: i64) -> NewOrder {
        NewOrder {
            user_id,
            total_amount: dec!(42.50),
            status: OrderStatus::Pending,
        }
    }

    #[tokio::test]
    async fn test_user_ids_are_sequential() {
        let store = MemoryStore::new();
        let alice = store.create_user(new_user("alice")).await.unwrap();
        let bob = store.create_user(new_user("bob")).await.unwrap();

        assert_eq!(alice.id, 1);
        assert_eq!(bob.id, 2);
        assert_eq!(store.list_users().await.unwrap().len(), 2);
        assert_eq!(
            store.find_user_by_username("bob").await.unwrap().unwrap().id,
            2
        );
    }

    #[tokio::test]
    async fn test_duplicate_username_and_email() {
        let store = MemoryStore::new();
        store.create_user(new_user("alice")).await.unwrap();

        let err = store.create_user(new_user("alice")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(ref c) if c == "users_username_key"));

        let mut other = new_user("alice2");
        other.email = "alice@example.com".to_string();
        let err = store.create_user(other).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(ref c) if c == "users_email_key"));
    }

    #[tokio::test]
    async fn test_update_user_partial() {
        let store = MemoryStore::new();
        let alice = store.create_user(new_user("alice")).await.unwrap();
        store.create_user(new_user("bob")).await.unwrap();

        let updated = store
            .update_user(
                alice.id,
                UserChanges {
                    email: Some("new@example.com".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.username, "alice");
        assert_eq!(updated.email, "new@example.com");

        // 자기 자신의 현재 값으로 업데이트는 허용
        assert!(store
            .update_user(
                alice.id,
                UserChanges {
                    username: Some("alice".to_string()),
                    ..Default::default()
                },
            )
            .await
            .is_ok());

        // 다른 사용자 username으로 변경 불가
        let err = store
            .update_user(
                alice.id,
                UserChanges {
                    username: Some("bob".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        assert!(store
            .update_user(99, UserChanges::default())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_order_requires_existing_user() {
        let store = MemoryStore::new();
        let err = store.create_order(new_order(1)).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidReference(_)));
    }

    #[tokio::test]
    async fn test_delete_user_cascades_orders() {
        let store = MemoryStore::new();
        let alice = store.create_user(new_user("alice")).await.unwrap();
        let bob = store.create_user(new_user("bob")).await.unwrap();
        store.create_order(new_order(alice.id)).await.unwrap();
        store.create_order(new_order(alice.id)).await.unwrap();
        let bobs = store.create_order(new_order(bob.id)).await.unwrap();

        assert!(store.delete_user(alice.id).await.unwrap());
        assert!(!store.delete_user(alice.id).await.unwrap());

        let remaining = store.list_orders().await.unwrap();
        assert_eq!(remaining, vec![bobs]);
        assert!(store
            .list_orders_by_user(alice.id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_order_update_and_delete() {
        let store = MemoryStore::new();
        let alice = store.create_user(new_user("alice")).await.unwrap();
        let order = store.create_order(new_order(alice.id)).await.unwrap();

        let updated = store
            .update_order(
                order.id,
                OrderChanges {
                    status: Some(OrderStatus::Completed),
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, OrderStatus::Completed);
        assert_eq!(updated.total_amount, dec!(42.50));

        assert!(store.delete_order(order.id).await.unwrap());
        assert!(store.find_order(order.id).await.unwrap().is_none());
        assert!(!store.delete_order(order.id).await.unwrap());
    }
}
