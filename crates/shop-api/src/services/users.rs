//! 사용자 계정 관리.

use secrecy::ExposeSecret;
use shop_core::{NewUser, Role, SeedConfig, User, UserChanges, UserStore};
use tracing::info;

use super::run_blocking;
use crate::auth::hash_password;
use crate::error::{ApiError, ApiResult};
use crate::metrics;

/// 계정 생성 입력 (평문 비밀번호).
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// 사용자 서비스.
pub struct UserService<'a> {
    store: &'a dyn UserStore,
}

fn user_not_found() -> ApiError {
    ApiError::NotFound("User not found".to_string())
}

impl<'a> UserService<'a> {
    pub fn new(store: &'a dyn UserStore) -> Self {
        Self { store }
    }

    /// 비밀번호를 해싱하여 사용자 생성.
    pub async fn create_user(&self, account: NewAccount) -> ApiResult<User> {
        let password = account.password;
        let hashed_password = run_blocking(move || hash_password(&password)).await??;

        let user = self
            .store
            .create_user(NewUser {
                username: account.username,
                email: account.email,
                hashed_password,
                role: account.role,
            })
            .await?;

        metrics::record_user_created(&user.role);
        info!(user_id = user.id, username = %user.username, role = %user.role, "User created");
        Ok(user)
    }

    /// ID로 조회. 없으면 404.
    pub async fn get_user(&self, id: i64) -> ApiResult<User> {
        self.store.find_user(id).await?.ok_or_else(user_not_found)
    }

    /// 부분 업데이트. 없으면 404. 변경할 필드가 없으면 현재 값을 그대로 반환합니다.
    pub async fn update_user(&self, id: i64, changes: UserChanges) -> ApiResult<User> {
        if changes.is_empty() {
            return self.get_user(id).await;
        }

        let user = self
            .store
            .update_user(id, changes)
            .await?
            .ok_or_else(user_not_found)?;

        info!(user_id = id, "User updated");
        Ok(user)
    }

    /// 삭제 (소유 주문 포함). 없으면 404.
    pub async fn delete_user(&self, id: i64) -> ApiResult<()> {
        if !self.store.delete_user(id).await? {
            return Err(user_not_found());
        }
        info!(user_id = id, "User deleted");
        Ok(())
    }

    /// 전체 사용자 목록.
    pub async fn list_users(&self) -> ApiResult<Vec<User>> {
        Ok(self.store.list_users().await?)
    }

    /// 관리자 계정이 없으면 생성합니다. 생성했으면 `true`.
    pub async fn ensure_admin(&self, seed: &SeedConfig) -> ApiResult<bool> {
        if self
            .store
            .find_user_by_username(&seed.admin_username)
            .await?
            .is_some()
        {
            return Ok(false);
        }

        self.create_user(NewAccount {
            username: seed.admin_username.clone(),
            email: seed.admin_email.clone(),
            password: seed.admin_password.expose_secret().to_string(),
            role: Role::Admin,
        })
        .await?;
        Ok(true)
    }
}
