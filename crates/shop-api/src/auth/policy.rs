//! 역할 기반 접근 제어 (RBAC).
//!
//! Admin은 모든 리소스에 접근할 수 있고, Customer는 자신의 계정과
//! 자신이 소유한 주문에만 접근할 수 있습니다. 알 수 없는 역할은
//! Customer와 같은 권한으로 취급됩니다.

use shop_core::{Order, User};

use crate::error::ApiError;

/// Admin 역할을 요구합니다.
pub fn require_admin(actor: &User) -> Result<(), ApiError> {
    if actor.role.is_admin() {
        Ok(())
    } else {
        Err(ApiError::not_authorized())
    }
}

/// 주문 소유자이거나 Admin이어야 합니다.
pub fn ensure_owner_or_admin(actor: &User, order: &Order) -> Result<(), ApiError> {
    if actor.role.is_admin() || order.is_owned_by(actor.id) {
        Ok(())
    } else {
        Err(ApiError::not_authorized())
    }
}

/// 대상 계정 본인이거나 Admin이어야 합니다.
pub fn ensure_self_or_admin(actor: &User, target_user_id: i64) -> Result<(), ApiError> {
    if actor.role.is_admin() || actor.id == target_user_id {
        Ok(())
    } else {
        Err(ApiError::not_authorized())
    }
}
