//! 애플리케이션 서비스.
//!
//! 핸들러와 저장소 사이에서 비밀번호 해싱, 토큰 발급, 조회 실패 시
//! 404 변환 같은 공통 흐름을 담당합니다. 권한 검사는 핸들러가
//! [`crate::auth::policy`]로 직접 수행합니다.

pub mod auth;
pub mod orders;
pub mod users;

pub use auth::AuthService;
pub use orders::OrderService;
pub use users::{NewAccount, UserService};

use crate::error::ApiError;

/// CPU 집약적인 작업(비밀번호 해싱)을 blocking thread pool에서 실행합니다.
pub(crate) async fn run_blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Internal(format!("blocking task failed: {}", e)))
}
