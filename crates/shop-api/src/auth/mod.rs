//! 인증 및 권한 부여.
//!
//! # 구성 요소
//!
//! - [`TokenService`]: Access/Refresh Token 발급 및 검증
//! - [`CurrentUser`], [`AdminUser`]: 인증된 사용자를 꺼내는 Axum 추출기
//! - [`policy`]: 역할/소유권 기반 접근 검사
//! - 비밀번호 해싱 함수
//!
//! ```rust,ignore
//! async fn me(CurrentUser(user): CurrentUser) -> impl IntoResponse {
//!     format!("Hello, {}!", user.username)
//! }
//! ```

mod jwt;
mod middleware;
mod password;
pub mod policy;

pub use jwt::{Claims, TokenError, TokenKind, TokenPair, TokenService};
pub use middleware::{AdminUser, AuthError, CurrentUser, JwtAuth};
pub use password::{hash_password, verify_password, PasswordError};
