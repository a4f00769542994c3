//! API 라우트.
//!
//! # 라우트 구조
//!
//! - `/` - 환영 메시지
//! - `/health` - 헬스 체크 (liveness)
//! - `/health/ready` - 상세 헬스 체크 (readiness)
//! - `/auth` - 로그인, 토큰 갱신, 가입
//! - `/users` - 사용자 관리
//! - `/orders` - 주문 관리

pub mod auth;
pub mod health;
pub mod orders;
pub mod users;

pub use auth::{auth_router, LoginRequest, RefreshRequest, SignupRequest};
pub use health::{health_router, ComponentStatus, HealthResponse};
pub use orders::{orders_router, OrderCreate, OrderResponse, OrderUpdate};
pub use users::{users_router, UserCreate, UserResponse, UserUpdate};

use axum::{routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::state::AppState;

/// 루트 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WelcomeResponse {
    pub message: String,
}

/// 루트 endpoint.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "환영 메시지", body = WelcomeResponse)),
    tag = "root"
)]
pub async fn root() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: "Welcome to the API".to_string(),
    })
}

/// 전체 API 라우터 생성.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(root))
        .nest("/health", health_router())
        .nest("/auth", auth_router())
        .nest("/users", users_router())
        .nest("/orders", orders_router())
}


#[cfg(test)]
mod tests {
    use super::test_support::{send, TestApp};
    use axum::http::{header, Method, Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_root_welcome() {
        let app = TestApp::new();
        let (status, body) = send(&app, Method::GET, "/", None, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Welcome to the API");
    }

    #[tokio::test]
    async fn test_protected_route_challenges_bearer() {
        let app = TestApp::new();
        let response = app
            .router()
            .oneshot(
                Request::builder()
                    .uri("/users/me")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }

    #[tokio::test]
    async fn test_expired_token_unauthorized() {
        use super::test_support::seed_user;
        use crate::auth::{Claims, TokenKind};

        let app = TestApp::new();
        let (alice, _) = seed_user(&app.state, "alice", shop_core::Role::Customer).await;

        let mut claims = Claims::new(alice.id, alice.role.clone(), 30);
        claims.exp = chrono::Utc::now().timestamp() - 1;
        let expired = app.state.tokens.encode(TokenKind::Access, &claims).unwrap();

        let (status, body) = send(&app, Method::GET, "/users/me", Some(&expired), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "TOKEN_EXPIRED");
    }

    #[tokio::test]
    async fn test_garbage_token_unauthorized() {
        let app = TestApp::new();
        let (status, _) = send(&app, Method::GET, "/orders/me", Some("garbage"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
