//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! `Arc<AppState>`로 래핑되어 Axum의 State extractor를 통해 주입됩니다.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use shop_core::{OrderStore, UserStore};
use sqlx::PgPool;

use crate::auth::TokenService;
use crate::repository::{MemoryStore, PgOrderRepository, PgUserRepository};
use crate::services::{AuthService, OrderService, UserService};

/// 애플리케이션 공유 상태.
#[derive(Clone)]
pub struct AppState {
    /// 사용자 저장소
    pub users: Arc<dyn UserStore>,

    /// 주문 저장소
    pub orders: Arc<dyn OrderStore>,

    /// 토큰 발급/검증
    pub tokens: TokenService,

    /// 데이터베이스 연결 풀 (메모리 저장소 사용 시 None)
    pub db_pool: Option<PgPool>,

    /// 서버 시작 시간
    pub started_at: DateTime<Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    /// 저장소 구현을 직접 지정하여 생성.
    pub fn new(
        users: Arc<dyn UserStore>,
        orders: Arc<dyn OrderStore>,
        tokens: TokenService,
    ) -> Self {
        Self {
            users,
            orders,
            tokens,
            db_pool: None,
            started_at: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Postgres 저장소로 생성.
    pub fn with_postgres(pool: PgPool, tokens: TokenService) -> Self {
        let mut state = Self::new(
            Arc::new(PgUserRepository::new(pool.clone())),
            Arc::new(PgOrderRepository::new(pool.clone())),
            tokens,
        );
        state.db_pool = Some(pool);
        state
    }

    /// 메모리 저장소로 생성. 사용자/주문이 같은 저장소를 공유합니다.
    pub fn in_memory(tokens: TokenService) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::new(store.clone(), store, tokens)
    }

    /// 저장소 종류 ("postgres" | "memory").
    pub fn store_backend(&self) -> &'static str {
        if self.db_pool.is_some() {
            "postgres"
        } else {
            "memory"
        }
    }

    /// 서버 업타임(초) 반환.
    pub fn uptime_secs(&self) -> i64 {
        Utc::now().signed_duration_since(self.started_at).num_seconds()
    }

    /// 저장소 연결 상태 확인.
    pub async fn is_store_healthy(&self) -> bool {
        self.users.ping().await.is_ok()
    }

    pub fn auth_service(&self) -> AuthService<'_> {
        AuthService::new(self.users.as_ref(), &self.tokens)
    }

    pub fn user_service(&self) -> UserService<'_> {
        UserService::new(self.users.as_ref())
    }

    pub fn order_service(&self) -> OrderService<'_> {
        OrderService::new(self.orders.as_ref())
    }
}

/// 테스트용 AppState 생성 (메모리 저장소, 고정 서명 키).
#[cfg(any(test, feature = "test-utils"))]
pub fn create_test_state() -> AppState {
    let tokens = TokenService::new(
        "test-access-secret-key-minimum-32-characters",
        "test-refresh-secret-key-minimum-32-characters",
        jsonwebtoken::Algorithm::HS256,
        30,
        60 * 24,
    )
    .expect("HS256 is supported");

    AppState::in_memory(tokens)
}
