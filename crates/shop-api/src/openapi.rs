//! OpenAPI 문서화 설정.
//!
//! utoipa로 REST API의 OpenAPI 3.0 스펙을 생성합니다.
//! Swagger UI는 `/swagger-ui` 경로에서 사용 가능합니다.
//!
//! 새로운 엔드포인트를 추가할 때:
//!
//! 1. 응답/요청 타입에 `#[derive(ToSchema)]` 추가
//! 2. 핸들러에 `#[utoipa::path(...)]` 어노테이션 추가
//! 3. 이 파일의 `components(schemas(...))` 및 `paths(...)` 섹션에 추가

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::TokenPair;
use crate::error::ApiErrorResponse;
use crate::routes::{
    ComponentStatus, HealthResponse, LoginRequest, OrderCreate, OrderResponse, OrderUpdate,
    RefreshRequest, SignupRequest, UserCreate, UserResponse, UserUpdate, WelcomeResponse,
};
use shop_core::OrderStatus;

/// `bearer_auth` 보안 스키마 등록.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// Shop API 문서.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Shop API",
        description = r#"
# 사용자/주문 관리 REST API

## 인증

`POST /auth` (폼) 또는 `POST /auth/login` (JSON)으로 토큰을 발급받은 뒤
`Authorization: Bearer <access_token>` 헤더를 포함하세요.
Access Token이 만료되면 `POST /auth/refresh`로 재발급합니다.

## 권한

- **admin**: 모든 사용자/주문 접근
- **customer**: 자신의 계정과 주문만 접근
"#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:8000", description = "로컬 개발 서버"),
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "root", description = "루트"),
        (name = "health", description = "헬스 체크 - 서버 상태 확인"),
        (name = "auth", description = "인증 - 로그인, 토큰 갱신, 가입"),
        (name = "users", description = "사용자 관리"),
        (name = "orders", description = "주문 관리")
    ),
    // ==================== 스키마 등록 ====================
    components(
        schemas(
            // ===== Common =====
            ApiErrorResponse,
            WelcomeResponse,

            // ===== Health =====
            HealthResponse,
            ComponentStatus,

            // ===== Auth =====
            LoginRequest,
            RefreshRequest,
            SignupRequest,
            TokenPair,

            // ===== Users =====
            UserCreate,
            UserUpdate,
            UserResponse,

            // ===== Orders =====
            OrderCreate,
            OrderUpdate,
            OrderResponse,
            OrderStatus,
        )
    ),
    // ==================== 경로 등록 ====================
    paths(
        crate::routes::root,

        // ===== Health =====
        crate::routes::health::health_check,
        crate::routes::health::health_ready,

        // ===== Auth =====
        crate::routes::auth::login_form,
        crate::routes::auth::login_json,
        crate::routes::auth::refresh,
        crate::routes::auth::signup,

        // ===== Users =====
        crate::routes::users::create_user,
        crate::routes::users::list_users,
        crate::routes::users::get_me,
        crate::routes::users::update_me,
        crate::routes::users::get_user,
        crate::routes::users::update_user,
        crate::routes::users::delete_user,

        // ===== Orders =====
        crate::routes::orders::create_order,
        crate::routes::orders::list_orders,
        crate::routes::orders::list_my_orders,
        crate::routes::orders::list_orders_by_user,
        crate::routes::orders::get_order,
        crate::routes::orders::update_order,
        crate::routes::orders::delete_order,
    )
)]
pub struct ApiDoc;

/// Swagger UI 라우터 생성.
///
/// - `/swagger-ui` - Swagger UI 대화형 문서
/// - `/api-docs/openapi.json` - OpenAPI JSON 스펙
pub fn swagger_ui_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_spec_valid() {
        let spec = ApiDoc::openapi();
        let json = serde_json::to_string_pretty(&spec).unwrap();

        assert!(json.contains("Shop API"));
        assert!(json.contains("bearer_auth"));

        assert!(json.contains("/auth/login"));
        assert!(json.contains("/users/{user_id}"));
        assert!(json.contains("/orders/users/{user_id}"));
        assert!(json.contains("/health/ready"));
    }

    #[test]
    fn test_openapi_contains_schemas() {
        let json = serde_json::to_string(&ApiDoc::openapi()).unwrap();

        assert!(json.contains("TokenPair"));
        assert!(json.contains("UserResponse"));
        assert!(json.contains("OrderStatus"));
        assert!(json.contains("ApiErrorResponse"));
    }

    #[test]
    fn test_swagger_ui_router_creates() {
        let _router: Router<()> = swagger_ui_router();
    }
}
