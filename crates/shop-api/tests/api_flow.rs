//! HTTP 흐름 통합 테스트.
//!
//! 메모리 저장소 위에서 가입, 로그인, 토큰 갱신, 주문 소유권 검사까지
//! 실제 라우터를 통해 검증합니다.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use secrecy::SecretString;
use serde_json::{json, Value};
use shop_api::{create_api_router, AppState, TokenService};
use shop_core::{Role, SeedConfig};
use tower::ServiceExt;

const ADMIN_PASSWORD: &str = "AdminPass123";
const CUSTOMER_PASSWORD: &str = "Password123";

fn test_app() -> (Arc<AppState>, Router) {
    let tokens = TokenService::new(
        "integration-access-secret-minimum-32-chars",
        "integration-refresh-secret-minimum-32-chars",
        jsonwebtoken::Algorithm::HS256,
        30,
        60,
    )
    .unwrap();
    let state = Arc::new(AppState::in_memory(tokens));
    let router = create_api_router().with_state(state.clone());
    (state, router)
}

async fn seed_admin(state: &AppState) {
    let seed = SeedConfig {
        enabled: true,
        admin_username: "admin".to_string(),
        admin_email: "admin@example.com".to_string(),
        admin_password: SecretString::from(ADMIN_PASSWORD.to_string()),
    };
    assert!(state.user_service().ensure_admin(&seed).await.unwrap());
    // 두 번째 호출은 아무것도 만들지 않음
    assert!(!state.user_service().ensure_admin(&seed).await.unwrap());
}

async fn call(
    router: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

/// 폼 로그인 후 (access, refresh) 토큰 반환.
async fn form_login(router: &Router, username: &str, password: &str) -> (String, String) {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/auth/token")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(format!("username={}&password={}", username, password)))
        .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["token_type"], "bearer");

    (
        body["access_token"].as_str().unwrap().to_string(),
        body["refresh_token"].as_str().unwrap().to_string(),
    )
}

async fn signup(router: &Router, username: &str) -> i64 {
    let (status, body) = call(
        router,
        Method::POST,
        "/auth/signup",
        None,
        Some(json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": CUSTOMER_PASSWORD,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_signup_login_and_profile() {
    let (state, router) = test_app();
    let id = signup(&router, "alice").await;

    let (access, _) = form_login(&router, "alice", CUSTOMER_PASSWORD).await;

    // 토큰 subject와 역할이 가입한 사용자와 일치
    let claims = state.tokens.verify_access(&access).unwrap();
    assert_eq!(claims.user_id().unwrap(), id);
    assert_eq!(claims.role, Role::Customer);

    let (status, me) = call(&router, Method::GET, "/users/me", Some(&access), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["username"], "alice");
    assert_eq!(me["role"], "customer");
    assert!(me.get("hashed_password").is_none());
}

#[tokio::test]
async fn test_wrong_password_is_unauthorized() {
    let (_, router) = test_app();
    signup(&router, "alice").await;

    let (status, body) = call(
        &router,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "username": "alice", "password": "nope-nope" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "INVALID_CREDENTIALS");

    let (status, _) = call(
        &router,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "username": "nobody", "password": CUSTOMER_PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_issues_usable_access_token() {
    let (_, router) = test_app();
    signup(&router, "alice").await;
    let (access, refresh) = form_login(&router, "alice", CUSTOMER_PASSWORD).await;

    let (status, pair) = call(
        &router,
        Method::POST,
        "/auth/refresh",
        None,
        Some(json!({ "refresh_token": refresh })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let new_access = pair["access_token"].as_str().unwrap();
    let (status, _) = call(&router, Method::GET, "/users/me", Some(new_access), None).await;
    assert_eq!(status, StatusCode::OK);

    // Access Token은 갱신에 쓸 수 없음
    let (status, _) = call(
        &router,
        Method::POST,
        "/auth/refresh",
        None,
        Some(json!({ "refresh_token": access })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_order_ownership_across_customers() {
    let (state, router) = test_app();
    seed_admin(&state).await;
    signup(&router, "alice").await;
    signup(&router, "bob").await;

    let (admin, _) = form_login(&router, "admin", ADMIN_PASSWORD).await;
    let (alice, _) = form_login(&router, "alice", CUSTOMER_PASSWORD).await;
    let (bob, _) = form_login(&router, "bob", CUSTOMER_PASSWORD).await;

    let (status, order) = call(
        &router,
        Method::POST,
        "/orders",
        Some(&alice),
        Some(json!({ "total_amount": "120.00" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(order["status"], "pending");
    let uri = format!("/orders/{}", order["id"]);

    // 다른 고객은 조회/수정/삭제 불가
    let (status, _) = call(&router, Method::GET, &uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = call(
        &router,
        Method::PUT,
        &uri,
        Some(&bob),
        Some(json!({ "status": "cancelled" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = call(&router, Method::DELETE, &uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // 고객은 전체 주문 목록 불가, 관리자는 가능
    let (status, _) = call(&router, Method::GET, "/orders", Some(&bob), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, all) = call(&router, Method::GET, "/orders", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 1);

    // 관리자는 모든 주문 변경 가능
    let (status, updated) = call(
        &router,
        Method::PUT,
        &uri,
        Some(&admin),
        Some(json!({ "status": "completed" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "completed");
    assert_eq!(updated["total_amount"], "120.00");

    let (status, _) = call(&router, Method::GET, &uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_missing_resources_are_not_found() {
    let (state, router) = test_app();
    seed_admin(&state).await;
    signup(&router, "alice").await;
    let (admin, _) = form_login(&router, "admin", ADMIN_PASSWORD).await;
    let (alice, _) = form_login(&router, "alice", CUSTOMER_PASSWORD).await;

    let (status, _) = call(&router, Method::DELETE, "/users/9999", Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&router, Method::DELETE, "/orders/9999", Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // 존재 여부가 소유권보다 먼저 검사됨
    let (status, _) = call(&router, Method::GET, "/orders/9999", Some(&alice), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deleted_user_loses_access_and_orders() {
    let (state, router) = test_app();
    seed_admin(&state).await;
    let alice_id = signup(&router, "alice").await;
    let (admin, _) = form_login(&router, "admin", ADMIN_PASSWORD).await;
    let (alice, refresh) = form_login(&router, "alice", CUSTOMER_PASSWORD).await;

    call(
        &router,
        Method::POST,
        "/orders",
        Some(&alice),
        Some(json!({ "total_amount": "9.99" })),
    )
    .await;

    let (status, _) = call(
        &router,
        Method::DELETE,
        &format!("/users/{}", alice_id),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // 서명은 유효하지만 사용자가 없으므로 401
    let (status, _) = call(&router, Method::GET, "/users/me", Some(&alice), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = call(
        &router,
        Method::POST,
        "/auth/refresh",
        None,
        Some(json!({ "refresh_token": refresh })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, orders) = call(&router, Method::GET, "/orders", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(orders.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_admin_manages_other_users() {
    let (state, router) = test_app();
    seed_admin(&state).await;
    let bob_id = signup(&router, "bob").await;
    let (admin, _) = form_login(&router, "admin", ADMIN_PASSWORD).await;
    let uri = format!("/users/{}", bob_id);

    let (status, bob) = call(&router, Method::GET, &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bob["username"], "bob");

    let (status, updated) = call(
        &router,
        Method::PUT,
        &uri,
        Some(&admin),
        Some(json!({ "username": "robert" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["username"], "robert");
    assert_eq!(updated["email"], "bob@example.com");

    // 변경된 username으로 로그인 가능
    let (access, _) = form_login(&router, "robert", CUSTOMER_PASSWORD).await;
    let (status, me) = call(&router, Method::GET, "/users/me", Some(&access), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["id"], bob_id);
}
