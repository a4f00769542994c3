//! 인증 endpoint.
//!
//! - `POST /auth`, `POST /auth/token`: OAuth2 password 형식 폼 로그인
//! - `POST /auth/login`: JSON 로그인
//! - `POST /auth/refresh`: Refresh Token으로 토큰 재발급
//! - `POST /auth/signup`: 공개 가입 (항상 customer)

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Form, Json, Router};
use serde::Deserialize;
use shop_core::Role;
use utoipa::ToSchema;
use validator::Validate;

use super::users::{validate_password, UserResponse};
use crate::auth::TokenPair;
use crate::error::{ApiErrorResponse, ApiResult};
use crate::services::NewAccount;
use crate::state::AppState;

/// 로그인 요청 (폼 또는 JSON).
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// 토큰 갱신 요청.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// 공개 가입 요청. 역할은 지정할 수 없습니다.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignupRequest {
    #[validate(length(min = 1, max = 255, message = "Username must be 1-255 characters"))]
    pub username: String,
    #[validate(
        email(message = "Invalid email address"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    pub email: String,
    #[validate(custom(function = "validate_password"))]
    pub password: String,
}

/// 폼 로그인 (`application/x-www-form-urlencoded`).
#[utoipa::path(
    post,
    path = "/auth",
    request_body(content = LoginRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "로그인 성공", body = TokenPair),
        (status = 401, description = "잘못된 자격증명", body = ApiErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login_form(
    State(state): State<Arc<AppState>>,
    Form(request): Form<LoginRequest>,
) -> ApiResult<Json<TokenPair>> {
    let pair = state
        .auth_service()
        .login(&request.username, &request.password)
        .await?;
    Ok(Json(pair))
}

/// JSON 로그인.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "로그인 성공", body = TokenPair),
        (status = 401, description = "잘못된 자격증명", body = ApiErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login_json(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<TokenPair>> {
    let pair = state
        .auth_service()
        .login(&request.username, &request.password)
        .await?;
    Ok(Json(pair))
}

/// Refresh Token으로 새 토큰 쌍 발급.
#[utoipa::path(
    post,
    path = "/auth/refresh",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "재발급 성공", body = TokenPair),
        (status = 401, description = "유효하지 않은 Refresh Token", body = ApiErrorResponse)
    ),
    tag = "auth"
)]
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RefreshRequest>,
) -> ApiResult<Json<TokenPair>> {
    let pair = state.auth_service().refresh(&request.refresh_token).await?;
    Ok(Json(pair))
}

/// 공개 가입.
#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "가입 완료", body = UserResponse),
        (status = 400, description = "검증 실패 또는 중복", body = ApiErrorResponse)
    ),
    tag = "auth"
)]
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SignupRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    request.validate()?;

    let user = state
        .user_service()
        .create_user(NewAccount {
            username: request.username,
            email: request.email,
            password: request.password,
            role: Role::Customer,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// 인증 라우터 생성.
pub fn auth_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(login_form))
        .route("/token", post(login_form))
        .route("/login", post(login_json))
        .route("/refresh", post(refresh))
        .route("/signup", post(signup))
}
