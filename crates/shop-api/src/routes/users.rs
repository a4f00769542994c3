//! 사용자 관리 endpoint.
//!
//! - `POST /users`, `GET /users`, `DELETE /users/{id}`: Admin 전용
//! - `GET/PUT /users/me`: 로그인한 사용자 본인
//! - `GET/PUT /users/{id}`: 본인 또는 Admin

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shop_core::{Role, User, UserChanges};
use tracing::info;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::auth::{policy, AdminUser, CurrentUser};
use crate::error::{ApiErrorResponse, ApiResult};
use crate::services::NewAccount;
use crate::state::AppState;

/// 비밀번호 최소 길이.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// 비밀번호 검증 (최소 길이, 공백만으로 구성 불가).
pub(crate) fn validate_password(value: &str) -> Result<(), ValidationError> {
    if value.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::new("password_too_short")
            .with_message("Password must be at least 8 characters".into()));
    }
    if value.trim().is_empty() {
        return Err(ValidationError::new("password_blank")
            .with_message("Password must not be blank".into()));
    }
    Ok(())
}

// ==================== 요청/응답 타입 ====================

/// 사용자 생성 요청 (Admin).
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UserCreate {
    #[validate(length(min = 1, max = 255, message = "Username must be 1-255 characters"))]
    pub username: String,
    #[validate(
        email(message = "Invalid email address"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    pub email: String,
    #[validate(custom(function = "validate_password"))]
    pub password: String,
    /// 역할 (기본값 "customer")
    #[serde(default)]
    #[validate(length(min = 1, max = 50, message = "Role must be 1-50 characters"))]
    #[schema(example = "customer")]
    pub role: Option<String>,
}

/// 사용자 부분 업데이트 요청. 있는 필드만 적용됩니다.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UserUpdate {
    #[validate(length(min = 1, max = 255, message = "Username must be 1-255 characters"))]
    pub username: Option<String>,
    #[validate(
        email(message = "Invalid email address"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    pub email: Option<String>,
}

impl From<UserUpdate> for UserChanges {
    fn from(update: UserUpdate) -> Self {
        UserChanges {
            username: update.username,
            email: update.email,
        }
    }
}

/// 사용자 응답. 비밀번호 해시는 포함하지 않습니다.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[schema(example = "customer")]
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role.to_string(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

// ==================== 핸들러 ====================

/// 사용자 생성 (Admin 전용).
#[utoipa::path(
    post,
    path = "/users",
    request_body = UserCreate,
    responses(
        (status = 201, description = "생성됨", body = UserResponse),
        (status = 400, description = "검증 실패 또는 중복", body = ApiErrorResponse),
        (status = 401, description = "인증 필요", body = ApiErrorResponse),
        (status = 403, description = "Admin 아님", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn create_user(
    AdminUser(admin): AdminUser,
    State(state): State<Arc<AppState>>,
    Json(request): Json<UserCreate>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    request.validate()?;

    let role = request
        .role
        .as_deref()
        .map(Role::parse)
        .unwrap_or_default();

    let user = state
        .user_service()
        .create_user(NewAccount {
            username: request.username,
            email: request.email,
            password: request.password,
            role,
        })
        .await?;

    info!(actor_id = admin.id, user_id = user.id, "Admin created user");
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// 전체 사용자 목록 (Admin 전용).
#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "사용자 목록", body = Vec<UserResponse>),
        (status = 403, description = "Admin 아님", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn list_users(
    AdminUser(_admin): AdminUser,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<UserResponse>>> {
    let users = state.user_service().list_users().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// 내 프로필 조회.
#[utoipa::path(
    get,
    path = "/users/me",
    responses(
        (status = 200, description = "내 프로필", body = UserResponse),
        (status = 401, description = "인증 필요", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn get_me(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(user.into())
}

/// 내 프로필 수정.
#[utoipa::path(
    put,
    path = "/users/me",
    request_body = UserUpdate,
    responses(
        (status = 200, description = "수정됨", body = UserResponse),
        (status = 400, description = "검증 실패 또는 중복", body = ApiErrorResponse),
        (status = 404, description = "사용자 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn update_me(
    CurrentUser(user): CurrentUser,
    State(state): State<Arc<AppState>>,
    Json(request): Json<UserUpdate>,
) -> ApiResult<Json<UserResponse>> {
    request.validate()?;

    let updated = state
        .user_service()
        .update_user(user.id, request.into())
        .await?;
    Ok(Json(updated.into()))
}

/// 사용자 조회 (본인 또는 Admin).
#[utoipa::path(
    get,
    path = "/users/{user_id}",
    params(("user_id" = i64, Path, description = "사용자 ID")),
    responses(
        (status = 200, description = "사용자", body = UserResponse),
        (status = 403, description = "권한 없음", body = ApiErrorResponse),
        (status = 404, description = "사용자 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn get_user(
    CurrentUser(actor): CurrentUser,
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<UserResponse>> {
    let user = state.user_service().get_user(user_id).await?;
    policy::ensure_self_or_admin(&actor, user.id)?;
    Ok(Json(user.into()))
}

/// 사용자 수정 (본인 또는 Admin).
#[utoipa::path(
    put,
    path = "/users/{user_id}",
    params(("user_id" = i64, Path, description = "사용자 ID")),
    request_body = UserUpdate,
    responses(
        (status = 200, description = "수정됨", body = UserResponse),
        (status = 400, description = "검증 실패 또는 중복", body = ApiErrorResponse),
        (status = 403, description = "권한 없음", body = ApiErrorResponse),
        (status = 404, description = "사용자 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn update_user(
    CurrentUser(actor): CurrentUser,
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    Json(request): Json<UserUpdate>,
) -> ApiResult<Json<UserResponse>> {
    let service = state.user_service();
    let user = service.get_user(user_id).await?;
    policy::ensure_self_or_admin(&actor, user.id)?;
    request.validate()?;

    let updated = service.update_user(user_id, request.into()).await?;
    Ok(Json(updated.into()))
}

/// 사용자 삭제 (Admin 전용). 소유한 주문도 함께 삭제됩니다.
#[utoipa::path(
    delete,
    path = "/users/{user_id}",
    params(("user_id" = i64, Path, description = "사용자 ID")),
    responses(
        (status = 204, description = "삭제됨"),
        (status = 403, description = "Admin 아님", body = ApiErrorResponse),
        (status = 404, description = "사용자 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn delete_user(
    AdminUser(admin): AdminUser,
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.user_service().delete_user(user_id).await?;
    info!(actor_id = admin.id, user_id, "Admin deleted user");
    Ok(StatusCode::NO_CONTENT)
}

/// 사용자 라우터 생성.
pub fn users_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_user).get(list_users))
        .route("/me", get(get_me).put(update_me))
        .route(
            "/{user_id}",
            get(get_user).put(update_user).delete(delete_user),
        )
}
