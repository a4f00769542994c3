//! 주문 관리 endpoint.
//!
//! 주문은 항상 생성한 사용자가 소유합니다. Customer는 자신의 주문만
//! 조회/수정/삭제할 수 있고, Admin은 모든 주문에 접근할 수 있습니다.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shop_core::{Order, OrderChanges, OrderStatus};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::auth::{AdminUser, CurrentUser};
use crate::error::{ApiErrorResponse, ApiResult};
use crate::state::AppState;

/// 주문 금액 검증 (0 이상).
fn validate_total_amount(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        return Err(ValidationError::new("negative_amount")
            .with_message("Total amount must not be negative".into()));
    }
    Ok(())
}

// ==================== 요청/응답 타입 ====================

/// 주문 생성 요청.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct OrderCreate {
    #[validate(custom(function = "validate_total_amount"))]
    #[schema(value_type = String, example = "19.99")]
    pub total_amount: Decimal,
    /// 주문 상태 (기본값 pending)
    #[serde(default)]
    pub status: OrderStatus,
}

/// 주문 부분 업데이트 요청.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct OrderUpdate {
    pub status: Option<OrderStatus>,
}

impl From<OrderUpdate> for OrderChanges {
    fn from(update: OrderUpdate) -> Self {
        OrderChanges {
            status: update.status,
        }
    }
}

/// 주문 응답.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderResponse {
    pub id: i64,
    pub user_id: i64,
    pub order_date: DateTime<Utc>,
    #[schema(value_type = String, example = "19.99")]
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            user_id: order.user_id,
            order_date: order.order_date,
            total_amount: order.total_amount,
            status: order.status,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

fn to_responses(orders: Vec<Order>) -> Json<Vec<OrderResponse>> {
    Json(orders.into_iter().map(OrderResponse::from).collect())
}

// ==================== 핸들러 ====================

/// 주문 생성. 요청자가 소유자가 됩니다.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = OrderCreate,
    responses(
        (status = 201, description = "생성됨", body = OrderResponse),
        (status = 400, description = "검증 실패", body = ApiErrorResponse),
        (status = 401, description = "인증 필요", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "orders"
)]
pub async fn create_order(
    CurrentUser(user): CurrentUser,
    State(state): State<Arc<AppState>>,
    Json(request): Json<OrderCreate>,
) -> ApiResult<(StatusCode, Json<OrderResponse>)> {
    request.validate()?;

    let order = state
        .order_service()
        .place_order(&user, request.total_amount, request.status)
        .await?;
    Ok((StatusCode::CREATED, Json(order.into())))
}

/// 전체 주문 목록 (Admin 전용).
#[utoipa::path(
    get,
    path = "/orders",
    responses(
        (status = 200, description = "주문 목록", body = Vec<OrderResponse>),
        (status = 403, description = "Admin 아님", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "orders"
)]
pub async fn list_orders(
    AdminUser(_admin): AdminUser,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<OrderResponse>>> {
    Ok(to_responses(state.order_service().list_orders().await?))
}

/// 내 주문 목록.
#[utoipa::path(
    get,
    path = "/orders/me",
    responses(
        (status = 200, description = "내 주문 목록", body = Vec<OrderResponse>),
        (status = 401, description = "인증 필요", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "orders"
)]
pub async fn list_my_orders(
    CurrentUser(user): CurrentUser,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<OrderResponse>>> {
    Ok(to_responses(
        state.order_service().list_orders_by_user(user.id).await?,
    ))
}

/// 특정 사용자의 주문 목록 (Admin 전용).
#[utoipa::path(
    get,
    path = "/orders/users/{user_id}",
    params(("user_id" = i64, Path, description = "사용자 ID")),
    responses(
        (status = 200, description = "주문 목록", body = Vec<OrderResponse>),
        (status = 403, description = "Admin 아님", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "orders"
)]
pub async fn list_orders_by_user(
    AdminUser(_admin): AdminUser,
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<Vec<OrderResponse>>> {
    Ok(to_responses(
        state.order_service().list_orders_by_user(user_id).await?,
    ))
}

/// 주문 조회 (소유자 또는 Admin).
#[utoipa::path(
    get,
    path = "/orders/{order_id}",
    params(("order_id" = i64, Path, description = "주문 ID")),
    responses(
        (status = 200, description = "주문", body = OrderResponse),
        (status = 403, description = "권한 없음", body = ApiErrorResponse),
        (status = 404, description = "주문 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "orders"
)]
pub async fn get_order(
    CurrentUser(user): CurrentUser,
    State(state): State<Arc<AppState>>,
    Path(order_id): Path<i64>,
) -> ApiResult<Json<OrderResponse>> {
    let order = state.order_service().get_authorized(&user, order_id).await?;
    Ok(Json(order.into()))
}

/// 주문 수정 (소유자 또는 Admin).
#[utoipa::path(
    put,
    path = "/orders/{order_id}",
    params(("order_id" = i64, Path, description = "주문 ID")),
    request_body = OrderUpdate,
    responses(
        (status = 200, description = "수정됨", body = OrderResponse),
        (status = 400, description = "수정 실패", body = ApiErrorResponse),
        (status = 403, description = "권한 없음", body = ApiErrorResponse),
        (status = 404, description = "주문 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "orders"
)]
pub async fn update_order(
    CurrentUser(user): CurrentUser,
    State(state): State<Arc<AppState>>,
    Path(order_id): Path<i64>,
    Json(request): Json<OrderUpdate>,
) -> ApiResult<Json<OrderResponse>> {
    request.validate()?;

    let order = state
        .order_service()
        .update_order(&user, order_id, request.into())
        .await?;
    Ok(Json(order.into()))
}

/// 주문 삭제 (소유자 또는 Admin).
#[utoipa::path(
    delete,
    path = "/orders/{order_id}",
    params(("order_id" = i64, Path, description = "주문 ID")),
    responses(
        (status = 204, description = "삭제됨"),
        (status = 400, description = "삭제 실패", body = ApiErrorResponse),
        (status = 403, description = "권한 없음", body = ApiErrorResponse),
        (status = 404, description = "주문 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "orders"
)]
pub async fn delete_order(
    CurrentUser(user): CurrentUser,
    State(state): State<Arc<AppState>>,
    Path(order_id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.order_service().delete_order(&user, order_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// 주문 라우터 생성.
pub fn orders_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_order).get(list_orders))
        .route("/me", get(list_my_orders))
        .route("/users/{user_id}", get(list_orders_by_user))
        .route(
            "/{order_id}",
            get(get_order).put(update_order).delete(delete_order),
        )
}
