//! Axum용 인증 추출기.
//!
//! `Authorization: Bearer <token>` 헤더를 검증하고, 토큰의 subject로
//! 저장소에서 사용자를 다시 조회합니다. 토큰 발급 이후 삭제된 사용자는
//! 유효한 토큰을 갖고 있어도 401을 받습니다.

use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};
use shop_core::{StoreError, User};
use tracing::debug;

use super::{policy, Claims, TokenError};
use crate::error::ApiError;
use crate::state::AppState;

/// 인증 추출기 에러.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Not authenticated")]
    MissingToken,
    #[error("Invalid authorization header")]
    InvalidAuthHeader,
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error("Could not validate credentials")]
    UnknownUser,
    #[error("Not authorized")]
    InsufficientPermission,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingToken => ApiError::Unauthorized {
                code: "MISSING_TOKEN",
                message: "Not authenticated".to_string(),
            },
            AuthError::InvalidAuthHeader => ApiError::Unauthorized {
                code: "INVALID_AUTH_HEADER",
                message: "Invalid authorization header".to_string(),
            },
            AuthError::Token(e) => e.into(),
            AuthError::UnknownUser => ApiError::invalid_credentials(),
            AuthError::InsufficientPermission => ApiError::not_authorized(),
            AuthError::Store(e) => e.into(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}

/// 헤더에서 Bearer 토큰 추출.
fn bearer_token(parts: &Parts) -> Result<&str, AuthError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    let (scheme, token) = header
        .split_once(' ')
        .ok_or(AuthError::InvalidAuthHeader)?;
    if !scheme.eq_ignore_ascii_case("bearer") || token.trim().is_empty() {
        return Err(AuthError::InvalidAuthHeader);
    }
    Ok(token.trim())
}

/// JWT 검증 추출기 (사용자 조회 없음).
///
/// ```rust,ignore
/// async fn handler(JwtAuth(claims): JwtAuth) -> impl IntoResponse {
///     format!("subject: {}", claims.sub)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct JwtAuth(pub Claims);

impl FromRequestParts<Arc<AppState>> for JwtAuth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let claims = state.tokens.verify_access(token).map_err(|e| {
            debug!(error = %e, "Access token rejected");
            e
        })?;
        Ok(JwtAuth(claims))
    }
}

/// 인증된 현재 사용자.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let JwtAuth(claims) = JwtAuth::from_request_parts(parts, state).await?;
        let user_id = claims.user_id()?;

        let user = state
            .users
            .find_user(user_id)
            .await?
            .ok_or(AuthError::UnknownUser)?;

        Ok(CurrentUser(user))
    }
}

/// Admin 역할을 요구하는 추출기.
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

impl FromRequestParts<Arc<AppState>> for AdminUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        policy::require_admin(&user).map_err(|_| AuthError::InsufficientPermission)?;
        Ok(AdminUser(user))
    }
}
