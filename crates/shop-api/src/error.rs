//! 통합 API 에러 응답 타입.
//!
//! 모든 엔드포인트가 같은 JSON 에러 형식을 반환합니다.
//!
//! | 상황 | 상태 코드 |
//! |---|---|
//! | 인증 실패 (자격증명, 토큰) | 401 |
//! | 권한 부족 | 403 |
//! | 리소스 없음 | 404 |
//! | 입력 오류, 중복, 변경 실패 | 400 |
//! | 내부 오류 | 500 |

use axum::{
    http::{header::WWW_AUTHENTICATE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shop_core::StoreError;
use tracing::error;
use utoipa::ToSchema;

use crate::auth::{PasswordError, TokenError};

/// JSON 에러 응답 본문.
///
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Order not found",
///   "timestamp": 1738300800
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// 에러 코드 (예: "UNAUTHORIZED", "FORBIDDEN", "NOT_FOUND")
    pub code: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
    /// 추가 에러 상세 정보 (검증 실패 필드 등)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// 에러 발생 타임스탬프 (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl ApiErrorResponse {
    /// 기본 에러 생성 (타임스탬프 포함).
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            timestamp: Some(chrono::Utc::now().timestamp()),
        }
    }

    /// 상세 정보 포함 에러 생성.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: Value,
    ) -> Self {
        Self {
            details: Some(details),
            ..Self::new(code, message)
        }
    }
}

impl std::fmt::Display for ApiErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// 핸들러 에러.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 401 - 인증 실패
    #[error("{message}")]
    Unauthorized { code: &'static str, message: String },
    /// 403 - 권한 부족
    #[error("{0}")]
    Forbidden(String),
    /// 404 - 리소스 없음
    #[error("{0}")]
    NotFound(String),
    /// 400 - 잘못된 요청 또는 변경 실패
    #[error("{0}")]
    BadRequest(String),
    /// 400 - 고유 값 중복
    #[error("{0}")]
    Duplicate(String),
    /// 400 - 입력 값 검증 실패
    #[error("입력 값 검증 실패")]
    Validation(#[from] validator::ValidationErrors),
    /// 500 - 내부 오류 (메시지는 로그에만 남김)
    #[error("{0}")]
    Internal(String),
}

/// 핸들러 Result 타입 별칭.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// 자격증명 검증 실패 (토큰 문제 포함).
    pub fn invalid_credentials() -> Self {
        ApiError::Unauthorized {
            code: "INVALID_CREDENTIALS",
            message: "Could not validate credentials".to_string(),
        }
    }

    /// 권한 부족.
    pub fn not_authorized() -> Self {
        ApiError::Forbidden("Not authorized".to_string())
    }

    /// HTTP 상태 코드.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) | ApiError::Duplicate(_) | ApiError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 에러 코드.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Unauthorized { code, .. } => code,
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Duplicate(_) => "DUPLICATE",
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn body(&self) -> ApiErrorResponse {
        match self {
            ApiError::Validation(errors) => ApiErrorResponse::with_details(
                self.code(),
                validation_message(errors),
                serde_json::to_value(errors.field_errors()).unwrap_or(Value::Null),
            ),
            ApiError::Internal(_) => ApiErrorResponse::new(self.code(), "Internal server error"),
            _ => ApiErrorResponse::new(self.code(), self.to_string()),
        }
    }
}

/// 필드별 검증 메시지를 한 줄로 합칩니다.
fn validation_message(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| format!("{}: {}", field, m))
                    .unwrap_or_else(|| format!("{}: invalid value", field))
            })
        })
        .collect::<Vec<_>>()
        .join(", ")
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(detail) = &self {
            error!(error = %detail, "Internal error while handling request");
        }

        let status = self.status();
        let mut response = (status, Json(self.body())).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(constraint) => {
                tracing::debug!(%constraint, "Unique constraint violated");
                ApiError::Duplicate("Username or email already registered".to_string())
            }
            StoreError::InvalidReference(constraint) => {
                ApiError::BadRequest(format!("Referenced record does not exist ({})", constraint))
            }
            StoreError::Database(message) => ApiError::Internal(message),
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Encoding(e) => ApiError::Internal(format!("token encoding: {}", e)),
            TokenError::UnsupportedAlgorithm(alg) => {
                ApiError::Internal(format!("unsupported algorithm: {}", alg))
            }
            TokenError::Expired => ApiError::Unauthorized {
                code: "TOKEN_EXPIRED",
                message: "Token has expired".to_string(),
            },
            TokenError::InvalidSignature | TokenError::Malformed | TokenError::InvalidSubject => {
                ApiError::invalid_credentials()
            }
        }
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::Internal(format!("password: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::invalid_credentials().status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::not_authorized().status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Duplicate("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::Internal("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_unauthorized_sets_www_authenticate() {
        let response = ApiError::invalid_credentials().into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers().get(WWW_AUTHENTICATE).unwrap(), "Bearer");

        let response = ApiError::not_authorized().into_response();
        assert!(response.headers().get(WWW_AUTHENTICATE).is_none());
    }

    #[test]
    fn test_store_error_conversion() {
        let err: ApiError = StoreError::Conflict("users_email_key".into()).into();
        assert_eq!(err.code(), "DUPLICATE");

        let err: ApiError = StoreError::Database("connection refused".into()).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        // 내부 메시지는 응답 본문에 노출되지 않음
        assert_eq!(err.body().message, "Internal server error");
    }

    #[test]
    fn test_token_error_conversion() {
        let err: ApiError = TokenError::Expired.into();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.code(), "TOKEN_EXPIRED");

        let err: ApiError = TokenError::Malformed.into();
        assert_eq!(err.code(), "INVALID_CREDENTIALS");
    }

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 3, message = "too short"))]
        name: String,
    }

    #[test]
    fn test_validation_error_body() {
        let errors = Sample { name: "ab".into() }.validate().unwrap_err();
        let err = ApiError::from(errors);
        let body = err.body();

        assert_eq!(body.code, "VALIDATION_ERROR");
        assert!(body.message.contains("name: too short"));
        assert!(body.details.is_some());
    }

    #[test]
    fn test_json_serialization() {
        let body = ApiErrorResponse::new("NOT_FOUND", "Order not found");
        let json = serde_json::to_string(&body).unwrap();

        assert!(json.contains(r#""code":"NOT_FOUND""#));
        assert!(json.contains(r#""message":"Order not found""#));
        assert!(!json.contains("details"));
    }
}
