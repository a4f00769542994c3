//! 도메인 및 저장소 에러 타입.

use thiserror::Error;

/// 저장소 계층 에러.
///
/// 데이터베이스 구현과 메모리 구현이 동일한 에러 타입을 반환합니다.
#[derive(Debug, Error)]
pub enum StoreError {
    /// 고유 제약 조건 위반 (중복 username/email 등)
    #[error("중복된 값: {0}")]
    Conflict(String),

    /// 존재하지 않는 레코드를 참조
    #[error("잘못된 참조: {0}")]
    InvalidReference(String),

    /// 기타 데이터베이스 에러
    #[error("데이터베이스 에러: {0}")]
    Database(String),
}

/// 저장소 작업을 위한 Result 타입.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(feature = "sqlx-support")]
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return StoreError::Conflict(
                    db_err.constraint().unwrap_or("unique").to_string(),
                );
            }
            if db_err.is_foreign_key_violation() {
                return StoreError::InvalidReference(
                    db_err.constraint().unwrap_or("foreign_key").to_string(),
                );
            }
        }
        StoreError::Database(err.to_string())
    }
}
