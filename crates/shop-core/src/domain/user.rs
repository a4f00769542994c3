//! 사용자 및 역할 모델.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 사용자 역할.
///
/// `users.role` 컬럼은 자유 텍스트입니다. `admin`만 소유권 검사를 우회하며,
/// 그 외 모든 값은 자신의 리소스에만 접근할 수 있습니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    /// 관리자 - 모든 사용자/주문 접근 가능
    Admin,
    /// 일반 고객 (기본값)
    #[default]
    Customer,
    /// 알려지지 않은 역할 이름 (원문 보존)
    Other(String),
}

impl Role {
    /// 관리자 여부.
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// 저장/직렬화용 문자열.
    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => "admin",
            Role::Customer => "customer",
            Role::Other(name) => name,
        }
    }

    /// 문자열에서 역할 파싱.
    ///
    /// 정확히 `"admin"` / `"customer"`만 인식합니다. 대소문자나 공백이 다른
    /// 값은 원문 그대로 `Other`로 보존되며 관리자 권한이 없습니다.
    pub fn parse(s: &str) -> Self {
        match s {
            "admin" => Role::Admin,
            "customer" => Role::Customer,
            _ => Role::Other(s.to_string()),
        }
    }
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        Role::parse(&s)
    }
}

impl From<&str> for Role {
    fn from(s: &str) -> Self {
        Role::parse(s)
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 사용자 레코드.
///
/// users 테이블의 표현입니다. `hashed_password`를 포함하므로 직렬화하지 않습니다.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub hashed_password: String,
    #[cfg_attr(feature = "sqlx-support", sqlx(try_from = "String"))]
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 새 사용자 생성 입력. 비밀번호는 이미 해싱된 상태입니다.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub hashed_password: String,
    pub role: Role,
}

/// 사용자 부분 업데이트. `None` 필드는 변경하지 않습니다.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub email: Option<String>,
}

impl UserChanges {
    /// 변경할 필드가 없는지 확인.
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none()
    }
}
