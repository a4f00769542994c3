//! JWT 토큰 처리.
//!
//! Access Token 및 Refresh Token 생성/검증 로직.
//! 두 토큰은 같은 Claims 구조를 공유하지만 서로 다른 키로 서명되므로
//! 한 종류의 토큰이 다른 종류로 검증되는 일은 없습니다.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use shop_core::{AuthConfig, Role};
use utoipa::ToSchema;

/// JWT 페이로드.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - 사용자 ID (문자열)
    pub sub: String,
    /// 발급 시점의 사용자 역할
    pub role: Role,
    /// Issued At (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
    /// JWT ID - 토큰 고유 식별자
    pub jti: String,
}

impl Claims {
    /// 새로운 Claims 생성.
    ///
    /// * `user_id` - 사용자 ID
    /// * `role` - 사용자 역할
    /// * `expires_in_minutes` - 만료 시간 (분)
    pub fn new(user_id: i64, role: Role, expires_in_minutes: i64) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id.to_string(),
            role,
            iat: now.timestamp(),
            exp: (now + Duration::minutes(expires_in_minutes)).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
        }
    }

    /// Subject를 사용자 ID로 해석.
    pub fn user_id(&self) -> Result<i64, TokenError> {
        self.sub.parse().map_err(|_| TokenError::InvalidSubject)
    }

    /// 토큰이 만료되었는지 확인.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

/// 토큰 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

/// 로그인/갱신 응답.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenPair {
    /// Access Token
    pub access_token: String,
    /// Refresh Token
    pub refresh_token: String,
    /// 토큰 타입 (항상 "bearer")
    pub token_type: String,
    /// Access Token 만료 시간 (초)
    pub expires_in: i64,
}

/// JWT 에러.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("토큰 인코딩 실패: {0}")]
    Encoding(#[from] jsonwebtoken::errors::Error),
    #[error("토큰이 만료되었습니다")]
    Expired,
    #[error("토큰 서명이 유효하지 않습니다")]
    InvalidSignature,
    #[error("잘못된 토큰 형식")]
    Malformed,
    #[error("토큰 subject가 사용자 ID가 아닙니다")]
    InvalidSubject,
    #[error("지원하지 않는 알고리즘: {0}")]
    UnsupportedAlgorithm(String),
}

/// 토큰 발급/검증 서비스.
#[derive(Clone)]
pub struct TokenService {
    algorithm: Algorithm,
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    access_ttl_minutes: i64,
    refresh_ttl_minutes: i64,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithm", &self.algorithm)
            .field("access_ttl_minutes", &self.access_ttl_minutes)
            .field("refresh_ttl_minutes", &self.refresh_ttl_minutes)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    /// HMAC 서명 키로 서비스 생성.
    pub fn new(
        access_secret: &str,
        refresh_secret: &str,
        algorithm: Algorithm,
        access_ttl_minutes: i64,
        refresh_ttl_minutes: i64,
    ) -> Result<Self, TokenError> {
        if !matches!(algorithm, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
            return Err(TokenError::UnsupportedAlgorithm(format!("{:?}", algorithm)));
        }

        Ok(Self {
            algorithm,
            access_encoding: EncodingKey::from_secret(access_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(access_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(refresh_secret.as_bytes()),
            access_ttl_minutes,
            refresh_ttl_minutes,
        })
    }

    /// 설정에서 서비스 생성.
    pub fn from_config(config: &AuthConfig) -> Result<Self, TokenError> {
        let algorithm: Algorithm = config
            .jwt_algorithm
            .to_uppercase()
            .parse()
            .map_err(|_| TokenError::UnsupportedAlgorithm(config.jwt_algorithm.clone()))?;

        Self::new(
            config.jwt_secret_key.expose_secret(),
            config.jwt_refresh_secret_key.expose_secret(),
            algorithm,
            config.access_token_expire_minutes,
            config.refresh_token_expire_minutes,
        )
    }

    /// Access Token 유효 시간 (초).
    pub fn access_ttl_secs(&self) -> i64 {
        self.access_ttl_minutes * 60
    }

    /// 주어진 Claims를 서명.
    pub fn encode(&self, kind: TokenKind, claims: &Claims) -> Result<String, TokenError> {
        let key = match kind {
            TokenKind::Access => &self.access_encoding,
            TokenKind::Refresh => &self.refresh_encoding,
        };
        Ok(encode(&Header::new(self.algorithm), claims, key)?)
    }

    /// 설정된 만료 시간으로 토큰 발급.
    pub fn issue(&self, kind: TokenKind, user_id: i64, role: &Role) -> Result<String, TokenError> {
        let ttl = match kind {
            TokenKind::Access => self.access_ttl_minutes,
            TokenKind::Refresh => self.refresh_ttl_minutes,
        };
        self.encode(kind, &Claims::new(user_id, role.clone(), ttl))
    }

    /// Access Token + Refresh Token 쌍 발급.
    pub fn issue_pair(&self, user_id: i64, role: &Role) -> Result<TokenPair, TokenError> {
        Ok(TokenPair {
            access_token: self.issue(TokenKind::Access, user_id, role)?,
            refresh_token: self.issue(TokenKind::Refresh, user_id, role)?,
            token_type: "bearer".to_string(),
            expires_in: self.access_ttl_secs(),
        })
    }

    /// 토큰 서명 및 만료 검증.
    pub fn verify(&self, kind: TokenKind, token: &str) -> Result<Claims, TokenError> {
        let key = match kind {
            TokenKind::Access => &self.access_decoding,
            TokenKind::Refresh => &self.refresh_decoding,
        };

        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = true;
        // exp 이후에는 즉시 거부 (jsonwebtoken 기본 leeway는 60초)
        validation.leeway = 0;

        decode::<Claims>(token, key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Malformed,
            })
    }

    /// Access Token 검증.
    pub fn verify_access(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify(TokenKind::Access, token)
    }

    /// Refresh Token 검증.
    pub fn verify_refresh(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify(TokenKind::Refresh, token)
    }
}
