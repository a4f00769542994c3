//! 설정 관리.
//!
//! 기본값 → 설정 파일 → `SHOP__*` 환경 변수 순서로 덮어씁니다.
//! 기존 배포와의 호환을 위해 `DATABASE_URL`, `JWT_SECRET_KEY` 같은
//! 평면 환경 변수도 최종 오버라이드로 인정합니다.

use std::path::Path;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;

/// 설정 로드/검증 에러.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("설정 로드 실패: {0}")]
    Load(#[from] config::ConfigError),
    #[error("잘못된 설정: {0}")]
    Invalid(String),
}

/// 지원하는 JWT 서명 알고리즘 (HMAC 계열만).
pub const SUPPORTED_JWT_ALGORITHMS: [&str; 3] = ["HS256", "HS384", "HS512"];

/// 기본 설정 파일 경로.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// 평면 환경 변수 → 설정 키 매핑.
const LEGACY_ENV_OVERRIDES: [(&str, &str); 6] = [
    ("DATABASE_URL", "database.url"),
    ("JWT_SECRET_KEY", "auth.jwt_secret_key"),
    ("JWT_REFRESH_SECRET_KEY", "auth.jwt_refresh_secret_key"),
    ("JWT_ALGORITHM", "auth.jwt_algorithm"),
    ("ACCESS_TOKEN_EXPIRE_MINUTES", "auth.access_token_expire_minutes"),
    ("REFRESH_TOKEN_EXPIRE_MINUTES", "auth.refresh_token_expire_minutes"),
];

/// 애플리케이션 설정.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// 서버 설정
    pub server: ServerConfig,
    /// 데이터베이스 설정
    pub database: DatabaseConfig,
    /// 토큰 설정
    pub auth: AuthConfig,
    /// 로깅 설정
    pub logging: LoggingConfig,
    /// 관리자 계정 시드 설정
    pub seed: SeedConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
    /// 요청 타임아웃 (초)
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            request_timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    /// `host:port` 문자열.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 데이터베이스 설정.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Postgres 연결 URL. 없으면 메모리 저장소를 사용합니다.
    #[serde(default)]
    pub url: Option<SecretString>,
    /// 최대 연결 수
    pub max_connections: u32,
    /// 연결 타임아웃 (초)
    pub connection_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
            connection_timeout_secs: 30,
        }
    }
}

/// 토큰 발급 설정.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Access Token 서명 키
    pub jwt_secret_key: SecretString,
    /// Refresh Token 서명 키 (Access Token 키와 달라야 함)
    pub jwt_refresh_secret_key: SecretString,
    /// 서명 알고리즘 (HS256 | HS384 | HS512)
    pub jwt_algorithm: String,
    /// Access Token 만료 시간 (분)
    pub access_token_expire_minutes: i64,
    /// Refresh Token 만료 시간 (분)
    pub refresh_token_expire_minutes: i64,
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "shop_api=info,shop_core=info,tower_http=info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// 관리자 계정 시드 설정.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedConfig {
    /// 시작 시 관리자 계정 생성 여부
    pub enabled: bool,
    pub admin_username: String,
    pub admin_email: String,
    pub admin_password: SecretString,
}

impl AppConfig {
    /// `SHOP_CONFIG` 경로(없으면 기본 경로)와 환경 변수에서 설정을 로드합니다.
    pub fn load() -> Result<Self, ConfigError> {
        let path =
            std::env::var("SHOP_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(path)
    }

    /// 지정한 파일과 환경 변수에서 설정을 로드합니다. 파일은 없어도 됩니다.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let server = ServerConfig::default();
        let database = DatabaseConfig::default();
        let logging = LoggingConfig::default();

        let mut builder = config::Config::builder()
            // 기본값으로 시작
            .set_default("server.host", server.host)?
            .set_default("server.port", i64::from(server.port))?
            .set_default("server.request_timeout_secs", server.request_timeout_secs as i64)?
            .set_default("database.max_connections", i64::from(database.max_connections))?
            .set_default(
                "database.connection_timeout_secs",
                database.connection_timeout_secs as i64,
            )?
            .set_default("auth.jwt_algorithm", "HS256")?
            .set_default("auth.access_token_expire_minutes", 30)?
            .set_default("auth.refresh_token_expire_minutes", 60 * 24 * 7)?
            .set_default("logging.level", logging.level)?
            .set_default("logging.format", logging.format)?
            .set_default("seed.enabled", true)?
            .set_default("seed.admin_username", "admin")?
            .set_default("seed.admin_email", "admin@example.com")?
            .set_default("seed.admin_password", "AdminPass123")?
            // 파일에서 로드
            .add_source(config::File::from(path.as_ref()).required(false))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("SHOP")
                    .separator("__")
                    .try_parsing(true),
            );

        for (var, key) in LEGACY_ENV_OVERRIDES {
            builder = builder.set_override_option(key, std::env::var(var).ok())?;
        }

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// 설정 값의 일관성을 검증합니다.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.auth.validate()
    }
}

impl AuthConfig {
    /// 토큰 설정 검증.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let access = self.jwt_secret_key.expose_secret();
        let refresh = self.jwt_refresh_secret_key.expose_secret();

        if access.is_empty() || refresh.is_empty() {
            return Err(ConfigError::Invalid(
                "JWT 서명 키가 비어 있습니다".to_string(),
            ));
        }
        if access == refresh {
            return Err(ConfigError::Invalid(
                "Access/Refresh 서명 키는 서로 달라야 합니다".to_string(),
            ));
        }
        if !SUPPORTED_JWT_ALGORITHMS.contains(&self.jwt_algorithm.to_uppercase().as_str()) {
            return Err(ConfigError::Invalid(format!(
                "지원하지 않는 JWT 알고리즘: {}",
                self.jwt_algorithm
            )));
        }
        if self.access_token_expire_minutes <= 0 || self.refresh_token_expire_minutes <= 0 {
            return Err(ConfigError::Invalid(
                "토큰 만료 시간은 0보다 커야 합니다".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth_config() -> AuthConfig {
        AuthConfig {
            jwt_secret_key: SecretString::from("access-secret".to_string()),
            jwt_refresh_secret_key: SecretString::from("refresh-secret".to_string()),
            jwt_algorithm: "HS256".to_string(),
            access_token_expire_minutes: 30,
            refresh_token_expire_minutes: 60,
        }
    }

    #[test]
    fn test_valid_auth_config() {
        assert!(auth_config().validate().is_ok());
    }

    #[test]
    fn test_same_secrets_rejected() {
        let mut config = auth_config();
        config.jwt_refresh_secret_key = SecretString::from("access-secret".to_string());
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_asymmetric_algorithm_rejected() {
        let mut config = auth_config();
        config.jwt_algorithm = "RS256".to_string();
        assert!(config.validate().is_err());

        config.jwt_algorithm = "hs512".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_non_positive_expiry_rejected() {
        let mut config = auth_config();
        config.access_token_expire_minutes = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = std::env::temp_dir().join(format!("shop-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("test.toml");
        std::fs::write(
            &path,
            r#"
            [server]
            port = 9100

            [auth]
            jwt_secret_key = "file-access"
            jwt_refresh_secret_key = "file-refresh"
            access_token_expire_minutes = 5
            "#,
        )
        .unwrap();

        // 평면 환경 변수가 테스트 환경에 없을 때만 파일 값을 검증
        if std::env::var("JWT_SECRET_KEY").is_err()
            && std::env::var("ACCESS_TOKEN_EXPIRE_MINUTES").is_err()
        {
            let config = AppConfig::load_from(&path).unwrap();
            assert_eq!(config.server.port, 9100);
            assert_eq!(config.server.host, "127.0.0.1");
            assert_eq!(config.auth.access_token_expire_minutes, 5);
            assert_eq!(config.auth.refresh_token_expire_minutes, 60 * 24 * 7);
            assert_eq!(config.auth.jwt_algorithm, "HS256");
            assert_eq!(config.seed.admin_username, "admin");
        }

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_bind_address() {
        let server = ServerConfig::default();
        assert_eq!(server.bind_address(), "127.0.0.1:8000");
    }
}
