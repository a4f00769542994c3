//! 로그인 및 토큰 갱신.

use shop_core::{User, UserStore};
use tracing::{debug, info, warn};

use super::run_blocking;
use crate::auth::{verify_password, PasswordError, TokenPair, TokenService};
use crate::error::{ApiError, ApiResult};
use crate::metrics;

/// 인증 서비스.
pub struct AuthService<'a> {
    users: &'a dyn UserStore,
    tokens: &'a TokenService,
}

fn bad_credentials() -> ApiError {
    ApiError::Unauthorized {
        code: "INVALID_CREDENTIALS",
        message: "Incorrect username or password".to_string(),
    }
}

impl<'a> AuthService<'a> {
    pub fn new(users: &'a dyn UserStore, tokens: &'a TokenService) -> Self {
        Self { users, tokens }
    }

    /// username/password 검증.
    ///
    /// 사용자가 없는 경우와 비밀번호가 틀린 경우 같은 401을 반환합니다.
    pub async fn authenticate(&self, username: &str, password: &str) -> ApiResult<User> {
        let Some(user) = self.users.find_user_by_username(username).await? else {
            debug!(username, "Login failed: unknown user");
            metrics::record_login(false);
            return Err(bad_credentials());
        };

        let password = password.to_string();
        let hash = user.hashed_password.clone();
        let verified = run_blocking(move || verify_password(&password, &hash)).await?;

        match verified {
            Ok(()) => Ok(user),
            Err(PasswordError::InvalidHashFormat) => {
                warn!(user_id = user.id, "Stored password hash is malformed");
                metrics::record_login(false);
                Err(bad_credentials())
            }
            Err(_) => {
                debug!(user_id = user.id, "Login failed: wrong password");
                metrics::record_login(false);
                Err(bad_credentials())
            }
        }
    }

    /// 자격증명 검증 후 토큰 쌍 발급.
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<TokenPair> {
        let user = self.authenticate(username, password).await?;
        let pair = self.tokens.issue_pair(user.id, &user.role)?;

        metrics::record_login(true);
        info!(user_id = user.id, role = %user.role, "User logged in");
        Ok(pair)
    }

    /// Refresh Token으로 새 토큰 쌍 발급.
    ///
    /// 사용자를 다시 조회하므로 삭제된 사용자는 갱신할 수 없고,
    /// 새 토큰에는 현재 저장된 역할이 들어갑니다.
    pub async fn refresh(&self, refresh_token: &str) -> ApiResult<TokenPair> {
        let claims = self.tokens.verify_refresh(refresh_token).map_err(|e| {
            debug!(error = %e, "Refresh token rejected");
            e
        })?;
        let user_id = claims.user_id()?;

        let user = self
            .users
            .find_user(user_id)
            .await?
            .ok_or_else(ApiError::invalid_credentials)?;

        Ok(self.tokens.issue_pair(user.id, &user.role)?)
    }
}
