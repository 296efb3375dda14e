//! 认证能力：登录、密码校验与 access token 签发/校验。

mod jwt;
mod password;

use domain::TenantContext;
use pms_storage::{UserRecord, UserStore};
use std::sync::Arc;
use tracing::{info, warn};

pub use jwt::{AccessToken, JwtManager};
pub use password::{PasswordVerdict, hash_password, verify_password};

/// 认证相关错误。
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("token expired")]
    TokenExpired,
    #[error("token invalid")]
    TokenInvalid,
    #[error("internal error: {0}")]
    Internal(String),
}

/// 认证服务（UserStore + JWT）。
pub struct AuthService {
    user_store: Arc<dyn UserStore>,
    jwt: JwtManager,
}

impl AuthService {
    pub fn new(user_store: Arc<dyn UserStore>, jwt: JwtManager) -> Self {
        Self { user_store, jwt }
    }

    /// 登录校验并签发 access token。
    ///
    /// 历史明文密码校验通过后立即升级为 argon2 哈希。
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(UserRecord, AccessToken), AuthError> {
        let user = self
            .user_store
            .find_by_username(&TenantContext::default(), username)
            .await
            .map_err(|err| AuthError::Internal(err.to_string()))?
            .ok_or(AuthError::InvalidCredentials)?;
        let ctx = user.to_tenant_context();
        match verify_password(&user.password, password)? {
            PasswordVerdict::Rejected => {
                warn!(target: "pms.auth", tenant_id = %ctx.tenant_id, username, "login_rejected");
                return Err(AuthError::InvalidCredentials);
            }
            PasswordVerdict::Matched => {}
            PasswordVerdict::MatchedLegacy { upgrade_hash } => {
                let updated = self
                    .user_store
                    .update_password_hash(&ctx, &user.user_id, &upgrade_hash)
                    .await
                    .map_err(|err| AuthError::Internal(err.to_string()))?;
                if !updated {
                    return Err(AuthError::Internal(
                        "password migration update failed".to_string(),
                    ));
                }
                info!(target: "pms.auth", tenant_id = %ctx.tenant_id, user_id = %user.user_id, "password_upgraded");
            }
        }
        let token = self.jwt.issue_access(&ctx)?;
        info!(target: "pms.auth", tenant_id = %ctx.tenant_id, user_id = %user.user_id, "login_succeeded");
        Ok((user, token))
    }

    /// 校验 access token 并提取 TenantContext。
    pub fn verify_access_token(&self, token: &str) -> Result<TenantContext, AuthError> {
        self.jwt.decode_access(token)
    }
}
