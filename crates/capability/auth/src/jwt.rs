use crate::AuthError;
use domain::TenantContext;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// JWT claims。`property_scope` 为空表示可访问租户下全部物业。
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    tenant_id: String,
    roles: Vec<String>,
    permissions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    property_scope: Option<String>,
    exp: u64,
}

/// 签发结果。
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    /// 过期时间（Unix 秒）。
    pub expires_at: u64,
}

/// HS256 access token 签发与校验。
pub struct JwtManager {
    secret: Vec<u8>,
    access_ttl_seconds: u64,
}

impl JwtManager {
    pub fn new(secret: impl Into<String>, access_ttl_seconds: u64) -> Self {
        Self {
            secret: secret.into().into_bytes(),
            access_ttl_seconds,
        }
    }

    pub fn issue_access(&self, ctx: &TenantContext) -> Result<AccessToken, AuthError> {
        let expires_at = now_epoch_seconds() + self.access_ttl_seconds;
        let claims = Claims {
            sub: ctx.user_id.clone(),
            tenant_id: ctx.tenant_id.clone(),
            roles: ctx.roles.clone(),
            permissions: ctx.permissions.clone(),
            property_scope: ctx.property_scope.clone(),
            exp: expires_at,
        };
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&self.secret),
        )
        .map_err(|err| AuthError::Internal(err.to_string()))?;
        Ok(AccessToken { token, expires_at })
    }

    pub fn decode_access(&self, token: &str) -> Result<TenantContext, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        let claims = jsonwebtoken::decode::<Claims>(
            token,
            &DecodingKey::from_secret(&self.secret),
            &validation,
        )
        .map_err(map_jwt_error)?
        .claims;
        if claims.tenant_id.is_empty() {
            return Err(AuthError::TokenInvalid);
        }
        Ok(TenantContext::new(
            claims.tenant_id,
            claims.sub,
            claims.roles,
            claims.permissions,
            claims.property_scope,
        ))
    }
}

fn now_epoch_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

fn map_jwt_error(err: jsonwebtoken::errors::Error) -> AuthError {
    match err.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::TokenInvalid,
    }
}
