//! 认证和授权中间件
//!
//! 提供以下中间件和辅助函数：
//! - request_context：请求上下文中间件，注入 request_id/trace_id
//! - bearer_token：从 Authorization 头提取 Bearer token
//! - require_tenant_context：验证 token 并提取租户上下文
//! - require_permission：校验权限码
//! - require_property_scope：验证物业归属并绑定物业作用域
//!
//! 认证流程：
//! 1. request_context：在所有请求前注入追踪 ID
//! 2. bearer_token：从请求头提取 token
//! 3. require_tenant_context：验证 JWT 签名，获取 TenantContext
//! 4. require_property_scope：验证 property_id 属于当前租户

use axum::{
    body::Body,
    extract::Request,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    middleware::Next,
    response::Response,
};
use pms_auth::AuthError;
use pms_telemetry::new_request_ids;
use tracing::{Instrument, info_span};

use crate::AppState;
use crate::utils::response::{
    auth_error, forbidden_error, internal_auth_error, not_found_error, storage_error,
};
use domain::TenantContext;

/// 请求上下文中间件：注入 request_id/trace_id
pub async fn request_context(mut req: Request<Body>, next: Next) -> Response {
    let ids = new_request_ids();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    req.extensions_mut().insert(ids.clone());

    let span = info_span!(
        "request",
        request_id = %ids.request_id,
        trace_id = %ids.trace_id,
        method = %method,
        path = %path
    );

    let mut response = next.run(req).instrument(span).await;
    let headers = response.headers_mut();
    for (name, value) in [("x-request-id", &ids.request_id), ("x-trace-id", &ids.trace_id)] {
        headers.insert(
            name,
            HeaderValue::from_str(value).unwrap_or_else(|_| HeaderValue::from_static("")),
        );
    }
    response
}

/// 从请求头中提取 Bearer token
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let header_value = headers.get(header::AUTHORIZATION)?;
    let auth_str = header_value.to_str().ok()?;
    auth_str.strip_prefix("Bearer ")
}

/// 验证并提取租户上下文
pub fn require_tenant_context(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<TenantContext, Response> {
    let Some(token) = bearer_token(headers) else {
        return Err(auth_error(StatusCode::UNAUTHORIZED));
    };
    match state.auth.verify_access_token(token) {
        Ok(ctx) => Ok(ctx),
        Err(AuthError::TokenInvalid | AuthError::TokenExpired) => {
            Err(auth_error(StatusCode::UNAUTHORIZED))
        }
        Err(err) => Err(internal_auth_error(err)),
    }
}

/// 校验权限码
pub fn require_permission(ctx: &TenantContext, code: &str) -> Result<(), Response> {
    if ctx.has_permission(code) {
        Ok(())
    } else {
        Err(forbidden_error())
    }
}

/// 验证物业归属并返回绑定了物业作用域的上下文
///
/// token 已限定到其他物业时返回 403；物业不存在或不属于当前租户时返回 404。
pub async fn require_property_scope(
    state: &AppState,
    headers: &HeaderMap,
    property_id: &str,
    permission: &str,
) -> Result<TenantContext, Response> {
    let ctx = require_tenant_context(state, headers)?;
    require_permission(&ctx, permission)?;
    if ctx
        .property_scope
        .as_deref()
        .is_some_and(|scope| scope != property_id)
    {
        return Err(forbidden_error());
    }
    match state
        .property_store
        .property_belongs_to_tenant(&ctx, property_id)
        .await
    {
        Ok(true) => Ok(ctx.scoped_to(property_id)),
        Ok(false) => Err(not_found_error("property")),
        Err(err) => Err(storage_error(err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{bearer, memory_state, token_for};
    use domain::permissions;

    #[test]
    fn bearer_token_extracts() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer token-1"),
        );
        assert_eq!(bearer_token(&headers), Some("token-1"));
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);
    }

    #[tokio::test]
    async fn property_scope_sets_context() {
        let state = memory_state();
        let headers = bearer(&token_for(permissions::PERMISSION_CODES, None));
        let ctx = require_property_scope(&state, &headers, "property-1", permissions::PROPERTY_READ)
            .await
            .expect("scope");
        assert_eq!(ctx.property_scope.as_deref(), Some("property-1"));
    }

    #[tokio::test]
    async fn property_scope_rejects_unknown_property() {
        let state = memory_state();
        let headers = bearer(&token_for(permissions::PERMISSION_CODES, None));
        let response =
            require_property_scope(&state, &headers, "property-2", permissions::PROPERTY_READ)
                .await
                .expect_err("missing");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn token_scope_mismatch_is_forbidden() {
        let state = memory_state();
        let headers = bearer(&token_for(
            permissions::PERMISSION_CODES,
            Some("property-9"),
        ));
        let response =
            require_property_scope(&state, &headers, "property-1", permissions::PROPERTY_READ)
                .await
                .expect_err("forbidden");
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn missing_permission_is_forbidden() {
        let state = memory_state();
        let headers = bearer(&token_for(&[permissions::PROPERTY_READ], None));
        let response =
            require_property_scope(&state, &headers, "property-1", permissions::LAYOUT_WRITE)
                .await
                .expect_err("forbidden");
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
