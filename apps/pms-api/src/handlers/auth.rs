//! 认证相关 handlers：健康检查与登录
//!
//! ## 公开端点（无需认证）
//! - `GET /health`、`GET /livez` - 进程存活
//! - `GET /readyz` - 关键依赖就绪（Postgres 后端时检查连接）
//! - `POST /login` - 用户名密码登录，返回 access token 与用户权限

use crate::AppState;
use crate::utils::response::{auth_error, internal_auth_error, ok};
use api_contract::{LoginRequest, LoginResponse};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pms_auth::AuthError;

/// 健康检查端点
pub async fn health() -> impl IntoResponse {
    livez().await
}

/// Liveness 探针：只反映进程存活，不做外部依赖检查。
pub async fn livez() -> impl IntoResponse {
    Json(serde_json::json!({ "ok": true }))
}

/// Readiness 探针：内存后端直接就绪，Postgres 后端执行 `select 1`。
pub async fn readyz(State(state): State<AppState>) -> Response {
    let Some(pool) = state.db_pool.as_ref() else {
        return (StatusCode::OK, Json(serde_json::json!({ "ok": true }))).into_response();
    };

    match sqlx::query_scalar::<_, i32>("select 1").fetch_one(pool).await {
        Ok(_) => (StatusCode::OK, Json(serde_json::json!({ "ok": true }))).into_response(),
        Err(err) => {
            tracing::warn!(target: "pms.api", error = %err, "readyz check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({ "ok": false })),
            )
                .into_response()
        }
    }
}

/// 登录接口
///
/// # Errors
///
/// - `401 UNAUTHORIZED`: 用户名或密码错误
/// - `500 INTERNAL SERVER ERROR`: 认证服务内部错误
pub async fn login(State(state): State<AppState>, Json(req): Json<LoginRequest>) -> Response {
    match state.auth.login(&req.username, &req.password).await {
        Ok((user, token)) => ok(LoginResponse {
            access_token: token.token,
            expires: token.expires_at,
            username: user.username,
            roles: user.roles,
            permissions: user.permissions,
        }),
        Err(AuthError::InvalidCredentials) => auth_error(StatusCode::UNAUTHORIZED),
        Err(err) => internal_auth_error(err),
    }
}
