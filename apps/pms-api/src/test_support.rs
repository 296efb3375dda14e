//! handler 测试共用的内存状态与请求辅助函数。

use crate::{ApiSettings, AppState, Stores, routes::build_app};
use axum::{
    body::Body,
    http::{HeaderMap, HeaderValue, Method, Request, StatusCode, header},
};
use domain::{TenantContext, permissions};
use http_body_util::BodyExt;
use pms_auth::JwtManager;
use pms_storage::{
    InMemoryDraftStore, InMemoryFloorLayoutStore, InMemoryOccupancyStore, InMemoryPropertyStore,
    InMemoryUserStore,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

const SECRET: &str = "test-secret";

/// 内存后端 + 默认物业（property-1，8×8）。
pub fn memory_state() -> AppState {
    let stores = Stores {
        db_pool: None,
        users: Arc::new(InMemoryUserStore::with_default_admin()),
        properties: Arc::new(InMemoryPropertyStore::with_default_property()),
        floors: Arc::new(InMemoryFloorLayoutStore::new()),
        occupancies: Arc::new(InMemoryOccupancyStore::new()),
        drafts: Arc::new(InMemoryDraftStore::new()),
    };
    let settings = ApiSettings {
        grid_rows: 8,
        grid_cols: 8,
        require_units_on_save: true,
    };
    AppState::from_stores(stores, JwtManager::new(SECRET, 3600), 10, settings)
}

/// tenant-1 下的 landlord token。
pub fn token_for(codes: &[&str], scope: Option<&str>) -> String {
    let ctx = TenantContext::new(
        "tenant-1",
        "user-7",
        vec![permissions::ROLE_LANDLORD.to_string()],
        codes.iter().map(|code| code.to_string()).collect(),
        scope.map(str::to_string),
    );
    JwtManager::new(SECRET, 3600)
        .issue_access(&ctx)
        .expect("token")
        .token
}

pub fn landlord_token() -> String {
    token_for(permissions::LANDLORD_PERMISSIONS, None)
}

pub fn bearer(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {token}")).expect("header"),
    );
    headers
}

/// 通过完整路由发送请求，返回状态码与 JSON 响应体。
pub async fn send(
    state: &AppState,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request");
    let response = build_app(state.clone())
        .oneshot(request)
        .await
        .expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json")
    };
    (status, value)
}
