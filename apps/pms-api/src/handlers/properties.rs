//! 物业 CRUD handlers
//!
//! - GET /properties - 列出物业
//! - POST /properties - 创建物业（网格尺寸创建后固定）
//! - GET /properties/{id} - 获取物业详情
//! - PUT /properties/{id} - 更新名称/地址
//! - DELETE /properties/{id} - 删除物业及其楼层、草稿与入住记录
//!
//! 所有接口需要 Bearer token；详情类接口验证物业归属当前租户。

use crate::AppState;
use crate::middleware::{require_permission, require_property_scope, require_tenant_context};
use crate::utils::response::{
    bad_request_error, editor_error, layout_error, not_found_error, ok, storage_error,
};
use crate::utils::{normalize_optional, normalize_required, property_to_dto};
use api_contract::{CreatePropertyRequest, PropertyDto, UpdatePropertyRequest};
use axum::{
    Json,
    extract::{Path, State},
    http::HeaderMap,
    response::Response,
};
use domain::permissions;
use pms_layout::Grid;
use pms_storage::{PropertyRecord, PropertyUpdate};
use tracing::info;
use uuid::Uuid;

#[derive(serde::Deserialize)]
pub struct PropertyPath {
    pub property_id: String,
}

/// 列出物业
pub async fn list_properties(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let ctx = match require_tenant_context(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    if let Err(response) = require_permission(&ctx, permissions::PROPERTY_READ) {
        return response;
    }
    match state.property_store.list_properties(&ctx).await {
        Ok(properties) => {
            let data: Vec<PropertyDto> = properties.into_iter().map(property_to_dto).collect();
            ok(data)
        }
        Err(err) => storage_error(err),
    }
}

/// 创建物业
pub async fn create_property(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreatePropertyRequest>,
) -> Response {
    let ctx = match require_tenant_context(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    if let Err(response) = require_permission(&ctx, permissions::PROPERTY_WRITE) {
        return response;
    }
    let name = match normalize_required(req.name, "name") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let address = match normalize_optional(req.address, "address") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let grid = match Grid::new(
        req.grid_rows.unwrap_or(state.settings.grid_rows),
        req.grid_cols.unwrap_or(state.settings.grid_cols),
    ) {
        Ok(grid) => grid,
        Err(err) => return layout_error(err),
    };
    let record = PropertyRecord {
        property_id: Uuid::new_v4().to_string(),
        tenant_id: ctx.tenant_id.clone(),
        name,
        address,
        grid_rows: grid.rows(),
        grid_cols: grid.cols(),
    };
    match state.property_store.create_property(&ctx, record).await {
        Ok(property) => {
            info!(
                target: "pms.api",
                tenant_id = %ctx.tenant_id,
                property_id = %property.property_id,
                grid_rows = property.grid_rows,
                grid_cols = property.grid_cols,
                "property_created"
            );
            ok(property_to_dto(property))
        }
        Err(err) => storage_error(err),
    }
}

/// 获取物业详情
pub async fn get_property(
    State(state): State<AppState>,
    Path(path): Path<PropertyPath>,
    headers: HeaderMap,
) -> Response {
    let ctx = match require_property_scope(
        &state,
        &headers,
        &path.property_id,
        permissions::PROPERTY_READ,
    )
    .await
    {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    match state
        .property_store
        .find_property(&ctx, &path.property_id)
        .await
    {
        Ok(Some(property)) => ok(property_to_dto(property)),
        Ok(None) => not_found_error("property"),
        Err(err) => storage_error(err),
    }
}

/// 更新物业
pub async fn update_property(
    State(state): State<AppState>,
    Path(path): Path<PropertyPath>,
    headers: HeaderMap,
    Json(req): Json<UpdatePropertyRequest>,
) -> Response {
    let ctx = match require_property_scope(
        &state,
        &headers,
        &path.property_id,
        permissions::PROPERTY_WRITE,
    )
    .await
    {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let name = match normalize_optional(req.name, "name") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let address = match normalize_optional(req.address, "address") {
        Ok(value) => value,
        Err(response) => return response,
    };
    if name.is_none() && address.is_none() {
        return bad_request_error("empty update");
    }
    let update = PropertyUpdate { name, address };
    match state
        .property_store
        .update_property(&ctx, &path.property_id, update)
        .await
    {
        Ok(Some(property)) => ok(property_to_dto(property)),
        Ok(None) => not_found_error("property"),
        Err(err) => storage_error(err),
    }
}

/// 删除物业
pub async fn delete_property(
    State(state): State<AppState>,
    Path(path): Path<PropertyPath>,
    headers: HeaderMap,
) -> Response {
    let ctx = match require_property_scope(
        &state,
        &headers,
        &path.property_id,
        permissions::PROPERTY_WRITE,
    )
    .await
    {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    match state
        .property_store
        .delete_property(&ctx, &path.property_id)
        .await
    {
        Ok(true) => {}
        Ok(false) => return not_found_error("property"),
        Err(err) => return storage_error(err),
    }
    // Postgres 外键级联删除楼层与入住记录；内存后端与草稿存储需显式清理。
    if let Err(err) = state.editor.purge_property(&ctx, &path.property_id).await {
        return editor_error(err);
    }
    let occupancies = match state
        .occupancy_store
        .list_occupancies(&ctx, &path.property_id, None)
        .await
    {
        Ok(occupancies) => occupancies,
        Err(err) => return storage_error(err),
    };
    for occupancy in occupancies {
        if let Err(err) = state
            .occupancy_store
            .delete_occupancy(&ctx, &path.property_id, &occupancy.occupancy_id)
            .await
        {
            return storage_error(err);
        }
    }
    info!(
        target: "pms.api",
        tenant_id = %ctx.tenant_id,
        property_id = %path.property_id,
        "property_deleted"
    );
    ok(())
}
