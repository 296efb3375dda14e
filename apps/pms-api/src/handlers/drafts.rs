//! 编辑会话 handlers
//!
//! - POST /properties/{id}/floors/{floor_no}/draft - 打开会话（已保存楼层按单元顺序重建选区）
//! - GET  …/draft - 读取会话与预览
//! - DELETE …/draft - 放弃会话
//! - POST …/draft/toggle | add | remove - 单格编辑，请求体 `{"cell": n}`
//! - POST …/draft/clear - 清空选区
//! - PUT  …/draft/layout-type - 修改布局形状 / 创建方式
//! - POST …/draft/save - 保存为楼层布局（单元默认字段、命名策略）
//!
//! 所有接口需要 `LAYOUT.WRITE`。

use crate::AppState;
use crate::middleware::require_property_scope;
use crate::utils::response::{editor_error, layout_error, not_found_error, ok};
use crate::utils::{draft_to_dto, floor_to_dto, parse_field, parse_optional, save_options_from_request};
use api_contract::{CellRequest, LayoutTypeRequest, SaveDraftRequest};
use axum::{
    Json,
    extract::{Path, State},
    http::HeaderMap,
    response::Response,
};
use domain::{TenantContext, permissions};
use pms_editor::{DraftSession, EditorError};
use pms_layout::{CreationMethod, LayoutType};

use super::floors::FloorPath;

async fn layout_scope(
    state: &AppState,
    headers: &HeaderMap,
    path: &FloorPath,
) -> Result<TenantContext, Response> {
    require_property_scope(state, headers, &path.property_id, permissions::LAYOUT_WRITE).await
}

fn draft_response(state: &AppState, result: Result<DraftSession, EditorError>) -> Response {
    match result {
        Ok(session) => match draft_to_dto(session, state.editor.config().cell_size_px) {
            Ok(dto) => ok(dto),
            Err(err) => layout_error(err),
        },
        Err(err) => editor_error(err),
    }
}

/// 打开编辑会话
pub async fn open_draft(
    State(state): State<AppState>,
    Path(path): Path<FloorPath>,
    headers: HeaderMap,
) -> Response {
    let ctx = match layout_scope(&state, &headers, &path).await {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let result = state
        .editor
        .open_draft(&ctx, &path.property_id, path.floor_no)
        .await;
    draft_response(&state, result)
}

/// 读取编辑会话
pub async fn get_draft(
    State(state): State<AppState>,
    Path(path): Path<FloorPath>,
    headers: HeaderMap,
) -> Response {
    let ctx = match layout_scope(&state, &headers, &path).await {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let result = state
        .editor
        .get_draft(&ctx, &path.property_id, path.floor_no)
        .await;
    draft_response(&state, result)
}

/// 放弃编辑会话
pub async fn discard_draft(
    State(state): State<AppState>,
    Path(path): Path<FloorPath>,
    headers: HeaderMap,
) -> Response {
    let ctx = match layout_scope(&state, &headers, &path).await {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    match state
        .editor
        .discard_draft(&ctx, &path.property_id, path.floor_no)
        .await
    {
        Ok(true) => ok(()),
        Ok(false) => not_found_error("draft"),
        Err(err) => editor_error(err),
    }
}

/// 切换格子选中状态
pub async fn toggle_cell(
    State(state): State<AppState>,
    Path(path): Path<FloorPath>,
    headers: HeaderMap,
    Json(req): Json<CellRequest>,
) -> Response {
    let ctx = match layout_scope(&state, &headers, &path).await {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let result = state
        .editor
        .toggle_cell(&ctx, &path.property_id, path.floor_no, req.cell)
        .await;
    draft_response(&state, result)
}

/// 选中格子（已选中时不变）
pub async fn add_cell(
    State(state): State<AppState>,
    Path(path): Path<FloorPath>,
    headers: HeaderMap,
    Json(req): Json<CellRequest>,
) -> Response {
    let ctx = match layout_scope(&state, &headers, &path).await {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let result = state
        .editor
        .add_cell(&ctx, &path.property_id, path.floor_no, req.cell)
        .await;
    draft_response(&state, result)
}

/// 取消选中格子（未选中时不变）
pub async fn remove_cell(
    State(state): State<AppState>,
    Path(path): Path<FloorPath>,
    headers: HeaderMap,
    Json(req): Json<CellRequest>,
) -> Response {
    let ctx = match layout_scope(&state, &headers, &path).await {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let result = state
        .editor
        .remove_cell(&ctx, &path.property_id, path.floor_no, req.cell)
        .await;
    draft_response(&state, result)
}

/// 清空选区
pub async fn clear_cells(
    State(state): State<AppState>,
    Path(path): Path<FloorPath>,
    headers: HeaderMap,
) -> Response {
    let ctx = match layout_scope(&state, &headers, &path).await {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let result = state
        .editor
        .clear_cells(&ctx, &path.property_id, path.floor_no)
        .await;
    draft_response(&state, result)
}

/// 修改布局形状与创建方式
pub async fn set_layout_type(
    State(state): State<AppState>,
    Path(path): Path<FloorPath>,
    headers: HeaderMap,
    Json(req): Json<LayoutTypeRequest>,
) -> Response {
    let ctx = match layout_scope(&state, &headers, &path).await {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let layout_type = match parse_field::<LayoutType>(&req.layout_type) {
        Ok(value) => value,
        Err(response) => return response,
    };
    let creation_method = match parse_optional::<CreationMethod>(req.creation_method.as_deref()) {
        Ok(value) => value,
        Err(response) => return response,
    };
    let result = state
        .editor
        .set_layout_type(
            &ctx,
            &path.property_id,
            path.floor_no,
            layout_type,
            creation_method,
        )
        .await;
    draft_response(&state, result)
}

/// 保存草稿
pub async fn save_draft(
    State(state): State<AppState>,
    Path(path): Path<FloorPath>,
    headers: HeaderMap,
    body: Option<Json<SaveDraftRequest>>,
) -> Response {
    let ctx = match layout_scope(&state, &headers, &path).await {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let req = body.map(|Json(req)| req).unwrap_or_default();
    let options = match save_options_from_request(req, state.settings.require_units_on_save) {
        Ok(options) => options,
        Err(response) => return response,
    };
    match state
        .editor
        .save_draft(&ctx, &path.property_id, path.floor_no, options)
        .await
    {
        Ok(record) => ok(floor_to_dto(record)),
        Err(err) => editor_error(err),
    }
}
