//! 入住叠加展示 handlers
//!
//! - GET /properties/{id}/floors/{floor_no}/display - 楼层单元缴费状态与入住率
//! - GET /properties/{id}/display - 物业全部楼层与汇总入住率
//!
//! 每次请求重新计算，不缓存。

use crate::AppState;
use crate::middleware::require_property_scope;
use crate::utils::response::{editor_error, ok};
use crate::utils::{floor_display_to_dto, property_display_to_dto};
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::Response,
};
use domain::permissions;

use super::floors::FloorPath;
use super::properties::PropertyPath;

/// 楼层展示
pub async fn floor_display(
    State(state): State<AppState>,
    Path(path): Path<FloorPath>,
    headers: HeaderMap,
) -> Response {
    let ctx = match require_property_scope(
        &state,
        &headers,
        &path.property_id,
        permissions::OCCUPANCY_READ,
    )
    .await
    {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    match state
        .display
        .floor_display(&ctx, &path.property_id, path.floor_no)
        .await
    {
        Ok(display) => ok(floor_display_to_dto(display)),
        Err(err) => editor_error(err),
    }
}

/// 物业展示
pub async fn property_display(
    State(state): State<AppState>,
    Path(path): Path<PropertyPath>,
    headers: HeaderMap,
) -> Response {
    let ctx = match require_property_scope(
        &state,
        &headers,
        &path.property_id,
        permissions::OCCUPANCY_READ,
    )
    .await
    {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    match state
        .display
        .property_display(&ctx, &path.property_id)
        .await
    {
        Ok(display) => ok(property_display_to_dto(display)),
        Err(err) => editor_error(err),
    }
}
