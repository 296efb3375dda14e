//! 楼层布局 handlers
//!
//! - GET /properties/{id}/floors - 楼层列表（按楼层号升序）
//! - GET /properties/{id}/floors/{floor_no} - 已保存布局（可直接用于重建选区）
//! - PUT /properties/{id}/floors/{floor_no} - 直接保存布局载荷（服务端校验并重新生成几何）
//! - DELETE /properties/{id}/floors/{floor_no} - 删除楼层
//! - PUT /properties/{id}/floors/{floor_no}/units/{svg_id} - 修改单个单元
//!
//! 楼层号在接口中均为 0 起。

use crate::AppState;
use crate::middleware::require_property_scope;
use crate::utils::response::{editor_error, not_found_error, ok};
use crate::utils::{
    floor_payload_from_dto, floor_summary_to_dto, floor_to_dto, unit_patch_from_request,
    unit_to_dto,
};
use api_contract::{FloorDto, FloorSummaryDto, UpdateUnitRequest};
use axum::{
    Json,
    extract::{Path, State},
    http::HeaderMap,
    response::Response,
};
use domain::permissions;

use super::properties::PropertyPath;

#[derive(serde::Deserialize)]
pub struct FloorPath {
    pub property_id: String,
    pub floor_no: u32,
}

#[derive(serde::Deserialize)]
pub struct UnitPath {
    pub property_id: String,
    pub floor_no: u32,
    pub svg_id: u32,
}

/// 楼层列表
pub async fn list_floors(
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
    match state.editor.list_floors(&ctx, &path.property_id).await {
        Ok(floors) => {
            let data: Vec<FloorSummaryDto> =
                floors.into_iter().map(floor_summary_to_dto).collect();
            ok(data)
        }
        Err(err) => editor_error(err),
    }
}

/// 获取已保存楼层
pub async fn get_floor(
    State(state): State<AppState>,
    Path(path): Path<FloorPath>,
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
        .editor
        .find_floor(&ctx, &path.property_id, path.floor_no)
        .await
    {
        Ok(record) => ok(floor_to_dto(record)),
        Err(err) => editor_error(err),
    }
}

/// 直接保存楼层载荷
pub async fn put_floor(
    State(state): State<AppState>,
    Path(path): Path<FloorPath>,
    headers: HeaderMap,
    Json(req): Json<FloorDto>,
) -> Response {
    let ctx = match require_property_scope(
        &state,
        &headers,
        &path.property_id,
        permissions::LAYOUT_WRITE,
    )
    .await
    {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let payload = match floor_payload_from_dto(path.floor_no, req) {
        Ok(payload) => payload,
        Err(response) => return response,
    };
    match state
        .editor
        .store_floor(
            &ctx,
            &path.property_id,
            payload,
            state.settings.require_units_on_save,
        )
        .await
    {
        Ok(record) => ok(floor_to_dto(record)),
        Err(err) => editor_error(err),
    }
}

/// 删除楼层
pub async fn delete_floor(
    State(state): State<AppState>,
    Path(path): Path<FloorPath>,
    headers: HeaderMap,
) -> Response {
    let ctx = match require_property_scope(
        &state,
        &headers,
        &path.property_id,
        permissions::LAYOUT_WRITE,
    )
    .await
    {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    match state
        .editor
        .delete_floor(&ctx, &path.property_id, path.floor_no)
        .await
    {
        Ok(true) => ok(()),
        Ok(false) => not_found_error("floor"),
        Err(err) => editor_error(err),
    }
}

/// 修改单个单元（租金、状态等保存后单独调整的属性）
pub async fn update_unit(
    State(state): State<AppState>,
    Path(path): Path<UnitPath>,
    headers: HeaderMap,
    Json(req): Json<UpdateUnitRequest>,
) -> Response {
    let ctx = match require_property_scope(
        &state,
        &headers,
        &path.property_id,
        permissions::LAYOUT_WRITE,
    )
    .await
    {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let patch = match unit_patch_from_request(req) {
        Ok(patch) => patch,
        Err(response) => return response,
    };
    match state
        .editor
        .update_unit(&ctx, &path.property_id, path.floor_no, path.svg_id, patch)
        .await
    {
        Ok(unit) => ok(unit_to_dto(unit)),
        Err(err) => editor_error(err),
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::{landlord_token, memory_state, send, token_for};
    use axum::http::{Method, StatusCode};
    use domain::permissions;
    use serde_json::{Value, json};

    fn unit(svg_id: u32, name: &str) -> Value {
        json!({
            "svgId": svg_id,
            "floorNumber": 0,
            "unitName": name,
            "status": "vacant",
            "rentAmount": 700.0,
            "paymentFreq": "monthly"
        })
    }

    fn floor(units: Vec<Value>) -> Value {
        json!({
            "floorNo": 0,
            "unitsTotal": units.len(),
            "layoutType": "custom",
            "creationMethod": "upload",
            "layoutData": "",
            "units": units
        })
    }

    #[tokio::test]
    async fn put_floor_regenerates_geometry_and_keeps_order() {
        let state = memory_state();
        let token = landlord_token();
        let (status, body) = send(
            &state,
            Method::PUT,
            "/properties/property-1/floors/0",
            Some(&token),
            Some(floor(vec![unit(5, "East"), unit(2, "West")])),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let units = body["data"]["units"].as_array().expect("units");
        assert_eq!(units[0]["svgId"], 5);
        assert_eq!(units[0]["unitName"], "East");
        assert_eq!(units[1]["svgId"], 2);
        assert!(
            units[0]["svgGeom"]
                .as_str()
                .expect("geom")
                .contains(r#"id="cell-5""#)
        );
        assert!(
            body["data"]["layoutData"]
                .as_str()
                .expect("markup")
                .starts_with("<svg")
        );

        let (status, body) = send(
            &state,
            Method::GET,
            "/properties/property-1/floors",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"][0]["displayNo"], 1);
        assert_eq!(body["data"][0]["unitsTotal"], 2);
    }

    #[tokio::test]
    async fn put_floor_rejects_bad_payloads() {
        let state = memory_state();
        let token = landlord_token();
        let uri = "/properties/property-1/floors/0";

        let (status, body) = send(
            &state,
            Method::PUT,
            uri,
            Some(&token),
            Some(floor(vec![unit(64, "A1")])),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "LAYOUT.INVALID_CELL");

        let (status, body) = send(
            &state,
            Method::PUT,
            uri,
            Some(&token),
            Some(floor(vec![unit(1, "A1"), unit(2, "A1")])),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "LAYOUT.NAME_COLLISION");

        let (status, body) = send(&state, Method::PUT, uri, Some(&token), Some(floor(vec![]))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "LAYOUT.EMPTY_SELECTION");

        let mut mismatched = floor(vec![unit(1, "A1")]);
        mismatched["unitsTotal"] = json!(3);
        let (status, _) = send(&state, Method::PUT, uri, Some(&token), Some(mismatched)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&state, Method::GET, uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unit_update_and_floor_delete() {
        let state = memory_state();
        let token = landlord_token();
        send(
            &state,
            Method::PUT,
            "/properties/property-1/floors/0",
            Some(&token),
            Some(floor(vec![unit(1, "A1"), unit(2, "A2")])),
        )
        .await;

        let (status, body) = send(
            &state,
            Method::PUT,
            "/properties/property-1/floors/0/units/2",
            Some(&token),
            Some(json!({"rentAmount": 1250.0, "status": "reserved"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["rentAmount"], 1250.0);
        assert_eq!(body["data"]["status"], "reserved");

        let (status, _) = send(
            &state,
            Method::PUT,
            "/properties/property-1/floors/0/units/2",
            Some(&token),
            Some(json!({"unitName": "A1"})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = send(
            &state,
            Method::PUT,
            "/properties/property-1/floors/0/units/9",
            Some(&token),
            Some(json!({"bedrooms": 3})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &state,
            Method::DELETE,
            "/properties/property-1/floors/0",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(
            &state,
            Method::DELETE,
            "/properties/property-1/floors/0",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn read_only_token_cannot_write_layouts() {
        let state = memory_state();
        let token = token_for(&[permissions::PROPERTY_READ], None);
        let (status, _) = send(
            &state,
            Method::PUT,
            "/properties/property-1/floors/0",
            Some(&token),
            Some(floor(vec![unit(1, "A1")])),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}
