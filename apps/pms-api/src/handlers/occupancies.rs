//! 入住记录 handlers
//!
//! - GET /properties/{id}/occupancies?floorNumber=n - 列出入住记录
//! - POST /properties/{id}/occupancies - 新增入住记录
//! - DELETE /properties/{id}/occupancies/{occupancy_id} - 删除入住记录
//!
//! 入住记录由外部缴费流程维护，布局核心只读取。

use crate::AppState;
use crate::middleware::require_property_scope;
use crate::utils::response::{bad_request_error, not_found_error, ok, storage_error};
use crate::utils::{ensure_non_negative, normalize_optional, normalize_required, occupancy_to_dto, parse_optional};
use api_contract::{CreateOccupancyRequest, OccupancyDto, OccupancyQuery};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::HeaderMap,
    response::Response,
};
use domain::permissions;
use pms_storage::OccupancyRecord;
use tracing::info;
use uuid::Uuid;

use super::properties::PropertyPath;

#[derive(serde::Deserialize)]
pub struct OccupancyPath {
    pub property_id: String,
    pub occupancy_id: String,
}

/// 列出入住记录
pub async fn list_occupancies(
    State(state): State<AppState>,
    Path(path): Path<PropertyPath>,
    Query(query): Query<OccupancyQuery>,
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
        .occupancy_store
        .list_occupancies(&ctx, &path.property_id, query.floor_number)
        .await
    {
        Ok(records) => {
            let data: Vec<OccupancyDto> = records.into_iter().map(occupancy_to_dto).collect();
            ok(data)
        }
        Err(err) => storage_error(err),
    }
}

/// 新增入住记录
pub async fn create_occupancy(
    State(state): State<AppState>,
    Path(path): Path<PropertyPath>,
    headers: HeaderMap,
    Json(req): Json<CreateOccupancyRequest>,
) -> Response {
    let ctx = match require_property_scope(
        &state,
        &headers,
        &path.property_id,
        permissions::OCCUPANCY_WRITE,
    )
    .await
    {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let tenant_ref = match normalize_required(req.tenant_ref, "tenantRef") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let unit_name = match normalize_optional(req.unit_name, "unitName") {
        Ok(value) => value,
        Err(response) => return response,
    };
    if req.unit_id.is_none() && unit_name.is_none() {
        return bad_request_error("unitId or unitName required");
    }
    if let Err(response) = ensure_non_negative(Some(req.rent_amount), "rentAmount") {
        return response;
    }
    let payment_status = match parse_optional(req.payment_status.as_deref()) {
        Ok(value) => value,
        Err(response) => return response,
    };
    let record = OccupancyRecord {
        occupancy_id: Uuid::new_v4().to_string(),
        tenant_id: ctx.tenant_id.clone(),
        property_id: path.property_id.clone(),
        floor_number: req.floor_number,
        unit_id: req.unit_id,
        unit_name,
        tenant_ref,
        rent_amount: req.rent_amount,
        payment_status,
    };
    match state.occupancy_store.create_occupancy(&ctx, record).await {
        Ok(record) => {
            info!(
                target: "pms.api",
                tenant_id = %ctx.tenant_id,
                property_id = %path.property_id,
                floor_no = record.floor_number,
                occupancy_id = %record.occupancy_id,
                "occupancy_created"
            );
            ok(occupancy_to_dto(record))
        }
        Err(err) => storage_error(err),
    }
}

/// 删除入住记录
pub async fn delete_occupancy(
    State(state): State<AppState>,
    Path(path): Path<OccupancyPath>,
    headers: HeaderMap,
) -> Response {
    let ctx = match require_property_scope(
        &state,
        &headers,
        &path.property_id,
        permissions::OCCUPANCY_WRITE,
    )
    .await
    {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    match state
        .occupancy_store
        .delete_occupancy(&ctx, &path.property_id, &path.occupancy_id)
        .await
    {
        Ok(true) => ok(()),
        Ok(false) => not_found_error("occupancy"),
        Err(err) => storage_error(err),
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::{landlord_token, memory_state, send, token_for};
    use axum::http::{Method, StatusCode};
    use domain::permissions;
    use serde_json::json;

    const OCCUPANCIES: &str = "/properties/property-1/occupancies";

    #[tokio::test]
    async fn create_list_filter_delete() {
        let state = memory_state();
        let token = landlord_token();
        for (floor, unit) in [(0, 1), (1, 1)] {
            let (status, _) = send(
                &state,
                Method::POST,
                OCCUPANCIES,
                Some(&token),
                Some(json!({"floorNumber": floor, "unitId": unit, "tenantRef": "t-1"})),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }

        let (_, body) = send(&state, Method::GET, OCCUPANCIES, Some(&token), None).await;
        assert_eq!(body["data"].as_array().expect("list").len(), 2);

        let (_, body) = send(
            &state,
            Method::GET,
            &format!("{OCCUPANCIES}?floorNumber=1"),
            Some(&token),
            None,
        )
        .await;
        let list = body["data"].as_array().expect("list");
        assert_eq!(list.len(), 1);
        let occupancy_id = list[0]["occupancyId"].as_str().expect("id").to_string();

        let uri = format!("{OCCUPANCIES}/{occupancy_id}");
        let (status, _) = send(&state, Method::DELETE, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&state, Method::DELETE, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn create_validates_input() {
        let state = memory_state();
        let token = landlord_token();
        let cases = [
            json!({"floorNumber": 0, "tenantRef": "t-1"}),
            json!({"floorNumber": 0, "unitId": 1, "tenantRef": "  "}),
            json!({"floorNumber": 0, "unitId": 1, "tenantRef": "t-1", "paymentStatus": "late"}),
            json!({"floorNumber": 0, "unitId": 1, "tenantRef": "t-1", "rentAmount": -5.0}),
        ];
        for body in cases {
            let (status, _) =
                send(&state, Method::POST, OCCUPANCIES, Some(&token), Some(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn reading_requires_occupancy_permission() {
        let state = memory_state();
        let token = token_for(&[permissions::PROPERTY_READ], None);
        let (status, _) = send(&state, Method::GET, OCCUPANCIES, Some(&token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}
