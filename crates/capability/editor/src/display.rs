//! 楼层与物业的入住/缴费展示。

use crate::error::EditorError;
use domain::{OccupancyFact, TenantContext};
use pms_layout::{FloorDisplayState, PropertyOccupancy, resolve_display, summarize_property};
use pms_storage::{FloorLayoutStore, OccupancyStore, PropertyStore};
use pms_telemetry::record_display_resolved;
use std::sync::Arc;
use tracing::info;

/// 单个楼层的展示结果。
#[derive(Debug, Clone, PartialEq)]
pub struct FloorDisplay {
    pub floor_no: u32,
    pub layout_data: String,
    pub state: FloorDisplayState,
}

/// 物业所有楼层的展示与汇总。
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDisplay {
    pub property_id: String,
    pub floors: Vec<FloorDisplay>,
    pub summary: PropertyOccupancy,
}

/// 展示服务：每次请求重新计算，不缓存。
pub struct FloorDisplayService {
    properties: Arc<dyn PropertyStore>,
    floors: Arc<dyn FloorLayoutStore>,
    occupancies: Arc<dyn OccupancyStore>,
}

impl FloorDisplayService {
    pub fn new(
        properties: Arc<dyn PropertyStore>,
        floors: Arc<dyn FloorLayoutStore>,
        occupancies: Arc<dyn OccupancyStore>,
    ) -> Self {
        Self {
            properties,
            floors,
            occupancies,
        }
    }

    pub async fn floor_display(
        &self,
        ctx: &TenantContext,
        property_id: &str,
        floor_no: u32,
    ) -> Result<FloorDisplay, EditorError> {
        let floor = self
            .floors
            .find_floor(ctx, property_id, floor_no)
            .await?
            .ok_or(EditorError::NotFound("floor"))?;
        // svg_id 只在楼层内唯一，只取本楼层的入住记录
        let facts: Vec<OccupancyFact> = self
            .occupancies
            .list_occupancies(ctx, property_id, Some(floor_no))
            .await?
            .iter()
            .map(|record| record.to_fact())
            .collect();
        let state = resolve_display(&floor.units, &facts);
        record_display_resolved();
        info!(
            target: "pms.editor",
            tenant_id = %ctx.tenant_id,
            property_id = %property_id,
            floor_no,
            occupied = state.occupied_count,
            total = state.total_units,
            "floor_display_resolved"
        );
        Ok(FloorDisplay {
            floor_no,
            layout_data: floor.layout_data,
            state,
        })
    }

    pub async fn property_display(
        &self,
        ctx: &TenantContext,
        property_id: &str,
    ) -> Result<PropertyDisplay, EditorError> {
        if self.properties.find_property(ctx, property_id).await?.is_none() {
            return Err(EditorError::NotFound("property"));
        }
        let floors = self.floors.list_floors(ctx, property_id).await?;
        let facts: Vec<OccupancyFact> = self
            .occupancies
            .list_occupancies(ctx, property_id, None)
            .await?
            .iter()
            .map(|record| record.to_fact())
            .collect();
        let displays: Vec<FloorDisplay> = floors
            .into_iter()
            .map(|floor| {
                let floor_facts: Vec<OccupancyFact> = facts
                    .iter()
                    .filter(|fact| fact.floor_number == Some(floor.floor_no))
                    .cloned()
                    .collect();
                FloorDisplay {
                    floor_no: floor.floor_no,
                    state: resolve_display(&floor.units, &floor_facts),
                    layout_data: floor.layout_data,
                }
            })
            .collect();
        let states: Vec<FloorDisplayState> =
            displays.iter().map(|display| display.state.clone()).collect();
        let summary = summarize_property(&states);
        record_display_resolved();
        Ok(PropertyDisplay {
            property_id: property_id.to_string(),
            floors: displays,
            summary,
        })
    }
}
