//! 楼层布局内存存储实现
//!
//! 以 (租户, 物业, 楼层号) 为键，整条记录替换，天然原子。

use crate::error::StorageError;
use crate::models::FloorLayoutRecord;
use crate::traits::FloorLayoutStore;
use crate::validation::ensure_property_scope;
use domain::{TenantContext, UnitRecord};
use std::collections::BTreeMap;
use std::sync::RwLock;

type FloorKey = (String, String, u32);

/// 楼层布局内存存储
#[derive(Default)]
pub struct InMemoryFloorLayoutStore {
    floors: RwLock<BTreeMap<FloorKey, FloorLayoutRecord>>,
}

impl InMemoryFloorLayoutStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn floor_key(ctx: &TenantContext, property_id: &str, floor_no: u32) -> FloorKey {
    (ctx.tenant_id.clone(), property_id.to_string(), floor_no)
}

#[async_trait::async_trait]
impl FloorLayoutStore for InMemoryFloorLayoutStore {
    async fn list_floors(
        &self,
        ctx: &TenantContext,
        property_id: &str,
    ) -> Result<Vec<FloorLayoutRecord>, StorageError> {
        ensure_property_scope(ctx, property_id)?;
        let map = self
            .floors
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        // BTreeMap 键序即楼层号升序
        Ok(map
            .iter()
            .filter(|((tenant_id, property, _), _)| {
                *tenant_id == ctx.tenant_id && property == property_id
            })
            .map(|(_, record)| record.clone())
            .collect())
    }

    async fn find_floor(
        &self,
        ctx: &TenantContext,
        property_id: &str,
        floor_no: u32,
    ) -> Result<Option<FloorLayoutRecord>, StorageError> {
        ensure_property_scope(ctx, property_id)?;
        let map = self
            .floors
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(map.get(&floor_key(ctx, property_id, floor_no)).cloned())
    }

    async fn save_floor(
        &self,
        ctx: &TenantContext,
        record: FloorLayoutRecord,
    ) -> Result<FloorLayoutRecord, StorageError> {
        ensure_property_scope(ctx, &record.property_id)?;
        if record.tenant_id != ctx.tenant_id {
            return Err(StorageError::new("tenant mismatch"));
        }
        let mut map = self
            .floors
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        map.insert(
            floor_key(ctx, &record.property_id, record.floor_no),
            record.clone(),
        );
        Ok(record)
    }

    async fn delete_floor(
        &self,
        ctx: &TenantContext,
        property_id: &str,
        floor_no: u32,
    ) -> Result<bool, StorageError> {
        ensure_property_scope(ctx, property_id)?;
        let mut map = self
            .floors
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(map.remove(&floor_key(ctx, property_id, floor_no)).is_some())
    }

    async fn update_unit(
        &self,
        ctx: &TenantContext,
        property_id: &str,
        floor_no: u32,
        unit: UnitRecord,
    ) -> Result<bool, StorageError> {
        ensure_property_scope(ctx, property_id)?;
        let mut map = self
            .floors
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let Some(record) = map.get_mut(&floor_key(ctx, property_id, floor_no)) else {
            return Ok(false);
        };
        let Some(slot) = record
            .units
            .iter_mut()
            .find(|existing| existing.svg_id == unit.svg_id)
        else {
            return Ok(false);
        };
        *slot = unit;
        record.updated_at_ms = crate::connection::now_epoch_ms();
        Ok(true)
    }
}
