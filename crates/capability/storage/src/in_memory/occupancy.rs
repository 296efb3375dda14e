//! 入住记录内存存储实现

use crate::error::StorageError;
use crate::models::OccupancyRecord;
use crate::traits::OccupancyStore;
use crate::validation::ensure_property_scope;
use domain::TenantContext;
use std::sync::RwLock;

/// 入住记录内存存储
///
/// 保持插入顺序，叠加计算按此顺序取第一条匹配。
#[derive(Default)]
pub struct InMemoryOccupancyStore {
    records: RwLock<Vec<OccupancyRecord>>,
}

impl InMemoryOccupancyStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl OccupancyStore for InMemoryOccupancyStore {
    async fn list_occupancies(
        &self,
        ctx: &TenantContext,
        property_id: &str,
        floor_number: Option<u32>,
    ) -> Result<Vec<OccupancyRecord>, StorageError> {
        ensure_property_scope(ctx, property_id)?;
        let records = self
            .records
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(records
            .iter()
            .filter(|record| record.tenant_id == ctx.tenant_id && record.property_id == property_id)
            .filter(|record| floor_number.is_none_or(|floor| record.floor_number == floor))
            .cloned()
            .collect())
    }

    async fn create_occupancy(
        &self,
        ctx: &TenantContext,
        record: OccupancyRecord,
    ) -> Result<OccupancyRecord, StorageError> {
        ensure_property_scope(ctx, &record.property_id)?;
        if record.tenant_id != ctx.tenant_id {
            return Err(StorageError::new("tenant mismatch"));
        }
        let mut records = self
            .records
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        if records
            .iter()
            .any(|existing| existing.occupancy_id == record.occupancy_id)
        {
            return Err(StorageError::new("occupancy exists"));
        }
        records.push(record.clone());
        Ok(record)
    }

    async fn delete_occupancy(
        &self,
        ctx: &TenantContext,
        property_id: &str,
        occupancy_id: &str,
    ) -> Result<bool, StorageError> {
        ensure_property_scope(ctx, property_id)?;
        let mut records = self
            .records
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let before = records.len();
        records.retain(|record| {
            !(record.tenant_id == ctx.tenant_id
                && record.property_id == property_id
                && record.occupancy_id == occupancy_id)
        });
        Ok(records.len() != before)
    }
}
