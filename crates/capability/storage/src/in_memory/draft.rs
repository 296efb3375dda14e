//! 编辑草稿内存存储实现（无过期）

use crate::error::StorageError;
use crate::models::DraftRecord;
use crate::traits::DraftStore;
use crate::validation::ensure_property_scope;
use domain::TenantContext;
use std::collections::HashMap;
use std::sync::RwLock;

type DraftKey = (String, String, u32);

/// 编辑草稿内存存储
#[derive(Default)]
pub struct InMemoryDraftStore {
    drafts: RwLock<HashMap<DraftKey, DraftRecord>>,
}

impl InMemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl DraftStore for InMemoryDraftStore {
    async fn get_draft(
        &self,
        ctx: &TenantContext,
        property_id: &str,
        floor_no: u32,
    ) -> Result<Option<DraftRecord>, StorageError> {
        ensure_property_scope(ctx, property_id)?;
        let map = self
            .drafts
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(map
            .get(&(ctx.tenant_id.clone(), property_id.to_string(), floor_no))
            .cloned())
    }

    async fn put_draft(&self, ctx: &TenantContext, record: DraftRecord) -> Result<(), StorageError> {
        ensure_property_scope(ctx, &record.property_id)?;
        if record.tenant_id != ctx.tenant_id {
            return Err(StorageError::new("tenant mismatch"));
        }
        let mut map = self
            .drafts
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        map.insert(
            (
                record.tenant_id.clone(),
                record.property_id.clone(),
                record.floor_no,
            ),
            record,
        );
        Ok(())
    }

    async fn delete_draft(
        &self,
        ctx: &TenantContext,
        property_id: &str,
        floor_no: u32,
    ) -> Result<bool, StorageError> {
        ensure_property_scope(ctx, property_id)?;
        let mut map = self
            .drafts
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(map
            .remove(&(ctx.tenant_id.clone(), property_id.to_string(), floor_no))
            .is_some())
    }

    async fn delete_property_drafts(
        &self,
        ctx: &TenantContext,
        property_id: &str,
    ) -> Result<usize, StorageError> {
        ensure_property_scope(ctx, property_id)?;
        let mut map = self
            .drafts
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let before = map.len();
        map.retain(|(tenant_id, draft_property, _), _| {
            !(*tenant_id == ctx.tenant_id && draft_property == property_id)
        });
        Ok(before - map.len())
    }
}
