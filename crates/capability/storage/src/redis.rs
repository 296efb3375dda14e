//! Redis 编辑草稿存储
//!
//! 键：`tenant:{tenant}:property:{property}:floor:{floor_no}:draft`，
//! 每次写入刷新 TTL，过期即视为放弃编辑。

use crate::error::StorageError;
use crate::models::DraftRecord;
use crate::traits::DraftStore;
use crate::validation::ensure_property_scope;
use domain::TenantContext;
use redis::AsyncCommands;

#[derive(serde::Serialize, serde::Deserialize)]
struct DraftPayload {
    selected_cells: Vec<u32>,
    layout_type: String,
    creation_method: String,
    updated_at_ms: i64,
}

fn draft_key(tenant_id: &str, property_id: &str, floor_no: u32) -> String {
    format!("tenant:{tenant_id}:property:{property_id}:floor:{floor_no}:draft")
}

fn property_draft_pattern(tenant_id: &str, property_id: &str) -> String {
    format!("tenant:{tenant_id}:property:{property_id}:floor:*:draft")
}

/// Redis 编辑草稿存储
pub struct RedisDraftStore {
    client: redis::Client,
    ttl_seconds: u64,
}

impl RedisDraftStore {
    pub fn new(client: redis::Client, ttl_seconds: u64) -> Self {
        Self {
            client,
            ttl_seconds: ttl_seconds.max(1),
        }
    }

    pub fn connect(redis_url: &str, ttl_seconds: u64) -> Result<Self, StorageError> {
        let client = redis::Client::open(redis_url)?;
        Ok(Self::new(client, ttl_seconds))
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection, StorageError> {
        Ok(self.client.get_multiplexed_tokio_connection().await?)
    }
}

#[async_trait::async_trait]
impl DraftStore for RedisDraftStore {
    async fn get_draft(
        &self,
        ctx: &TenantContext,
        property_id: &str,
        floor_no: u32,
    ) -> Result<Option<DraftRecord>, StorageError> {
        ensure_property_scope(ctx, property_id)?;
        let mut connection = self.connection().await?;
        let data: Option<String> = connection
            .get(draft_key(&ctx.tenant_id, property_id, floor_no))
            .await?;
        let Some(data) = data else {
            return Ok(None);
        };
        let payload: DraftPayload = serde_json::from_str(&data)?;
        Ok(Some(DraftRecord {
            tenant_id: ctx.tenant_id.clone(),
            property_id: property_id.to_string(),
            floor_no,
            selected_cells: payload.selected_cells,
            layout_type: payload.layout_type,
            creation_method: payload.creation_method,
            updated_at_ms: payload.updated_at_ms,
        }))
    }

    async fn put_draft(&self, ctx: &TenantContext, record: DraftRecord) -> Result<(), StorageError> {
        ensure_property_scope(ctx, &record.property_id)?;
        if record.tenant_id != ctx.tenant_id {
            return Err(StorageError::new("tenant mismatch"));
        }
        let key = draft_key(&record.tenant_id, &record.property_id, record.floor_no);
        let payload = DraftPayload {
            selected_cells: record.selected_cells,
            layout_type: record.layout_type,
            creation_method: record.creation_method,
            updated_at_ms: record.updated_at_ms,
        };
        let data = serde_json::to_string(&payload)?;
        let mut connection = self.connection().await?;
        connection
            .set_ex::<_, _, ()>(key, data, self.ttl_seconds)
            .await?;
        Ok(())
    }

    async fn delete_draft(
        &self,
        ctx: &TenantContext,
        property_id: &str,
        floor_no: u32,
    ) -> Result<bool, StorageError> {
        ensure_property_scope(ctx, property_id)?;
        let mut connection = self.connection().await?;
        let removed: i64 = connection
            .del(draft_key(&ctx.tenant_id, property_id, floor_no))
            .await?;
        Ok(removed > 0)
    }

    async fn delete_property_drafts(
        &self,
        ctx: &TenantContext,
        property_id: &str,
    ) -> Result<usize, StorageError> {
        ensure_property_scope(ctx, property_id)?;
        let mut connection = self.connection().await?;
        let keys: Vec<String> = {
            let mut iter = connection
                .scan_match::<_, String>(property_draft_pattern(&ctx.tenant_id, property_id))
                .await?;
            let mut keys = Vec::new();
            while let Some(key) = iter.next_item().await {
                keys.push(key);
            }
            keys
        };
        if keys.is_empty() {
            return Ok(0);
        }
        let removed: i64 = connection.del(keys).await?;
        Ok(usize::try_from(removed).unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::{draft_key, property_draft_pattern};

    #[test]
    fn draft_key_is_scoped_by_tenant_property_and_floor() {
        assert_eq!(
            draft_key("tenant-1", "property-1", 3),
            "tenant:tenant-1:property:property-1:floor:3:draft"
        );
    }

    #[test]
    fn property_pattern_matches_every_floor_key() {
        let pattern = property_draft_pattern("tenant-1", "property-1");
        assert_eq!(pattern, "tenant:tenant-1:property:property-1:floor:*:draft");
        let (prefix, suffix) = pattern.split_once('*').expect("wildcard");
        let key = draft_key("tenant-1", "property-1", 12);
        assert!(key.starts_with(prefix) && key.ends_with(suffix));
    }
}
