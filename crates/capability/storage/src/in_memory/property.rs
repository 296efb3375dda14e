//! 物业内存存储实现
//!
//! 内置默认物业（property-1，8x8 网格）。

use crate::error::StorageError;
use crate::models::{PropertyRecord, PropertyUpdate};
use crate::traits::PropertyStore;
use crate::validation::{ensure_property_scope, ensure_tenant};
use domain::TenantContext;
use std::collections::HashMap;
use std::sync::RwLock;

/// 物业内存存储
pub struct InMemoryPropertyStore {
    properties: RwLock<HashMap<String, PropertyRecord>>,
}

impl InMemoryPropertyStore {
    pub fn new() -> Self {
        Self {
            properties: RwLock::new(HashMap::new()),
        }
    }

    /// 创建包含默认物业的存储。
    pub fn with_default_property() -> Self {
        let mut properties = HashMap::new();
        properties.insert(
            "property-1".to_string(),
            PropertyRecord {
                property_id: "property-1".to_string(),
                tenant_id: "tenant-1".to_string(),
                name: "Default Property".to_string(),
                address: None,
                grid_rows: 8,
                grid_cols: 8,
            },
        );
        Self {
            properties: RwLock::new(properties),
        }
    }
}

impl Default for InMemoryPropertyStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl PropertyStore for InMemoryPropertyStore {
    async fn list_properties(
        &self,
        ctx: &TenantContext,
    ) -> Result<Vec<PropertyRecord>, StorageError> {
        ensure_tenant(ctx)?;
        let map = self
            .properties
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        let mut properties: Vec<PropertyRecord> = map
            .values()
            .filter(|property| property.tenant_id == ctx.tenant_id)
            .filter(|property| {
                ctx.property_scope
                    .as_deref()
                    .is_none_or(|scope| scope == property.property_id)
            })
            .cloned()
            .collect();
        properties.sort_by(|a, b| a.property_id.cmp(&b.property_id));
        Ok(properties)
    }

    async fn find_property(
        &self,
        ctx: &TenantContext,
        property_id: &str,
    ) -> Result<Option<PropertyRecord>, StorageError> {
        ensure_property_scope(ctx, property_id)?;
        let map = self
            .properties
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(map
            .get(property_id)
            .filter(|property| property.tenant_id == ctx.tenant_id)
            .cloned())
    }

    async fn create_property(
        &self,
        ctx: &TenantContext,
        record: PropertyRecord,
    ) -> Result<PropertyRecord, StorageError> {
        ensure_tenant(ctx)?;
        if record.tenant_id != ctx.tenant_id {
            return Err(StorageError::new("tenant mismatch"));
        }
        let mut map = self
            .properties
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        if map.contains_key(&record.property_id) {
            return Err(StorageError::new("property exists"));
        }
        map.insert(record.property_id.clone(), record.clone());
        Ok(record)
    }

    async fn update_property(
        &self,
        ctx: &TenantContext,
        property_id: &str,
        update: PropertyUpdate,
    ) -> Result<Option<PropertyRecord>, StorageError> {
        ensure_property_scope(ctx, property_id)?;
        let mut map = self
            .properties
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let Some(property) = map
            .get_mut(property_id)
            .filter(|property| property.tenant_id == ctx.tenant_id)
        else {
            return Ok(None);
        };
        if let Some(name) = update.name {
            property.name = name;
        }
        if let Some(address) = update.address {
            property.address = Some(address);
        }
        Ok(Some(property.clone()))
    }

    async fn delete_property(
        &self,
        ctx: &TenantContext,
        property_id: &str,
    ) -> Result<bool, StorageError> {
        ensure_property_scope(ctx, property_id)?;
        let mut map = self
            .properties
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        match map.get(property_id) {
            Some(property) if property.tenant_id == ctx.tenant_id => {
                map.remove(property_id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn property_belongs_to_tenant(
        &self,
        ctx: &TenantContext,
        property_id: &str,
    ) -> Result<bool, StorageError> {
        ensure_tenant(ctx)?;
        let map = self
            .properties
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(map
            .get(property_id)
            .is_some_and(|property| property.tenant_id == ctx.tenant_id))
    }
}
