//! Postgres 物业存储实现

use super::to_i32;
use super::to_u32;
use crate::error::StorageError;
use crate::models::{PropertyRecord, PropertyUpdate};
use crate::traits::PropertyStore;
use crate::validation::{ensure_property_scope, ensure_tenant};
use domain::TenantContext;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

pub struct PgPropertyStore {
    pub pool: PgPool,
}

impl PgPropertyStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool = crate::connection::connect_pool(database_url).await?;
        Ok(Self { pool })
    }
}

fn property_from_row(row: &PgRow) -> Result<PropertyRecord, StorageError> {
    Ok(PropertyRecord {
        property_id: row.try_get("property_id")?,
        tenant_id: row.try_get("tenant_id")?,
        name: row.try_get("name")?,
        address: row.try_get("address")?,
        grid_rows: to_u32(row.try_get("grid_rows")?, "grid_rows")?,
        grid_cols: to_u32(row.try_get("grid_cols")?, "grid_cols")?,
    })
}

#[async_trait::async_trait]
impl PropertyStore for PgPropertyStore {
    async fn list_properties(
        &self,
        ctx: &TenantContext,
    ) -> Result<Vec<PropertyRecord>, StorageError> {
        ensure_tenant(ctx)?;
        let rows = sqlx::query(
            "select property_id, tenant_id, name, address, grid_rows, grid_cols \
             from properties where tenant_id = $1 \
             and ($2::text is null or property_id = $2) \
             order by property_id asc",
        )
        .bind(&ctx.tenant_id)
        .bind(ctx.property_scope.as_deref())
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(property_from_row).collect()
    }

    async fn find_property(
        &self,
        ctx: &TenantContext,
        property_id: &str,
    ) -> Result<Option<PropertyRecord>, StorageError> {
        ensure_property_scope(ctx, property_id)?;
        let row = sqlx::query(
            "select property_id, tenant_id, name, address, grid_rows, grid_cols \
             from properties where tenant_id = $1 and property_id = $2",
        )
        .bind(&ctx.tenant_id)
        .bind(property_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(property_from_row).transpose()
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
        sqlx::query(
            "insert into properties (property_id, tenant_id, name, address, grid_rows, grid_cols) \
             values ($1, $2, $3, $4, $5, $6)",
        )
        .bind(&record.property_id)
        .bind(&record.tenant_id)
        .bind(&record.name)
        .bind(&record.address)
        .bind(to_i32(record.grid_rows, "grid_rows")?)
        .bind(to_i32(record.grid_cols, "grid_cols")?)
        .execute(&self.pool)
        .await?;
        Ok(record)
    }

    async fn update_property(
        &self,
        ctx: &TenantContext,
        property_id: &str,
        update: PropertyUpdate,
    ) -> Result<Option<PropertyRecord>, StorageError> {
        ensure_property_scope(ctx, property_id)?;
        let row = sqlx::query(
            "update properties set name = coalesce($3, name), address = coalesce($4, address) \
             where tenant_id = $1 and property_id = $2 \
             returning property_id, tenant_id, name, address, grid_rows, grid_cols",
        )
        .bind(&ctx.tenant_id)
        .bind(property_id)
        .bind(update.name)
        .bind(update.address)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(property_from_row).transpose()
    }

    async fn delete_property(
        &self,
        ctx: &TenantContext,
        property_id: &str,
    ) -> Result<bool, StorageError> {
        ensure_property_scope(ctx, property_id)?;
        let result = sqlx::query("delete from properties where tenant_id = $1 and property_id = $2")
            .bind(&ctx.tenant_id)
            .bind(property_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn property_belongs_to_tenant(
        &self,
        ctx: &TenantContext,
        property_id: &str,
    ) -> Result<bool, StorageError> {
        ensure_tenant(ctx)?;
        let exists: Option<i32> = sqlx::query_scalar(
            "select 1 from properties where tenant_id = $1 and property_id = $2",
        )
        .bind(&ctx.tenant_id)
        .bind(property_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(exists.is_some())
    }
}
