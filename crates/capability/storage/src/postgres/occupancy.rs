//! Postgres 入住记录存储实现
//!
//! 列表按创建时间升序返回，叠加计算按此顺序取第一条匹配。

use super::{to_i32, to_u32};
use crate::error::StorageError;
use crate::models::OccupancyRecord;
use crate::traits::OccupancyStore;
use crate::validation::ensure_property_scope;
use domain::{PaymentStatus, TenantContext};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

pub struct PgOccupancyStore {
    pub pool: PgPool,
}

impl PgOccupancyStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool = crate::connection::connect_pool(database_url).await?;
        Ok(Self { pool })
    }
}

fn occupancy_from_row(row: &PgRow) -> Result<OccupancyRecord, StorageError> {
    let unit_id: Option<i32> = row.try_get("unit_id")?;
    let payment_status: Option<String> = row.try_get("payment_status")?;
    Ok(OccupancyRecord {
        occupancy_id: row.try_get("occupancy_id")?,
        tenant_id: row.try_get("tenant_id")?,
        property_id: row.try_get("property_id")?,
        floor_number: to_u32(row.try_get("floor_number")?, "floor_number")?,
        unit_id: unit_id.map(|value| to_u32(value, "unit_id")).transpose()?,
        unit_name: row.try_get("unit_name")?,
        tenant_ref: row.try_get("tenant_ref")?,
        rent_amount: row.try_get("rent_amount")?,
        payment_status: payment_status
            .map(|value| value.parse::<PaymentStatus>())
            .transpose()?,
    })
}

#[async_trait::async_trait]
impl OccupancyStore for PgOccupancyStore {
    async fn list_occupancies(
        &self,
        ctx: &TenantContext,
        property_id: &str,
        floor_number: Option<u32>,
    ) -> Result<Vec<OccupancyRecord>, StorageError> {
        ensure_property_scope(ctx, property_id)?;
        let floor_number = floor_number
            .map(|value| to_i32(value, "floor_number"))
            .transpose()?;
        let rows = sqlx::query(
            "select occupancy_id, tenant_id, property_id, floor_number, unit_id, unit_name, \
             tenant_ref, rent_amount, payment_status \
             from occupancies where tenant_id = $1 and property_id = $2 \
             and ($3::integer is null or floor_number = $3) \
             order by created_at_ms asc, occupancy_id asc",
        )
        .bind(&ctx.tenant_id)
        .bind(property_id)
        .bind(floor_number)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(occupancy_from_row).collect()
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
        sqlx::query(
            "insert into occupancies \
             (occupancy_id, tenant_id, property_id, floor_number, unit_id, unit_name, \
              tenant_ref, rent_amount, payment_status, created_at_ms) \
             values ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(&record.occupancy_id)
        .bind(&record.tenant_id)
        .bind(&record.property_id)
        .bind(to_i32(record.floor_number, "floor_number")?)
        .bind(
            record
                .unit_id
                .map(|value| to_i32(value, "unit_id"))
                .transpose()?,
        )
        .bind(&record.unit_name)
        .bind(&record.tenant_ref)
        .bind(record.rent_amount)
        .bind(record.payment_status.map(|status| status.as_str()))
        .bind(crate::connection::now_epoch_ms())
        .execute(&self.pool)
        .await?;
        Ok(record)
    }

    async fn delete_occupancy(
        &self,
        ctx: &TenantContext,
        property_id: &str,
        occupancy_id: &str,
    ) -> Result<bool, StorageError> {
        ensure_property_scope(ctx, property_id)?;
        let result = sqlx::query(
            "delete from occupancies \
             where tenant_id = $1 and property_id = $2 and occupancy_id = $3",
        )
        .bind(&ctx.tenant_id)
        .bind(property_id)
        .bind(occupancy_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
