//! Postgres 楼层布局存储实现
//!
//! 布局元数据存于 `floor_layouts`，单元存于 `floor_units`（`position` 为选区顺序）。
//! 保存时在同一事务内删除旧单元并写入新单元。

use super::{to_i32, to_u32};
use crate::error::StorageError;
use crate::models::FloorLayoutRecord;
use crate::traits::FloorLayoutStore;
use crate::validation::ensure_property_scope;
use domain::{TenantContext, UnitRecord, UnitStatus, Utilities};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

pub struct PgFloorLayoutStore {
    pub pool: PgPool,
}

impl PgFloorLayoutStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool = crate::connection::connect_pool(database_url).await?;
        Ok(Self { pool })
    }

    async fn load_units(
        &self,
        tenant_id: &str,
        property_id: &str,
        floor_no: u32,
    ) -> Result<Vec<UnitRecord>, StorageError> {
        let rows = sqlx::query(
            "select svg_id, svg_geom, unit_name, floor_no, area_sqm, bedrooms, status, \
             rent_amount, payment_frequency, electricity, water, wifi \
             from floor_units where tenant_id = $1 and property_id = $2 and floor_no = $3 \
             order by position asc",
        )
        .bind(tenant_id)
        .bind(property_id)
        .bind(to_i32(floor_no, "floor_no")?)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(unit_from_row).collect()
    }

    async fn floor_from_row(&self, row: &PgRow) -> Result<FloorLayoutRecord, StorageError> {
        let tenant_id: String = row.try_get("tenant_id")?;
        let property_id: String = row.try_get("property_id")?;
        let floor_no = to_u32(row.try_get("floor_no")?, "floor_no")?;
        let units = self.load_units(&tenant_id, &property_id, floor_no).await?;
        Ok(FloorLayoutRecord {
            units_total: to_u32(row.try_get("units_total")?, "units_total")?,
            layout_type: row.try_get("layout_type")?,
            creation_method: row.try_get("creation_method")?,
            layout_data: row.try_get("layout_data")?,
            updated_at_ms: row.try_get("updated_at_ms")?,
            tenant_id,
            property_id,
            floor_no,
            units,
        })
    }
}

fn unit_from_row(row: &PgRow) -> Result<UnitRecord, StorageError> {
    let status: String = row.try_get("status")?;
    let payment_frequency: String = row.try_get("payment_frequency")?;
    Ok(UnitRecord {
        svg_id: to_u32(row.try_get("svg_id")?, "svg_id")?,
        svg_geom: row.try_get("svg_geom")?,
        unit_name: row.try_get("unit_name")?,
        floor_number: to_u32(row.try_get("floor_no")?, "floor_no")?,
        area_sqm: row.try_get("area_sqm")?,
        bedrooms: to_u32(row.try_get("bedrooms")?, "bedrooms")?,
        status: status.parse::<UnitStatus>()?,
        rent_amount: row.try_get("rent_amount")?,
        payment_frequency: payment_frequency.parse()?,
        utilities: Utilities {
            electricity: row.try_get("electricity")?,
            water: row.try_get("water")?,
            wifi: row.try_get("wifi")?,
        },
    })
}

#[async_trait::async_trait]
impl FloorLayoutStore for PgFloorLayoutStore {
    async fn list_floors(
        &self,
        ctx: &TenantContext,
        property_id: &str,
    ) -> Result<Vec<FloorLayoutRecord>, StorageError> {
        ensure_property_scope(ctx, property_id)?;
        let rows = sqlx::query(
            "select tenant_id, property_id, floor_no, units_total, layout_type, \
             creation_method, layout_data, updated_at_ms \
             from floor_layouts where tenant_id = $1 and property_id = $2 \
             order by floor_no asc",
        )
        .bind(&ctx.tenant_id)
        .bind(property_id)
        .fetch_all(&self.pool)
        .await?;
        let mut floors = Vec::with_capacity(rows.len());
        for row in &rows {
            floors.push(self.floor_from_row(row).await?);
        }
        Ok(floors)
    }

    async fn find_floor(
        &self,
        ctx: &TenantContext,
        property_id: &str,
        floor_no: u32,
    ) -> Result<Option<FloorLayoutRecord>, StorageError> {
        ensure_property_scope(ctx, property_id)?;
        let row = sqlx::query(
            "select tenant_id, property_id, floor_no, units_total, layout_type, \
             creation_method, layout_data, updated_at_ms \
             from floor_layouts where tenant_id = $1 and property_id = $2 and floor_no = $3",
        )
        .bind(&ctx.tenant_id)
        .bind(property_id)
        .bind(to_i32(floor_no, "floor_no")?)
        .fetch_optional(&self.pool)
        .await?;
        match row {
            Some(row) => Ok(Some(self.floor_from_row(&row).await?)),
            None => Ok(None),
        }
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
        let floor_no = to_i32(record.floor_no, "floor_no")?;
        let mut tx = self.pool.begin().await?;
        sqlx::query(
            "insert into floor_layouts \
             (tenant_id, property_id, floor_no, units_total, layout_type, creation_method, \
              layout_data, updated_at_ms) \
             values ($1, $2, $3, $4, $5, $6, $7, $8) \
             on conflict (tenant_id, property_id, floor_no) do update set \
             units_total = excluded.units_total, layout_type = excluded.layout_type, \
             creation_method = excluded.creation_method, layout_data = excluded.layout_data, \
             updated_at_ms = excluded.updated_at_ms",
        )
        .bind(&record.tenant_id)
        .bind(&record.property_id)
        .bind(floor_no)
        .bind(to_i32(record.units_total, "units_total")?)
        .bind(&record.layout_type)
        .bind(&record.creation_method)
        .bind(&record.layout_data)
        .bind(record.updated_at_ms)
        .execute(&mut *tx)
        .await?;
        sqlx::query(
            "delete from floor_units where tenant_id = $1 and property_id = $2 and floor_no = $3",
        )
        .bind(&record.tenant_id)
        .bind(&record.property_id)
        .bind(floor_no)
        .execute(&mut *tx)
        .await?;
        for (position, unit) in record.units.iter().enumerate() {
            sqlx::query(
                "insert into floor_units \
                 (tenant_id, property_id, floor_no, svg_id, position, svg_geom, unit_name, \
                  area_sqm, bedrooms, status, rent_amount, payment_frequency, \
                  electricity, water, wifi) \
                 values ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)",
            )
            .bind(&record.tenant_id)
            .bind(&record.property_id)
            .bind(floor_no)
            .bind(to_i32(unit.svg_id, "svg_id")?)
            .bind(position as i32)
            .bind(&unit.svg_geom)
            .bind(&unit.unit_name)
            .bind(unit.area_sqm)
            .bind(to_i32(unit.bedrooms, "bedrooms")?)
            .bind(unit.status.as_str())
            .bind(unit.rent_amount)
            .bind(unit.payment_frequency.as_str())
            .bind(unit.utilities.electricity)
            .bind(unit.utilities.water)
            .bind(unit.utilities.wifi)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(record)
    }

    async fn delete_floor(
        &self,
        ctx: &TenantContext,
        property_id: &str,
        floor_no: u32,
    ) -> Result<bool, StorageError> {
        ensure_property_scope(ctx, property_id)?;
        let floor_no = to_i32(floor_no, "floor_no")?;
        let mut tx = self.pool.begin().await?;
        sqlx::query(
            "delete from floor_units where tenant_id = $1 and property_id = $2 and floor_no = $3",
        )
        .bind(&ctx.tenant_id)
        .bind(property_id)
        .bind(floor_no)
        .execute(&mut *tx)
        .await?;
        let result = sqlx::query(
            "delete from floor_layouts where tenant_id = $1 and property_id = $2 and floor_no = $3",
        )
        .bind(&ctx.tenant_id)
        .bind(property_id)
        .bind(floor_no)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn update_unit(
        &self,
        ctx: &TenantContext,
        property_id: &str,
        floor_no: u32,
        unit: UnitRecord,
    ) -> Result<bool, StorageError> {
        ensure_property_scope(ctx, property_id)?;
        let result = sqlx::query(
            "update floor_units set unit_name = $5, area_sqm = $6, bedrooms = $7, status = $8, \
             rent_amount = $9, payment_frequency = $10, electricity = $11, water = $12, wifi = $13 \
             where tenant_id = $1 and property_id = $2 and floor_no = $3 and svg_id = $4",
        )
        .bind(&ctx.tenant_id)
        .bind(property_id)
        .bind(to_i32(floor_no, "floor_no")?)
        .bind(to_i32(unit.svg_id, "svg_id")?)
        .bind(&unit.unit_name)
        .bind(unit.area_sqm)
        .bind(to_i32(unit.bedrooms, "bedrooms")?)
        .bind(unit.status.as_str())
        .bind(unit.rent_amount)
        .bind(unit.payment_frequency.as_str())
        .bind(unit.utilities.electricity)
        .bind(unit.utilities.water)
        .bind(unit.utilities.wifi)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
