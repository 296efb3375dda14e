//! 编辑会话：草稿的打开、选区编辑、预览与保存。

use crate::error::EditorError;
use crate::guard::{SaveGuard, SaveGuards};
use domain::{PaymentFrequency, TenantContext, UnitRecord, UnitStatus, Utilities};
use pms_layout::{
    CreationMethod, FloorLayout, FloorSavePayload, Grid, LayoutError, LayoutType, NamePolicy,
    PersistedFloor, SelectionSet, UnitDefaults, VectorLayout, ensure_unique_names, serialize,
};
use pms_storage::{
    DraftRecord, DraftStore, FloorLayoutRecord, FloorLayoutStore, PropertyStore, now_epoch_ms,
};
use pms_telemetry::{
    record_cell_edit, record_draft_opened, record_layout_saved, record_save_latency_ms,
    record_save_rejected_collision, record_save_rejected_empty, record_save_rejected_in_flight,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// 编辑服务配置。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorConfig {
    /// 序列化时每个格子的像素边长。
    pub cell_size_px: u32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self { cell_size_px: 60 }
    }
}

/// 保存选项。
#[derive(Debug, Clone, PartialEq)]
pub struct SaveOptions {
    pub defaults: UnitDefaults,
    pub name_policy: NamePolicy,
    /// 为 true 时拒绝保存空楼层。
    pub require_units: bool,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            defaults: UnitDefaults::default(),
            name_policy: NamePolicy::Preserve,
            require_units: true,
        }
    }
}

/// 单元的单独修改（保存之后）。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnitPatch {
    pub unit_name: Option<String>,
    pub area_sqm: Option<f64>,
    pub bedrooms: Option<u32>,
    pub status: Option<UnitStatus>,
    pub rent_amount: Option<f64>,
    pub payment_frequency: Option<PaymentFrequency>,
    pub utilities: Option<Utilities>,
}

impl UnitPatch {
    fn apply(self, unit: &mut UnitRecord) {
        if let Some(unit_name) = self.unit_name {
            unit.unit_name = unit_name;
        }
        if let Some(area_sqm) = self.area_sqm {
            unit.area_sqm = area_sqm;
        }
        if let Some(bedrooms) = self.bedrooms {
            unit.bedrooms = bedrooms;
        }
        if let Some(status) = self.status {
            unit.status = status;
        }
        if let Some(rent_amount) = self.rent_amount {
            unit.rent_amount = rent_amount;
        }
        if let Some(payment_frequency) = self.payment_frequency {
            unit.payment_frequency = payment_frequency;
        }
        if let Some(utilities) = self.utilities {
            unit.utilities = utilities;
        }
    }
}

/// 编辑中的楼层草稿。
#[derive(Debug, Clone, PartialEq)]
pub struct DraftSession {
    pub property_id: String,
    pub layout: FloorLayout,
    pub updated_at_ms: i64,
}

impl DraftSession {
    /// 当前选区的矢量预览。
    pub fn preview(&self, cell_size_px: u32) -> Result<VectorLayout, LayoutError> {
        serialize(&self.layout.selection, &self.layout.grid, cell_size_px)
    }

    fn to_record(&self, ctx: &TenantContext) -> DraftRecord {
        DraftRecord {
            tenant_id: ctx.tenant_id.clone(),
            property_id: self.property_id.clone(),
            floor_no: self.layout.floor_no,
            selected_cells: self.layout.selection.cells().to_vec(),
            layout_type: self.layout.layout_type.as_str().to_string(),
            creation_method: self.layout.creation_method.as_str().to_string(),
            updated_at_ms: self.updated_at_ms,
        }
    }

    fn from_record(record: DraftRecord, grid: Grid) -> Result<Self, EditorError> {
        let selection = SelectionSet::from_cells(record.selected_cells)?;
        let mut layout = FloorLayout::new(record.floor_no, grid).with_selection(selection)?;
        layout.layout_type = record.layout_type.parse()?;
        layout.creation_method = record.creation_method.parse()?;
        Ok(Self {
            property_id: record.property_id,
            layout,
            updated_at_ms: record.updated_at_ms,
        })
    }
}

/// 已保存楼层记录转为核心的持久化视图。
pub(crate) fn persisted_floor(record: &FloorLayoutRecord) -> Result<PersistedFloor, EditorError> {
    Ok(PersistedFloor {
        floor_no: record.floor_no,
        units_total: record.units_total,
        layout_type: record.layout_type.parse()?,
        creation_method: record.creation_method.parse()?,
        layout_data: record.layout_data.clone(),
        units: record.units.clone(),
    })
}

/// 楼层布局编辑服务。
///
/// 保存与删除楼层按 (租户, 物业, 楼层) 互斥；草稿编辑是读改写，
/// 同一草稿的并发编辑不串行化，后写入者覆盖先写入者，由调用方保证单写。
pub struct LayoutEditor {
    properties: Arc<dyn PropertyStore>,
    floors: Arc<dyn FloorLayoutStore>,
    drafts: Arc<dyn DraftStore>,
    guards: SaveGuards,
    config: EditorConfig,
}

impl LayoutEditor {
    pub fn new(
        properties: Arc<dyn PropertyStore>,
        floors: Arc<dyn FloorLayoutStore>,
        drafts: Arc<dyn DraftStore>,
        config: EditorConfig,
    ) -> Self {
        Self {
            properties,
            floors,
            drafts,
            guards: SaveGuards::new(),
            config,
        }
    }

    pub fn config(&self) -> EditorConfig {
        self.config
    }

    /// 物业的固定网格。
    pub async fn property_grid(
        &self,
        ctx: &TenantContext,
        property_id: &str,
    ) -> Result<Grid, EditorError> {
        let property = self
            .properties
            .find_property(ctx, property_id)
            .await?
            .ok_or(EditorError::NotFound("property"))?;
        Ok(Grid::new(property.grid_rows, property.grid_cols)?)
    }

    /// 打开编辑会话：已保存楼层按单元顺序重建选区，否则从空选区开始。
    ///
    /// 已有草稿会被覆盖。
    pub async fn open_draft(
        &self,
        ctx: &TenantContext,
        property_id: &str,
        floor_no: u32,
    ) -> Result<DraftSession, EditorError> {
        let grid = self.property_grid(ctx, property_id).await?;
        let layout = match self.floors.find_floor(ctx, property_id, floor_no).await? {
            Some(record) => FloorLayout::hydrate(&persisted_floor(&record)?, grid)?,
            None => FloorLayout::new(floor_no, grid),
        };
        let session = DraftSession {
            property_id: property_id.to_string(),
            layout,
            updated_at_ms: now_epoch_ms(),
        };
        self.drafts.put_draft(ctx, session.to_record(ctx)).await?;
        record_draft_opened();
        info!(
            target: "pms.editor",
            tenant_id = %ctx.tenant_id,
            property_id = %property_id,
            floor_no,
            actor = %ctx.user_id,
            cells = session.layout.selection.len(),
            "draft_opened"
        );
        Ok(session)
    }

    pub async fn get_draft(
        &self,
        ctx: &TenantContext,
        property_id: &str,
        floor_no: u32,
    ) -> Result<DraftSession, EditorError> {
        let grid = self.property_grid(ctx, property_id).await?;
        self.load_session(ctx, property_id, floor_no, grid).await
    }

    pub async fn toggle_cell(
        &self,
        ctx: &TenantContext,
        property_id: &str,
        floor_no: u32,
        cell: u32,
    ) -> Result<DraftSession, EditorError> {
        self.edit(ctx, property_id, floor_no, "toggle", move |grid, selection| {
            grid.check(cell)?;
            Ok(selection.toggle(cell))
        })
        .await
    }

    pub async fn add_cell(
        &self,
        ctx: &TenantContext,
        property_id: &str,
        floor_no: u32,
        cell: u32,
    ) -> Result<DraftSession, EditorError> {
        self.edit(ctx, property_id, floor_no, "add", move |grid, selection| {
            grid.check(cell)?;
            Ok(selection.add(cell))
        })
        .await
    }

    pub async fn remove_cell(
        &self,
        ctx: &TenantContext,
        property_id: &str,
        floor_no: u32,
        cell: u32,
    ) -> Result<DraftSession, EditorError> {
        self.edit(ctx, property_id, floor_no, "remove", move |grid, selection| {
            grid.check(cell)?;
            Ok(selection.remove(cell))
        })
        .await
    }

    pub async fn clear_cells(
        &self,
        ctx: &TenantContext,
        property_id: &str,
        floor_no: u32,
    ) -> Result<DraftSession, EditorError> {
        self.edit(ctx, property_id, floor_no, "clear", |_, selection| {
            Ok(selection.clear())
        })
        .await
    }

    /// 修改草稿的描述性元数据，不影响选区。
    pub async fn set_layout_type(
        &self,
        ctx: &TenantContext,
        property_id: &str,
        floor_no: u32,
        layout_type: LayoutType,
        creation_method: Option<CreationMethod>,
    ) -> Result<DraftSession, EditorError> {
        let grid = self.property_grid(ctx, property_id).await?;
        let mut session = self.load_session(ctx, property_id, floor_no, grid).await?;
        session.layout.layout_type = layout_type;
        if let Some(creation_method) = creation_method {
            session.layout.creation_method = creation_method;
        }
        session.updated_at_ms = now_epoch_ms();
        self.drafts.put_draft(ctx, session.to_record(ctx)).await?;
        Ok(session)
    }

    /// 放弃编辑；草稿不存在时返回 false。
    pub async fn discard_draft(
        &self,
        ctx: &TenantContext,
        property_id: &str,
        floor_no: u32,
    ) -> Result<bool, EditorError> {
        let removed = self.drafts.delete_draft(ctx, property_id, floor_no).await?;
        info!(
            target: "pms.editor",
            tenant_id = %ctx.tenant_id,
            property_id = %property_id,
            floor_no,
            removed,
            "draft_discarded"
        );
        Ok(removed)
    }

    /// 草稿的矢量预览。
    pub async fn preview(
        &self,
        ctx: &TenantContext,
        property_id: &str,
        floor_no: u32,
    ) -> Result<VectorLayout, EditorError> {
        let session = self.get_draft(ctx, property_id, floor_no).await?;
        Ok(session.preview(self.config.cell_size_px)?)
    }

    /// 保存草稿为楼层布局。
    ///
    /// 同一楼层的并发保存直接拒绝；成功后删除草稿。任一步失败时已保存楼层保持不变。
    pub async fn save_draft(
        &self,
        ctx: &TenantContext,
        property_id: &str,
        floor_no: u32,
        options: SaveOptions,
    ) -> Result<FloorLayoutRecord, EditorError> {
        let _guard = self.acquire_guard(ctx, property_id, floor_no)?;
        let started_at = Instant::now();
        let grid = self.property_grid(ctx, property_id).await?;
        let session = self.load_session(ctx, property_id, floor_no, grid).await?;
        if options.require_units && session.layout.selection.is_empty() {
            record_save_rejected_empty();
            warn!(
                target: "pms.editor",
                tenant_id = %ctx.tenant_id,
                property_id = %property_id,
                floor_no,
                "layout_save_rejected_empty"
            );
            return Err(LayoutError::EmptySelection.into());
        }
        let existing = self
            .floors
            .find_floor(ctx, property_id, floor_no)
            .await?
            .map(|record| record.units)
            .unwrap_or_default();
        let payload = session
            .layout
            .save_payload(
                &options.defaults,
                self.config.cell_size_px,
                &existing,
                options.name_policy,
            )
            .map_err(|err| note_rejection(ctx, property_id, floor_no, err))?;
        let saved = self.persist(ctx, property_id, payload).await?;
        self.drafts.delete_draft(ctx, property_id, floor_no).await?;
        record_layout_saved();
        record_save_latency_ms(started_at.elapsed().as_millis() as u64);
        info!(
            target: "pms.editor",
            tenant_id = %ctx.tenant_id,
            property_id = %property_id,
            floor_no,
            actor = %ctx.user_id,
            units_total = saved.units_total,
            name_policy = ?options.name_policy,
            "layout_saved"
        );
        Ok(saved)
    }

    /// 直接保存客户端提交的楼层载荷。
    ///
    /// 单元按数组顺序重建选区并校验（网格范围、svg_id 与单元名唯一），
    /// 单元几何与布局标记在服务端重新生成。
    pub async fn store_floor(
        &self,
        ctx: &TenantContext,
        property_id: &str,
        payload: FloorSavePayload,
        require_units: bool,
    ) -> Result<FloorLayoutRecord, EditorError> {
        let floor_no = payload.floor_no;
        let _guard = self.acquire_guard(ctx, property_id, floor_no)?;
        let started_at = Instant::now();
        if payload.units_total as usize != payload.units.len() {
            return Err(EditorError::InvalidPayload(format!(
                "unitsTotal {} does not match {} units",
                payload.units_total,
                payload.units.len()
            )));
        }
        if require_units && payload.units.is_empty() {
            record_save_rejected_empty();
            return Err(LayoutError::EmptySelection.into());
        }
        let grid = self.property_grid(ctx, property_id).await?;
        let persisted = PersistedFloor {
            floor_no,
            units_total: payload.units_total,
            layout_type: payload.layout_type,
            creation_method: payload.creation_method,
            layout_data: payload.layout_data,
            units: payload.units,
        };
        let layout = FloorLayout::hydrate(&persisted, grid)
            .map_err(|err| note_rejection(ctx, property_id, floor_no, err))?;
        let normalized = layout
            .save_payload(
                &UnitDefaults::default(),
                self.config.cell_size_px,
                &persisted.units,
                NamePolicy::Preserve,
            )
            .map_err(|err| note_rejection(ctx, property_id, floor_no, err))?;
        let saved = self.persist(ctx, property_id, normalized).await?;
        record_layout_saved();
        record_save_latency_ms(started_at.elapsed().as_millis() as u64);
        info!(
            target: "pms.editor",
            tenant_id = %ctx.tenant_id,
            property_id = %property_id,
            floor_no,
            actor = %ctx.user_id,
            units_total = saved.units_total,
            "layout_stored"
        );
        Ok(saved)
    }

    pub async fn find_floor(
        &self,
        ctx: &TenantContext,
        property_id: &str,
        floor_no: u32,
    ) -> Result<FloorLayoutRecord, EditorError> {
        self.floors
            .find_floor(ctx, property_id, floor_no)
            .await?
            .ok_or(EditorError::NotFound("floor"))
    }

    pub async fn list_floors(
        &self,
        ctx: &TenantContext,
        property_id: &str,
    ) -> Result<Vec<FloorLayoutRecord>, EditorError> {
        Ok(self.floors.list_floors(ctx, property_id).await?)
    }

    /// 删除楼层；与保存互斥。
    pub async fn delete_floor(
        &self,
        ctx: &TenantContext,
        property_id: &str,
        floor_no: u32,
    ) -> Result<bool, EditorError> {
        let _guard = self.acquire_guard(ctx, property_id, floor_no)?;
        let removed = self.floors.delete_floor(ctx, property_id, floor_no).await?;
        info!(
            target: "pms.editor",
            tenant_id = %ctx.tenant_id,
            property_id = %property_id,
            floor_no,
            removed,
            "floor_deleted"
        );
        Ok(removed)
    }

    /// 清除物业下的全部楼层与草稿（物业删除时调用）；返回删除的楼层数。
    pub async fn purge_property(
        &self,
        ctx: &TenantContext,
        property_id: &str,
    ) -> Result<usize, EditorError> {
        let mut floors_removed = 0;
        for floor in self.floors.list_floors(ctx, property_id).await? {
            let _guard = self.acquire_guard(ctx, property_id, floor.floor_no)?;
            if self
                .floors
                .delete_floor(ctx, property_id, floor.floor_no)
                .await?
            {
                floors_removed += 1;
            }
        }
        let drafts_removed = self.drafts.delete_property_drafts(ctx, property_id).await?;
        info!(
            target: "pms.editor",
            tenant_id = %ctx.tenant_id,
            property_id = %property_id,
            floors_removed,
            drafts_removed,
            "property_layouts_purged"
        );
        Ok(floors_removed)
    }

    /// 修改已保存楼层中的单个单元；单元名在楼层内保持唯一。
    pub async fn update_unit(
        &self,
        ctx: &TenantContext,
        property_id: &str,
        floor_no: u32,
        svg_id: u32,
        patch: UnitPatch,
    ) -> Result<UnitRecord, EditorError> {
        let record = self.find_floor(ctx, property_id, floor_no).await?;
        let mut units = record.units;
        let unit = units
            .iter_mut()
            .find(|unit| unit.svg_id == svg_id)
            .ok_or(EditorError::NotFound("unit"))?;
        patch.apply(unit);
        let updated = unit.clone();
        ensure_unique_names(&units).map_err(|err| note_rejection(ctx, property_id, floor_no, err))?;
        if !self
            .floors
            .update_unit(ctx, property_id, floor_no, updated.clone())
            .await?
        {
            return Err(EditorError::NotFound("unit"));
        }
        info!(
            target: "pms.editor",
            tenant_id = %ctx.tenant_id,
            property_id = %property_id,
            floor_no,
            svg_id,
            unit_name = %updated.unit_name,
            "unit_updated"
        );
        Ok(updated)
    }

    async fn load_session(
        &self,
        ctx: &TenantContext,
        property_id: &str,
        floor_no: u32,
        grid: Grid,
    ) -> Result<DraftSession, EditorError> {
        let record = self
            .drafts
            .get_draft(ctx, property_id, floor_no)
            .await?
            .ok_or(EditorError::NotFound("draft"))?;
        DraftSession::from_record(record, grid)
    }

    async fn edit<F>(
        &self,
        ctx: &TenantContext,
        property_id: &str,
        floor_no: u32,
        action: &'static str,
        apply: F,
    ) -> Result<DraftSession, EditorError>
    where
        F: FnOnce(&Grid, SelectionSet) -> Result<SelectionSet, LayoutError> + Send,
    {
        let grid = self.property_grid(ctx, property_id).await?;
        let mut session = self.load_session(ctx, property_id, floor_no, grid).await?;
        let selection = std::mem::take(&mut session.layout.selection);
        session.layout.selection = apply(&grid, selection)?;
        session.updated_at_ms = now_epoch_ms();
        self.drafts.put_draft(ctx, session.to_record(ctx)).await?;
        record_cell_edit();
        info!(
            target: "pms.editor",
            tenant_id = %ctx.tenant_id,
            property_id = %property_id,
            floor_no,
            action,
            cells = session.layout.selection.len(),
            "draft_edited"
        );
        Ok(session)
    }

    async fn persist(
        &self,
        ctx: &TenantContext,
        property_id: &str,
        payload: FloorSavePayload,
    ) -> Result<FloorLayoutRecord, EditorError> {
        let record = FloorLayoutRecord {
            tenant_id: ctx.tenant_id.clone(),
            property_id: property_id.to_string(),
            floor_no: payload.floor_no,
            units_total: payload.units_total,
            layout_type: payload.layout_type.as_str().to_string(),
            creation_method: payload.creation_method.as_str().to_string(),
            layout_data: payload.layout_data,
            units: payload.units,
            updated_at_ms: now_epoch_ms(),
        };
        Ok(self.floors.save_floor(ctx, record).await?)
    }

    fn acquire_guard(
        &self,
        ctx: &TenantContext,
        property_id: &str,
        floor_no: u32,
    ) -> Result<SaveGuard, EditorError> {
        self.guards
            .acquire(&ctx.tenant_id, property_id, floor_no)
            .inspect_err(|err| {
                if matches!(err, EditorError::SaveInFlight { .. }) {
                    record_save_rejected_in_flight();
                    warn!(
                        target: "pms.editor",
                        tenant_id = %ctx.tenant_id,
                        property_id = %property_id,
                        floor_no,
                        "layout_save_rejected_in_flight"
                    );
                }
            })
    }
}

fn note_rejection(
    ctx: &TenantContext,
    property_id: &str,
    floor_no: u32,
    err: LayoutError,
) -> EditorError {
    if let LayoutError::DuplicateUnitName(name) = &err {
        record_save_rejected_collision();
        warn!(
            target: "pms.editor",
            tenant_id = %ctx.tenant_id,
            property_id = %property_id,
            floor_no,
            unit_name = %name,
            "layout_save_rejected_collision"
        );
    }
    err.into()
}
