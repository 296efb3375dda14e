//! Record / 领域值与 DTO 之间的转换
//!
//! 枚举字段在此处解析，未知值返回 400。

use crate::utils::response::{bad_request_error, layout_error};
use crate::utils::validation::{ensure_non_negative, parse_field, parse_optional};
use api_contract::{
    BoundingBoxDto, FloorDisplayDto, FloorDto, FloorSummaryDto, OccupancyDto, PreviewDto,
    PropertyDisplayDto, PropertyDto, RectDto, SaveDraftRequest, UnitDisplayDto, UnitDto,
    UpdateUnitRequest, UtilitiesDto, DraftDto,
};
use axum::response::Response;
use domain::{UnitRecord, Utilities};
use pms_editor::{DraftSession, FloorDisplay, PropertyDisplay, SaveOptions, UnitPatch};
use pms_layout::{
    CreationMethod, FloorSavePayload, LayoutError, LayoutType, MarkupStyle, NamePolicy,
    UnitDefaults, render_markup,
};
use pms_storage::{FloorLayoutRecord, OccupancyRecord, PropertyRecord};

pub fn property_to_dto(record: PropertyRecord) -> PropertyDto {
    PropertyDto {
        property_id: record.property_id,
        name: record.name,
        address: record.address,
        grid_rows: record.grid_rows,
        grid_cols: record.grid_cols,
    }
}

fn utilities_to_dto(utilities: Utilities) -> UtilitiesDto {
    UtilitiesDto {
        electricity: utilities.electricity,
        water: utilities.water,
        wifi: utilities.wifi,
    }
}

fn utilities_from_dto(dto: UtilitiesDto) -> Utilities {
    Utilities {
        electricity: dto.electricity,
        water: dto.water,
        wifi: dto.wifi,
    }
}

pub fn unit_to_dto(unit: UnitRecord) -> UnitDto {
    UnitDto {
        svg_id: unit.svg_id,
        svg_geom: unit.svg_geom,
        floor_number: unit.floor_number,
        unit_name: unit.unit_name,
        area_sqm: unit.area_sqm,
        bedrooms: unit.bedrooms,
        status: unit.status.as_str().to_string(),
        rent_amount: unit.rent_amount,
        payment_freq: unit.payment_frequency.as_str().to_string(),
        utilities: utilities_to_dto(unit.utilities),
    }
}

fn unit_from_dto(dto: UnitDto) -> Result<UnitRecord, Response> {
    ensure_non_negative(Some(dto.area_sqm), "areaSqm")?;
    ensure_non_negative(Some(dto.rent_amount), "rentAmount")?;
    Ok(UnitRecord {
        svg_id: dto.svg_id,
        svg_geom: dto.svg_geom,
        unit_name: dto.unit_name.trim().to_string(),
        floor_number: dto.floor_number,
        area_sqm: dto.area_sqm,
        bedrooms: dto.bedrooms,
        status: parse_field(&dto.status)?,
        rent_amount: dto.rent_amount,
        payment_frequency: parse_field(&dto.payment_freq)?,
        utilities: utilities_from_dto(dto.utilities),
    })
}

pub fn floor_to_dto(record: FloorLayoutRecord) -> FloorDto {
    FloorDto {
        floor_no: record.floor_no,
        units_total: record.units_total,
        layout_type: record.layout_type,
        creation_method: record.creation_method,
        layout_data: record.layout_data,
        units: record.units.into_iter().map(unit_to_dto).collect(),
    }
}

pub fn floor_summary_to_dto(record: FloorLayoutRecord) -> FloorSummaryDto {
    FloorSummaryDto {
        floor_no: record.floor_no,
        display_no: record.floor_no + 1,
        units_total: record.units_total,
        layout_type: record.layout_type,
        creation_method: record.creation_method,
        updated_at_ms: record.updated_at_ms,
    }
}

/// 直接保存载荷：路径中的楼层号必须与载荷一致，单元楼层号必须等于楼层号。
pub fn floor_payload_from_dto(floor_no: u32, dto: FloorDto) -> Result<FloorSavePayload, Response> {
    if dto.floor_no != floor_no {
        return Err(bad_request_error("floorNo does not match path"));
    }
    if let Some(unit) = dto.units.iter().find(|unit| unit.floor_number != floor_no) {
        return Err(bad_request_error(format!(
            "unit {} has floorNumber {}",
            unit.svg_id, unit.floor_number
        )));
    }
    let layout_type: LayoutType = dto.layout_type.parse().map_err(layout_error)?;
    let creation_method: CreationMethod = dto.creation_method.parse().map_err(layout_error)?;
    let units = dto
        .units
        .into_iter()
        .map(unit_from_dto)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(FloorSavePayload {
        floor_no,
        units_total: dto.units_total,
        layout_type,
        creation_method,
        layout_data: dto.layout_data,
        units,
    })
}

pub fn unit_patch_from_request(req: UpdateUnitRequest) -> Result<UnitPatch, Response> {
    ensure_non_negative(req.area_sqm, "areaSqm")?;
    ensure_non_negative(req.rent_amount, "rentAmount")?;
    let unit_name = crate::utils::normalize_optional(req.unit_name, "unitName")?;
    Ok(UnitPatch {
        unit_name,
        area_sqm: req.area_sqm,
        bedrooms: req.bedrooms,
        status: parse_optional(req.status.as_deref())?,
        rent_amount: req.rent_amount,
        payment_frequency: parse_optional(req.payment_freq.as_deref())?,
        utilities: req.utilities.map(utilities_from_dto),
    })
}

fn parse_name_policy(value: Option<&str>) -> Result<NamePolicy, Response> {
    match value.map(|value| value.trim().to_ascii_lowercase()).as_deref() {
        None | Some("preserve") => Ok(NamePolicy::Preserve),
        Some("renumber") => Ok(NamePolicy::Renumber),
        Some(other) => Err(bad_request_error(format!("unknown namePolicy: {other}"))),
    }
}

/// 保存请求 → 保存选项；未提供的默认字段沿用 `UnitDefaults::default()`。
pub fn save_options_from_request(
    req: SaveDraftRequest,
    require_units: bool,
) -> Result<SaveOptions, Response> {
    let fallback = UnitDefaults::default();
    let defaults = req.defaults;
    ensure_non_negative(defaults.area_sqm, "areaSqm")?;
    ensure_non_negative(defaults.rent_amount, "rentAmount")?;
    Ok(SaveOptions {
        defaults: UnitDefaults {
            area_sqm: defaults.area_sqm.unwrap_or(fallback.area_sqm),
            bedrooms: defaults.bedrooms.unwrap_or(fallback.bedrooms),
            rent_amount: defaults.rent_amount.unwrap_or(fallback.rent_amount),
            payment_frequency: parse_optional(defaults.payment_freq.as_deref())?
                .unwrap_or(fallback.payment_frequency),
            utilities: defaults
                .utilities
                .map(utilities_from_dto)
                .unwrap_or(fallback.utilities),
            status: parse_optional(defaults.status.as_deref())?,
        },
        name_policy: parse_name_policy(req.name_policy.as_deref())?,
        require_units,
    })
}

pub fn draft_to_dto(session: DraftSession, cell_size_px: u32) -> Result<DraftDto, LayoutError> {
    let vector = session.preview(cell_size_px)?;
    let markup = render_markup(&vector, MarkupStyle::Labelled);
    let layout = session.layout;
    Ok(DraftDto {
        property_id: session.property_id,
        floor_no: layout.floor_no,
        grid_rows: layout.grid.rows(),
        grid_cols: layout.grid.cols(),
        selected_cells: layout.selection.into_cells(),
        layout_type: layout.layout_type.as_str().to_string(),
        creation_method: layout.creation_method.as_str().to_string(),
        updated_at_ms: session.updated_at_ms,
        preview: PreviewDto {
            cell_size_px: vector.cell_size_px,
            layout_width: vector.layout_width(),
            layout_height: vector.layout_height(),
            bounds: vector.bounds.map(|bounds| BoundingBoxDto {
                min_row: bounds.min_row,
                max_row: bounds.max_row,
                min_col: bounds.min_col,
                max_col: bounds.max_col,
            }),
            rects: vector
                .rects
                .into_iter()
                .map(|rect| RectDto {
                    element_id: rect.element_id,
                    cell: rect.cell,
                    x: rect.x,
                    y: rect.y,
                    width: rect.width,
                    height: rect.height,
                    label: rect.label,
                })
                .collect(),
            markup,
        },
    })
}

pub fn floor_display_to_dto(display: FloorDisplay) -> FloorDisplayDto {
    let state = display.state;
    FloorDisplayDto {
        floor_no: display.floor_no,
        layout_data: display.layout_data,
        units: state
            .units
            .into_iter()
            .map(|unit| UnitDisplayDto {
                svg_id: unit.svg_id,
                unit_name: unit.unit_name,
                floor_number: unit.floor_number,
                payment_status: unit.payment_status.as_str().to_string(),
                tenant_ref: unit.tenant_ref,
                occupancy_id: unit.occupancy_id,
                rent_amount: unit.rent_amount,
            })
            .collect(),
        occupied_count: state.occupied_count,
        total_units: state.total_units,
        occupancy_rate: state.occupancy_rate,
    }
}

pub fn property_display_to_dto(display: PropertyDisplay) -> PropertyDisplayDto {
    let summary = display.summary;
    PropertyDisplayDto {
        property_id: display.property_id,
        floors: display
            .floors
            .into_iter()
            .map(floor_display_to_dto)
            .collect(),
        floor_count: summary.floors,
        occupied_count: summary.occupied_count,
        total_units: summary.total_units,
        occupancy_rate: summary.occupancy_rate,
    }
}

pub fn occupancy_to_dto(record: OccupancyRecord) -> OccupancyDto {
    OccupancyDto {
        occupancy_id: record.occupancy_id,
        property_id: record.property_id,
        floor_number: record.floor_number,
        unit_id: record.unit_id,
        unit_name: record.unit_name,
        tenant_ref: record.tenant_ref,
        rent_amount: record.rent_amount,
        payment_status: record
            .payment_status
            .map(|status| status.as_str().to_string()),
    }
}
