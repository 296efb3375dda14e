//! 稳定的 DTO 与 API 响应契约。
//!
//! 所有 JSON 字段使用 camelCase；枚举值以 snake_case 字符串传输，
//! 由服务端在边界处解析并拒绝未知值。

use serde::{Deserialize, Serialize};

/// 标准 API 响应封装。
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

/// 失败响应的错误体。
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiError {
                code: code.into(),
                message: message.into(),
            }),
        }
    }
}

/// 登录请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// 登录响应体。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    /// 过期时间（Unix 秒）。
    pub expires: u64,
    pub username: String,
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
}

/// 物业创建请求体。网格尺寸缺省时使用服务端配置。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePropertyRequest {
    pub name: String,
    pub address: Option<String>,
    pub grid_rows: Option<u32>,
    pub grid_cols: Option<u32>,
}

/// 物业更新请求体（网格尺寸不可修改）。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePropertyRequest {
    pub name: Option<String>,
    pub address: Option<String>,
}

/// 物业返回结构。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDto {
    pub property_id: String,
    pub name: String,
    pub address: Option<String>,
    pub grid_rows: u32,
    pub grid_cols: u32,
}

/// 单元配套开关。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtilitiesDto {
    #[serde(default)]
    pub electricity: bool,
    #[serde(default)]
    pub water: bool,
    #[serde(default)]
    pub wifi: bool,
}

/// 单元记录。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitDto {
    pub svg_id: u32,
    #[serde(default)]
    pub svg_geom: String,
    /// 0 起楼层号。
    pub floor_number: u32,
    pub unit_name: String,
    #[serde(default)]
    pub area_sqm: f64,
    #[serde(default)]
    pub bedrooms: u32,
    pub status: String,
    #[serde(default)]
    pub rent_amount: f64,
    #[serde(alias = "paymentFrequency")]
    pub payment_freq: String,
    #[serde(default)]
    pub utilities: UtilitiesDto,
}

/// 已保存楼层 / 直接保存载荷。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorDto {
    /// 0 起楼层号。
    pub floor_no: u32,
    pub units_total: u32,
    pub layout_type: String,
    pub creation_method: String,
    pub layout_data: String,
    pub units: Vec<UnitDto>,
}

/// 楼层列表项。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorSummaryDto {
    pub floor_no: u32,
    /// 1 起，仅用于展示。
    pub display_no: u32,
    pub units_total: u32,
    pub layout_type: String,
    pub creation_method: String,
    pub updated_at_ms: i64,
}

/// 单元更新请求体，缺省字段保持不变。
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUnitRequest {
    pub unit_name: Option<String>,
    pub area_sqm: Option<f64>,
    pub bedrooms: Option<u32>,
    pub status: Option<String>,
    pub rent_amount: Option<f64>,
    #[serde(alias = "paymentFrequency")]
    pub payment_freq: Option<String>,
    pub utilities: Option<UtilitiesDto>,
}

/// 单格编辑请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellRequest {
    pub cell: u32,
}

/// 布局形状更新请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutTypeRequest {
    pub layout_type: String,
    pub creation_method: Option<String>,
}

/// 批量生成单元时的默认字段。
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitDefaultsDto {
    pub area_sqm: Option<f64>,
    pub bedrooms: Option<u32>,
    pub rent_amount: Option<f64>,
    #[serde(alias = "paymentFrequency")]
    pub payment_freq: Option<String>,
    pub utilities: Option<UtilitiesDto>,
    pub status: Option<String>,
}

/// 草稿保存请求体。
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveDraftRequest {
    #[serde(default)]
    pub defaults: UnitDefaultsDto,
    /// `preserve`（默认）或 `renumber`。
    pub name_policy: Option<String>,
}

/// 矩形图元。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RectDto {
    pub element_id: String,
    pub cell: u32,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub label: u32,
}

/// 选中格子的行列包围盒。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBoxDto {
    pub min_row: u32,
    pub max_row: u32,
    pub min_col: u32,
    pub max_col: u32,
}

/// 草稿预览。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewDto {
    pub cell_size_px: u32,
    pub layout_width: u32,
    pub layout_height: u32,
    pub bounds: Option<BoundingBoxDto>,
    pub rects: Vec<RectDto>,
    pub markup: String,
}

/// 编辑会话（草稿）返回结构。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftDto {
    pub property_id: String,
    pub floor_no: u32,
    pub grid_rows: u32,
    pub grid_cols: u32,
    pub selected_cells: Vec<u32>,
    pub layout_type: String,
    pub creation_method: String,
    pub updated_at_ms: i64,
    pub preview: PreviewDto,
}

/// 单元展示状态。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitDisplayDto {
    pub svg_id: u32,
    pub unit_name: String,
    pub floor_number: u32,
    /// vacant / due / overdue / paid。
    pub payment_status: String,
    pub tenant_ref: Option<String>,
    pub occupancy_id: Option<String>,
    pub rent_amount: f64,
}

/// 楼层展示结构（叠加结果）。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorDisplayDto {
    pub floor_no: u32,
    pub layout_data: String,
    pub units: Vec<UnitDisplayDto>,
    pub occupied_count: usize,
    pub total_units: usize,
    pub occupancy_rate: u32,
}

/// 物业展示结构。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDisplayDto {
    pub property_id: String,
    pub floors: Vec<FloorDisplayDto>,
    pub floor_count: usize,
    pub occupied_count: usize,
    pub total_units: usize,
    pub occupancy_rate: u32,
}

/// 入住记录创建请求体。`unitId` 与 (`unitName`, `floorNumber`) 至少提供一种。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOccupancyRequest {
    pub floor_number: u32,
    pub unit_id: Option<u32>,
    pub unit_name: Option<String>,
    pub tenant_ref: String,
    #[serde(default)]
    pub rent_amount: f64,
    pub payment_status: Option<String>,
}

/// 入住记录查询参数。
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OccupancyQuery {
    pub floor_number: Option<u32>,
}

/// 入住记录返回结构。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OccupancyDto {
    pub occupancy_id: String,
    pub property_id: String,
    pub floor_number: u32,
    pub unit_id: Option<u32>,
    pub unit_name: Option<String>,
    pub tenant_ref: String,
    pub rent_amount: f64,
    pub payment_status: Option<String>,
}

/// 计数器快照。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshotDto {
    pub drafts_opened: u64,
    pub cell_edits: u64,
    pub layouts_saved: u64,
    pub save_rejected_empty: u64,
    pub save_rejected_in_flight: u64,
    pub save_rejected_collision: u64,
    pub save_latency_ms_total: u64,
    pub save_latency_ms_count: u64,
    pub displays_resolved: u64,
}
