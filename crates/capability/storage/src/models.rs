//! 数据模型
//!
//! 定义所有存储相关的数据模型和更新结构：
//! - 用户模型：UserRecord
//! - 物业模型：PropertyRecord, PropertyUpdate（含网格尺寸）
//! - 楼层布局：FloorLayoutRecord（布局标记 + 单元列表）
//! - 入住记录：OccupancyRecord
//! - 编辑草稿：DraftRecord

use domain::{OccupancyFact, PaymentStatus, UnitRecord};

/// 用户记录。
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub tenant_id: String,
    pub user_id: String,
    pub username: String,
    /// argon2 哈希；历史数据可能是明文，登录成功后升级。
    pub password: String,
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
}

impl UserRecord {
    /// 将用户记录转换为 TenantContext。
    pub fn to_tenant_context(&self) -> domain::TenantContext {
        domain::TenantContext::new(
            self.tenant_id.clone(),
            self.user_id.clone(),
            self.roles.clone(),
            self.permissions.clone(),
            None,
        )
    }
}

/// 物业记录。
///
/// 网格尺寸在物业创建后固定，所有楼层共用。
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyRecord {
    pub property_id: String,
    pub tenant_id: String,
    pub name: String,
    pub address: Option<String>,
    pub grid_rows: u32,
    pub grid_cols: u32,
}

/// 物业更新输入。
#[derive(Debug, Clone, Default)]
pub struct PropertyUpdate {
    pub name: Option<String>,
    pub address: Option<String>,
}

/// 楼层布局记录。
#[derive(Debug, Clone, PartialEq)]
pub struct FloorLayoutRecord {
    pub tenant_id: String,
    pub property_id: String,
    /// 0 起楼层号。
    pub floor_no: u32,
    pub units_total: u32,
    pub layout_type: String,
    pub creation_method: String,
    pub layout_data: String,
    /// 按选区顺序保存。
    pub units: Vec<UnitRecord>,
    pub updated_at_ms: i64,
}

/// 入住记录。
#[derive(Debug, Clone, PartialEq)]
pub struct OccupancyRecord {
    pub occupancy_id: String,
    pub tenant_id: String,
    pub property_id: String,
    pub floor_number: u32,
    pub unit_id: Option<u32>,
    pub unit_name: Option<String>,
    pub tenant_ref: String,
    pub rent_amount: f64,
    pub payment_status: Option<PaymentStatus>,
}

impl OccupancyRecord {
    /// 转换为叠加计算使用的入住事实。
    pub fn to_fact(&self) -> OccupancyFact {
        OccupancyFact {
            occupancy_id: self.occupancy_id.clone(),
            unit_id: self.unit_id,
            unit_name: self.unit_name.clone(),
            floor_number: Some(self.floor_number),
            tenant_ref: self.tenant_ref.clone(),
            rent_amount: self.rent_amount,
            payment_status: self.payment_status,
        }
    }
}

/// 楼层编辑草稿（会话状态）。
#[derive(Debug, Clone, PartialEq)]
pub struct DraftRecord {
    pub tenant_id: String,
    pub property_id: String,
    pub floor_no: u32,
    /// 选中顺序即单元编号顺序。
    pub selected_cells: Vec<u32>,
    pub layout_type: String,
    pub creation_method: String,
    pub updated_at_ms: i64,
}
