//! 存储接口 Trait 定义
//!
//! 定义所有资源存储的异步接口：
//! - UserStore：用户存储
//! - PropertyStore：物业存储
//! - FloorLayoutStore：楼层布局存储
//! - OccupancyStore：入住记录存储
//! - DraftStore：编辑草稿存储
//!
//! 设计原则：
//! - 所有接口显式接收 TenantContext
//! - 所有接口返回 StorageError
//! - 使用 async_trait 支持动态分发

use crate::error::StorageError;
use crate::models::{
    DraftRecord, FloorLayoutRecord, OccupancyRecord, PropertyRecord, PropertyUpdate, UserRecord,
};
use async_trait::async_trait;
use domain::{TenantContext, UnitRecord};

/// 用户存储接口
///
/// 提供用户查询功能（禁止在 handler 中直接连 SQL）。
#[async_trait]
pub trait UserStore: Send + Sync {
    /// 根据用户名查找用户
    async fn find_by_username(
        &self,
        ctx: &TenantContext,
        username: &str,
    ) -> Result<Option<UserRecord>, StorageError>;

    /// 更新密码哈希（明文密码升级）
    async fn update_password_hash(
        &self,
        ctx: &TenantContext,
        user_id: &str,
        password_hash: &str,
    ) -> Result<bool, StorageError>;
}

/// 物业存储接口
///
/// 提供物业 CRUD 操作和租户归属校验。
#[async_trait]
pub trait PropertyStore: Send + Sync {
    /// 列出当前租户的所有物业
    async fn list_properties(
        &self,
        ctx: &TenantContext,
    ) -> Result<Vec<PropertyRecord>, StorageError>;

    /// 查找指定物业
    async fn find_property(
        &self,
        ctx: &TenantContext,
        property_id: &str,
    ) -> Result<Option<PropertyRecord>, StorageError>;

    /// 创建新物业
    async fn create_property(
        &self,
        ctx: &TenantContext,
        record: PropertyRecord,
    ) -> Result<PropertyRecord, StorageError>;

    /// 更新物业（网格尺寸不可修改）
    async fn update_property(
        &self,
        ctx: &TenantContext,
        property_id: &str,
        update: PropertyUpdate,
    ) -> Result<Option<PropertyRecord>, StorageError>;

    /// 删除物业
    async fn delete_property(
        &self,
        ctx: &TenantContext,
        property_id: &str,
    ) -> Result<bool, StorageError>;

    /// 验证物业归属当前租户
    async fn property_belongs_to_tenant(
        &self,
        ctx: &TenantContext,
        property_id: &str,
    ) -> Result<bool, StorageError>;
}

/// 楼层布局存储接口
#[async_trait]
pub trait FloorLayoutStore: Send + Sync {
    /// 按楼层号升序列出物业的已保存楼层
    async fn list_floors(
        &self,
        ctx: &TenantContext,
        property_id: &str,
    ) -> Result<Vec<FloorLayoutRecord>, StorageError>;

    async fn find_floor(
        &self,
        ctx: &TenantContext,
        property_id: &str,
        floor_no: u32,
    ) -> Result<Option<FloorLayoutRecord>, StorageError>;

    /// 整体替换楼层布局及其单元（原子）
    async fn save_floor(
        &self,
        ctx: &TenantContext,
        record: FloorLayoutRecord,
    ) -> Result<FloorLayoutRecord, StorageError>;

    async fn delete_floor(
        &self,
        ctx: &TenantContext,
        property_id: &str,
        floor_no: u32,
    ) -> Result<bool, StorageError>;

    /// 替换楼层内 svg_id 相同的单元；单元不存在时返回 false
    async fn update_unit(
        &self,
        ctx: &TenantContext,
        property_id: &str,
        floor_no: u32,
        unit: UnitRecord,
    ) -> Result<bool, StorageError>;
}

/// 入住记录存储接口
#[async_trait]
pub trait OccupancyStore: Send + Sync {
    /// 列出入住记录；指定楼层时只返回该楼层
    async fn list_occupancies(
        &self,
        ctx: &TenantContext,
        property_id: &str,
        floor_number: Option<u32>,
    ) -> Result<Vec<OccupancyRecord>, StorageError>;

    async fn create_occupancy(
        &self,
        ctx: &TenantContext,
        record: OccupancyRecord,
    ) -> Result<OccupancyRecord, StorageError>;

    async fn delete_occupancy(
        &self,
        ctx: &TenantContext,
        property_id: &str,
        occupancy_id: &str,
    ) -> Result<bool, StorageError>;
}

/// 编辑草稿存储接口
///
/// 每个 (租户, 物业, 楼层) 最多一份草稿。
#[async_trait]
pub trait DraftStore: Send + Sync {
    async fn get_draft(
        &self,
        ctx: &TenantContext,
        property_id: &str,
        floor_no: u32,
    ) -> Result<Option<DraftRecord>, StorageError>;

    async fn put_draft(&self, ctx: &TenantContext, record: DraftRecord)
    -> Result<(), StorageError>;

    async fn delete_draft(
        &self,
        ctx: &TenantContext,
        property_id: &str,
        floor_no: u32,
    ) -> Result<bool, StorageError>;

    /// 删除物业下所有楼层的草稿，返回删除数量
    async fn delete_property_drafts(
        &self,
        ctx: &TenantContext,
        property_id: &str,
    ) -> Result<usize, StorageError>;
}
