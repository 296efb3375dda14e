//! # PostgreSQL 存储实现模块
//!
//! 所有存储接口的 PostgreSQL 实现，用于生产环境。
//!
//! ## 设计原则
//!
//! 1. **参数化查询**：所有 SQL 使用参数绑定，禁止字符串拼接
//! 2. **多租户隔离**：所有查询都包含 `tenant_id` 过滤条件
//! 3. **物业作用域**：物业级资源操作包含 `property_id` 过滤条件
//! 4. **原子保存**：楼层布局与单元在同一事务内整体替换
//!
//! ## 数据库模式
//!
//! 见 `migrations/0001_init.sql`：
//! - `users`、`tenant_user_roles`、`tenant_role_permissions`：账户与权限
//! - `properties`：物业（含固定网格尺寸）
//! - `floor_layouts`：楼层布局标记与元数据，主键 (tenant_id, property_id, floor_no)
//! - `floor_units`：楼层单元，`position` 保存选区顺序
//! - `occupancies`：入住记录
//!
//! 整数列使用 `integer`，读出时转换为 `u32` 并拒绝负值。

pub mod floor;
pub mod occupancy;
pub mod property;
pub mod user;

pub use floor::*;
pub use occupancy::*;
pub use property::*;
pub use user::*;

use crate::error::StorageError;

pub(crate) fn to_u32(value: i32, column: &str) -> Result<u32, StorageError> {
    u32::try_from(value).map_err(|_| StorageError::new(format!("negative {column}: {value}")))
}

pub(crate) fn to_i32(value: u32, column: &str) -> Result<i32, StorageError> {
    i32::try_from(value).map_err(|_| StorageError::new(format!("{column} out of range: {value}")))
}
