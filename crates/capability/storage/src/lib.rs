//! # PMS Storage 模块
//!
//! 物业管理的数据存储抽象层，支持多种存储后端实现。
//!
//! ## 架构设计
//!
//! 1. **接口抽象层** (`traits.rs`)：所有资源存储的异步 Trait 接口
//! 2. **数据模型层** (`models.rs`)：用户、物业、楼层布局、入住记录、编辑草稿
//! 3. **错误处理层** (`error.rs`)：统一的存储错误类型
//! 4. **验证辅助层** (`validation.rs`)：多租户和物业作用域验证
//! 5. **连接管理层** (`connection.rs`)：数据库连接池管理
//! 6. **实现层**：
//!    - `in_memory/`：内存存储实现（测试和本地演示）
//!    - `postgres/`：PostgreSQL 存储实现（楼层保存使用事务）
//!    - `redis`：编辑草稿的 Redis 实现（带 TTL）
//!
//! ## 多租户安全
//!
//! 所有存储操作都通过 `TenantContext` 进行租户隔离：
//!
//! - 所有查询带 `tenant_id` 过滤条件
//! - 物业级资源操作前校验物业作用域（`ensure_property_scope`）
//!
//! ## 楼层保存
//!
//! `FloorLayoutStore::save_floor` 整体替换楼层的布局标记与单元列表，
//! 读者要么看到旧楼层，要么看到新楼层，不会看到混合状态。
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use pms_storage::{InMemoryPropertyStore, PropertyStore};
//! use domain::TenantContext;
//!
//! let store = InMemoryPropertyStore::with_default_property();
//! let ctx = TenantContext::new("tenant-1", "user-1", vec![], vec![], None);
//! let properties = store.list_properties(&ctx).await?;
//! ```

pub mod connection;
pub mod error;
pub mod in_memory;
pub mod models;
pub mod postgres;
pub mod redis;
pub mod traits;
pub mod validation;

pub use connection::*;
pub use error::*;
pub use models::*;
pub use redis::RedisDraftStore;
pub use traits::*;
pub use validation::*;

pub use in_memory::{
    InMemoryDraftStore, InMemoryFloorLayoutStore, InMemoryOccupancyStore, InMemoryPropertyStore,
    InMemoryUserStore,
};

pub use postgres::{PgFloorLayoutStore, PgOccupancyStore, PgPropertyStore, PgUserStore};
