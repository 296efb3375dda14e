//! 内存存储实现模块
//!
//! 用于测试和本地演示（`PMS_STORAGE=memory`）。
//!
//! - UserStore: InMemoryUserStore
//! - PropertyStore: InMemoryPropertyStore
//! - FloorLayoutStore: InMemoryFloorLayoutStore
//! - OccupancyStore: InMemoryOccupancyStore
//! - DraftStore: InMemoryDraftStore

pub mod draft;
pub mod floor;
pub mod occupancy;
pub mod property;
pub mod user;

pub use draft::*;
pub use floor::*;
pub use occupancy::*;
pub use property::*;
pub use user::*;
