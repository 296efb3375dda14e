//! # 楼层网格布局核心
//!
//! 房东在固定尺寸的网格（默认 8×8）上把一层楼划分为若干可出租单元。
//! 本 crate 只包含纯函数与显式状态值，不做 I/O：
//!
//! - [`grid`]：格子索引与 (行, 列) 互转
//! - [`selection`]：有序、无重复的选区（选中顺序决定单元编号）
//! - [`vector`]：选区序列化为矩形图元、裁剪视口与 SVG 标记
//! - [`units`]：按选区顺序生成单元记录（A1…A26、B1…）
//! - [`overlay`]：结合入住事实计算单元缴费状态与楼层入住率
//! - [`floor`]：楼层状态的重建与保存载荷
//!
//! 会话状态、持久化、防重复提交均由调用方负责。

pub mod error;
pub mod floor;
pub mod grid;
pub mod overlay;
pub mod selection;
pub mod units;
pub mod vector;

pub use error::LayoutError;
pub use floor::{CreationMethod, FloorLayout, FloorSavePayload, LayoutType, PersistedFloor};
pub use grid::{DEFAULT_COLS, DEFAULT_ROWS, Grid, MAX_GRID_DIM, to_coord, to_index};
pub use overlay::{
    DisplayStatus, FloorDisplayState, PropertyOccupancy, UnitDisplay, occupancy_rate,
    resolve_display, summarize_property,
};
pub use selection::SelectionSet;
pub use units::{
    NamePolicy, UnitDefaults, build_units, ensure_unique_names, merge_existing, unit_name_for,
};
pub use vector::{
    BoundingBox, MarkupStyle, RectPrimitive, VectorLayout, element_id, parse_rects,
    render_markup, serialize,
};
