//! # 布局编辑服务
//!
//! 在纯布局核心（`pms-layout`）与存储（`pms-storage`）之间编排：
//!
//! - [`LayoutEditor`]：编辑会话（草稿存于 `DraftStore`）、选区编辑、预览、保存
//! - [`FloorDisplayService`]：楼层/物业的入住与缴费展示
//! - 同一楼层同一时间只允许一个保存在途，第二个请求直接返回 `SaveInFlight`

mod display;
mod error;
mod guard;
mod session;

pub use display::{FloorDisplay, FloorDisplayService, PropertyDisplay};
pub use error::EditorError;
pub use guard::{SaveGuard, SaveGuards};
pub use session::{DraftSession, EditorConfig, LayoutEditor, SaveOptions, UnitPatch};
