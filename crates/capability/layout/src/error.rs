//! 布局核心错误类型。

use domain::UnknownVariant;

/// 布局核心错误。
///
/// 所有核心操作都是同步纯函数，出错时不会留下部分状态。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("invalid grid: {rows}x{cols}")]
    InvalidGrid { rows: u32, cols: u32 },
    #[error("cell {index} outside grid of {cell_count} cells")]
    InvalidGridIndex { index: u32, cell_count: u32 },
    #[error("duplicate cell: {0}")]
    DuplicateCell(u32),
    #[error("duplicate unit name: {0}")]
    DuplicateUnitName(String),
    #[error("empty selection")]
    EmptySelection,
    #[error("invalid markup: {0}")]
    InvalidMarkup(String),
    #[error("unknown {field}: {value}")]
    UnknownValue { field: &'static str, value: String },
}

impl From<UnknownVariant> for LayoutError {
    fn from(err: UnknownVariant) -> Self {
        Self::UnknownValue {
            field: err.field,
            value: err.value,
        }
    }
}
