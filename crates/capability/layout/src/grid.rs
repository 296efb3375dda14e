//! 网格坐标模型：线性格子索引与 (行, 列) 互转。

use crate::error::LayoutError;

/// 默认网格行数。
pub const DEFAULT_ROWS: u32 = 8;
/// 默认网格列数（同一物业所有楼层一致）。
pub const DEFAULT_COLS: u32 = 8;
/// 单边格子数上限。
pub const MAX_GRID_DIM: u32 = 256;

/// 索引转 (行, 列)。调用方保证 `cols > 0`。
pub fn to_coord(index: u32, cols: u32) -> (u32, u32) {
    (index / cols, index % cols)
}

/// (行, 列) 转索引。调用方保证 `cols > 0`。
pub fn to_index(row: u32, col: u32, cols: u32) -> u32 {
    row * cols + col
}

/// 固定尺寸的楼层网格。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    rows: u32,
    cols: u32,
}

impl Grid {
    /// 行列均须在 `1..=MAX_GRID_DIM` 内。
    pub fn new(rows: u32, cols: u32) -> Result<Self, LayoutError> {
        if rows == 0 || cols == 0 || rows > MAX_GRID_DIM || cols > MAX_GRID_DIM {
            return Err(LayoutError::InvalidGrid { rows, cols });
        }
        Ok(Self { rows, cols })
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn cell_count(&self) -> u32 {
        self.rows * self.cols
    }

    /// 整个网格的像素宽高；乘积溢出 `u32` 时返回 `InvalidGrid`。
    pub fn pixel_extent(&self, cell_size_px: u32) -> Result<(u32, u32), LayoutError> {
        let invalid = || LayoutError::InvalidGrid {
            rows: self.rows,
            cols: self.cols,
        };
        let width = self.cols.checked_mul(cell_size_px).ok_or_else(invalid)?;
        let height = self.rows.checked_mul(cell_size_px).ok_or_else(invalid)?;
        Ok((width, height))
    }

    /// 校验格子索引落在网格内。
    pub fn check(&self, index: u32) -> Result<u32, LayoutError> {
        if index >= self.cell_count() {
            return Err(LayoutError::InvalidGridIndex {
                index,
                cell_count: self.cell_count(),
            });
        }
        Ok(index)
    }

    /// 带越界校验的 [`to_coord`]。
    pub fn coord_of(&self, index: u32) -> Result<(u32, u32), LayoutError> {
        self.check(index)?;
        Ok(to_coord(index, self.cols))
    }

    /// 带越界校验的 [`to_index`]。
    pub fn index_of(&self, row: u32, col: u32) -> Result<u32, LayoutError> {
        if row >= self.rows || col >= self.cols {
            return Err(LayoutError::InvalidGridIndex {
                index: row.saturating_mul(self.cols).saturating_add(col),
                cell_count: self.cell_count(),
            });
        }
        Ok(to_index(row, col, self.cols))
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
        }
    }
}
