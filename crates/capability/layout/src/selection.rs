//! 单元选区：有序、无重复的格子索引序列。
//!
//! 选中顺序决定单元的展示编号（序列中的 1 起位置）与生成的单元名，
//! 因此所有操作都不会改变已保留格子的相对顺序。

use crate::error::LayoutError;

/// 有序选区。每个操作接收并返回选区值本身，由调用方持有会话状态。
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SelectionSet {
    cells: Vec<u32>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 按给定顺序重建选区（不排序），重复格子报错。
    pub fn from_cells(cells: impl IntoIterator<Item = u32>) -> Result<Self, LayoutError> {
        let mut selection = Self::new();
        for cell in cells {
            if selection.contains(cell) {
                return Err(LayoutError::DuplicateCell(cell));
            }
            selection.cells.push(cell);
        }
        Ok(selection)
    }

    /// 已选则移除，未选则追加到末尾。
    pub fn toggle(self, index: u32) -> Self {
        if self.contains(index) {
            self.remove(index)
        } else {
            self.add(index)
        }
    }

    /// 追加格子，已存在时不变。
    pub fn add(mut self, index: u32) -> Self {
        if !self.contains(index) {
            self.cells.push(index);
        }
        self
    }

    /// 移除格子，不存在时不变。
    pub fn remove(mut self, index: u32) -> Self {
        self.cells.retain(|cell| *cell != index);
        self
    }

    pub fn clear(mut self) -> Self {
        self.cells.clear();
        self
    }

    pub fn contains(&self, index: u32) -> bool {
        self.cells.contains(&index)
    }

    /// 格子的展示编号（1 起）。
    pub fn position_of(&self, index: u32) -> Option<usize> {
        self.cells
            .iter()
            .position(|cell| *cell == index)
            .map(|position| position + 1)
    }

    pub fn cells(&self) -> &[u32] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn into_cells(self) -> Vec<u32> {
        self.cells
    }
}

impl From<SelectionSet> for Vec<u32> {
    fn from(selection: SelectionSet) -> Self {
        selection.cells
    }
}
