//! 楼层布局状态：从已保存楼层重建选区，生成保存载荷。

use crate::error::LayoutError;
use crate::grid::Grid;
use crate::selection::SelectionSet;
use crate::units::{NamePolicy, UnitDefaults, build_units, ensure_unique_names, merge_existing};
use crate::vector::{MarkupStyle, render_markup, serialize};
use domain::UnitRecord;
use std::fmt;
use std::str::FromStr;

/// 布局形状（描述性元数据，不约束选区）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LayoutType {
    #[default]
    Rectangular,
    LShaped,
    UShaped,
    Custom,
}

impl LayoutType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rectangular => "rectangular",
            Self::LShaped => "l_shaped",
            Self::UShaped => "u_shaped",
            Self::Custom => "custom",
        }
    }
}

impl FromStr for LayoutType {
    type Err = LayoutError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "rectangular" => Ok(Self::Rectangular),
            "l_shaped" => Ok(Self::LShaped),
            "u_shaped" => Ok(Self::UShaped),
            "custom" => Ok(Self::Custom),
            _ => Err(LayoutError::UnknownValue {
                field: "layout_type",
                value: value.to_string(),
            }),
        }
    }
}

impl fmt::Display for LayoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 布局的创建方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CreationMethod {
    #[default]
    Grid,
    Template,
    Upload,
}

impl CreationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Grid => "grid",
            Self::Template => "template",
            Self::Upload => "upload",
        }
    }
}

impl FromStr for CreationMethod {
    type Err = LayoutError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "grid" => Ok(Self::Grid),
            "template" => Ok(Self::Template),
            "upload" => Ok(Self::Upload),
            _ => Err(LayoutError::UnknownValue {
                field: "creation_method",
                value: value.to_string(),
            }),
        }
    }
}

impl fmt::Display for CreationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 后端保存的楼层。
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedFloor {
    pub floor_no: u32,
    pub units_total: u32,
    pub layout_type: LayoutType,
    pub creation_method: CreationMethod,
    pub layout_data: String,
    pub units: Vec<UnitRecord>,
}

/// 保存请求载荷。
#[derive(Debug, Clone, PartialEq)]
pub struct FloorSavePayload {
    /// 0 起楼层号。
    pub floor_no: u32,
    pub units_total: u32,
    pub layout_type: LayoutType,
    pub creation_method: CreationMethod,
    pub layout_data: String,
    pub units: Vec<UnitRecord>,
}

/// 编辑中的楼层布局。
#[derive(Debug, Clone, PartialEq)]
pub struct FloorLayout {
    pub floor_no: u32,
    pub grid: Grid,
    pub selection: SelectionSet,
    pub layout_type: LayoutType,
    pub creation_method: CreationMethod,
}

impl FloorLayout {
    /// 新建空楼层。
    pub fn new(floor_no: u32, grid: Grid) -> Self {
        Self {
            floor_no,
            grid,
            selection: SelectionSet::new(),
            layout_type: LayoutType::default(),
            creation_method: CreationMethod::default(),
        }
    }

    /// 从已保存楼层重建：选区按 `units[].svg_id` 的数组顺序，不排序。
    pub fn hydrate(persisted: &PersistedFloor, grid: Grid) -> Result<Self, LayoutError> {
        for unit in &persisted.units {
            grid.check(unit.svg_id)?;
        }
        ensure_unique_names(&persisted.units)?;
        let selection = SelectionSet::from_cells(persisted.units.iter().map(|unit| unit.svg_id))?;
        Ok(Self {
            floor_no: persisted.floor_no,
            grid,
            selection,
            layout_type: persisted.layout_type,
            creation_method: persisted.creation_method,
        })
    }

    /// 以新选区替换当前选区，所有格子需落在网格内。
    pub fn with_selection(mut self, selection: SelectionSet) -> Result<Self, LayoutError> {
        for cell in selection.cells() {
            self.grid.check(*cell)?;
        }
        self.selection = selection;
        Ok(self)
    }

    /// 生成保存载荷。
    ///
    /// 空选区在此合法（楼层可暂时没有单元），是否拒绝由调用方的保存策略决定。
    pub fn save_payload(
        &self,
        defaults: &UnitDefaults,
        cell_size_px: u32,
        existing: &[UnitRecord],
        policy: NamePolicy,
    ) -> Result<FloorSavePayload, LayoutError> {
        let vector = serialize(&self.selection, &self.grid, cell_size_px)?;
        let generated = build_units(&self.selection, self.floor_no, defaults);
        let mut units = merge_existing(generated, existing, policy)?;
        for (unit, rect) in units.iter_mut().zip(&vector.rects) {
            unit.svg_geom = rect.to_geometry();
        }
        Ok(FloorSavePayload {
            floor_no: self.floor_no,
            units_total: units.len() as u32,
            layout_type: self.layout_type,
            creation_method: self.creation_method,
            layout_data: render_markup(&vector, MarkupStyle::Labelled),
            units,
        })
    }
}
