//! 单元记录生成：选区中的每个格子展开为一条可出租单元。

use crate::error::LayoutError;
use crate::selection::SelectionSet;
use domain::{PaymentFrequency, UnitRecord, UnitStatus, Utilities};
use std::collections::{HashMap, HashSet};

/// 批量生成单元时的默认字段。
#[derive(Debug, Clone, PartialEq)]
pub struct UnitDefaults {
    pub area_sqm: f64,
    pub bedrooms: u32,
    pub rent_amount: f64,
    pub payment_frequency: PaymentFrequency,
    pub utilities: Utilities,
    /// 覆盖默认的 vacant 状态。
    pub status: Option<UnitStatus>,
}

impl Default for UnitDefaults {
    fn default() -> Self {
        Self {
            area_sqm: 0.0,
            bedrooms: 1,
            rent_amount: 0.0,
            payment_frequency: PaymentFrequency::Monthly,
            utilities: Utilities {
                electricity: true,
                water: true,
                wifi: false,
            },
            status: None,
        }
    }
}

/// 合并已有单元时的命名策略。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NamePolicy {
    /// 保留已有单元名，冲突时报错。
    #[default]
    Preserve,
    /// 按当前选区顺序重新编号。
    Renumber,
}

/// 选区位置对应的单元名：字母每 26 个循环一次，数字为 `idx % 26 + 1`。
///
/// 0 → A1，25 → A26，26 → B1，52 → C1。超过 Z 后字母部分按表格列名继续（AA、AB…）。
pub fn unit_name_for(idx: usize) -> String {
    format!("{}{}", letter_for(idx / 26), idx % 26 + 1)
}

fn letter_for(block: usize) -> String {
    let mut letters = Vec::new();
    let mut n = block + 1;
    while n > 0 {
        n -= 1;
        letters.push(char::from(b'A' + (n % 26) as u8));
        n /= 26;
    }
    letters.iter().rev().collect()
}

/// 按选区顺序生成单元记录。
///
/// `svg_geom` 留空，由楼层层在序列化后填入。空选区返回空列表。
pub fn build_units(
    cells: &SelectionSet,
    floor_number: u32,
    defaults: &UnitDefaults,
) -> Vec<UnitRecord> {
    cells
        .cells()
        .iter()
        .enumerate()
        .map(|(idx, cell)| UnitRecord {
            svg_id: *cell,
            svg_geom: String::new(),
            unit_name: unit_name_for(idx),
            floor_number,
            area_sqm: defaults.area_sqm,
            bedrooms: defaults.bedrooms,
            status: defaults.status.unwrap_or(UnitStatus::Vacant),
            rent_amount: defaults.rent_amount,
            payment_frequency: defaults.payment_frequency,
            utilities: defaults.utilities,
        })
        .collect()
}

/// 将新生成的单元与已保存单元合并。
///
/// 同一 `svg_id` 的单元保留保存后单独修改过的属性（面积、卧室、状态、租金、周期、配套）；
/// `NamePolicy::Preserve` 下同时保留原单元名。结果中的单元名必须唯一。
pub fn merge_existing(
    generated: Vec<UnitRecord>,
    existing: &[UnitRecord],
    policy: NamePolicy,
) -> Result<Vec<UnitRecord>, LayoutError> {
    let by_svg_id: HashMap<u32, &UnitRecord> =
        existing.iter().map(|unit| (unit.svg_id, unit)).collect();
    let merged: Vec<UnitRecord> = generated
        .into_iter()
        .map(|unit| match by_svg_id.get(&unit.svg_id) {
            Some(previous) => UnitRecord {
                unit_name: match policy {
                    NamePolicy::Preserve => previous.unit_name.clone(),
                    NamePolicy::Renumber => unit.unit_name,
                },
                area_sqm: previous.area_sqm,
                bedrooms: previous.bedrooms,
                status: previous.status,
                rent_amount: previous.rent_amount,
                payment_frequency: previous.payment_frequency,
                utilities: previous.utilities,
                ..unit
            },
            None => unit,
        })
        .collect();
    ensure_unique_names(&merged)?;
    Ok(merged)
}

/// 校验楼层内单元名唯一。
pub fn ensure_unique_names(units: &[UnitRecord]) -> Result<(), LayoutError> {
    let mut seen = HashSet::with_capacity(units.len());
    for unit in units {
        if !seen.insert(unit.unit_name.as_str()) {
            return Err(LayoutError::DuplicateUnitName(unit.unit_name.clone()));
        }
    }
    Ok(())
}
