//! 入住/缴费叠加：由单元记录与入住事实推导每个单元的展示状态与楼层入住率。
//!
//! 纯推导，每次请求重新计算，不缓存。

use domain::{OccupancyFact, PaymentStatus, UnitRecord};

/// 单元展示状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayStatus {
    Vacant,
    Due,
    Overdue,
    Paid,
}

impl DisplayStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vacant => "vacant",
            Self::Due => "due",
            Self::Overdue => "overdue",
            Self::Paid => "paid",
        }
    }
}

impl From<PaymentStatus> for DisplayStatus {
    fn from(status: PaymentStatus) -> Self {
        match status {
            PaymentStatus::Paid => Self::Paid,
            PaymentStatus::Due => Self::Due,
            PaymentStatus::Overdue => Self::Overdue,
        }
    }
}

/// 单个单元的展示结果。
#[derive(Debug, Clone, PartialEq)]
pub struct UnitDisplay {
    pub svg_id: u32,
    pub unit_name: String,
    pub floor_number: u32,
    pub payment_status: DisplayStatus,
    pub tenant_ref: Option<String>,
    pub occupancy_id: Option<String>,
    pub rent_amount: f64,
}

/// 楼层展示状态。
#[derive(Debug, Clone, PartialEq)]
pub struct FloorDisplayState {
    pub units: Vec<UnitDisplay>,
    pub occupied_count: usize,
    pub total_units: usize,
    /// 0..=100。
    pub occupancy_rate: u32,
}

/// 物业级入住汇总。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyOccupancy {
    pub floors: usize,
    pub occupied_count: usize,
    pub total_units: usize,
    pub occupancy_rate: u32,
}

/// 四舍五入的入住百分比，无单元时为 0。
pub fn occupancy_rate(occupied: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let rate = (occupied as f64 / total as f64 * 100.0).round();
    rate.clamp(0.0, 100.0) as u32
}

// 按 svg_id 或 (单元名, 楼层) 任一匹配，迭代顺序中的第一条胜出。
fn matching_fact<'a>(unit: &UnitRecord, facts: &'a [OccupancyFact]) -> Option<&'a OccupancyFact> {
    facts.iter().find(|fact| {
        fact.unit_id == Some(unit.svg_id)
            || (fact.unit_name.as_deref() == Some(unit.unit_name.as_str())
                && fact.floor_number == Some(unit.floor_number))
    })
}

/// 计算楼层展示状态。
pub fn resolve_display(units: &[UnitRecord], facts: &[OccupancyFact]) -> FloorDisplayState {
    let mut occupied_count = 0;
    let displays = units
        .iter()
        .map(|unit| match matching_fact(unit, facts) {
            Some(fact) => {
                occupied_count += 1;
                UnitDisplay {
                    svg_id: unit.svg_id,
                    unit_name: unit.unit_name.clone(),
                    floor_number: unit.floor_number,
                    payment_status: fact
                        .payment_status
                        .map(DisplayStatus::from)
                        .unwrap_or(DisplayStatus::Due),
                    tenant_ref: Some(fact.tenant_ref.clone()),
                    occupancy_id: Some(fact.occupancy_id.clone()),
                    rent_amount: fact.rent_amount,
                }
            }
            None => UnitDisplay {
                svg_id: unit.svg_id,
                unit_name: unit.unit_name.clone(),
                floor_number: unit.floor_number,
                payment_status: DisplayStatus::Vacant,
                tenant_ref: None,
                occupancy_id: None,
                rent_amount: unit.rent_amount,
            },
        })
        .collect::<Vec<_>>();
    let total_units = displays.len();
    FloorDisplayState {
        units: displays,
        occupied_count,
        total_units,
        occupancy_rate: occupancy_rate(occupied_count, total_units),
    }
}

/// 汇总多个楼层。
pub fn summarize_property(floors: &[FloorDisplayState]) -> PropertyOccupancy {
    let occupied_count = floors.iter().map(|floor| floor.occupied_count).sum();
    let total_units = floors.iter().map(|floor| floor.total_units).sum();
    PropertyOccupancy {
        floors: floors.len(),
        occupied_count,
        total_units,
        occupancy_rate: occupancy_rate(occupied_count, total_units),
    }
}
