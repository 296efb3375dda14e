//! 物业领域值类型：单元记录、入住事实及其枚举。

use std::fmt;
use std::str::FromStr;

/// 字符串无法解析为枚举值。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub field: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {}: {}", self.field, self.value)
    }
}

impl std::error::Error for UnknownVariant {}

macro_rules! string_enum {
    ($name:ident, $field:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value.trim().to_ascii_lowercase().as_str() {
                    $($text => Ok(Self::$variant),)+
                    _ => Err(UnknownVariant {
                        field: $field,
                        value: value.to_string(),
                    }),
                }
            }
        }
    };
}

/// 单元状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UnitStatus {
    #[default]
    Vacant,
    Occupied,
    Maintenance,
    Reserved,
}

string_enum!(UnitStatus, "status", {
    Vacant => "vacant",
    Occupied => "occupied",
    Maintenance => "maintenance",
    Reserved => "reserved",
});

/// 租金缴纳周期。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PaymentFrequency {
    #[default]
    Monthly,
    Quarterly,
    SemiAnnually,
    Annually,
}

string_enum!(PaymentFrequency, "payment_frequency", {
    Monthly => "monthly",
    Quarterly => "quarterly",
    SemiAnnually => "semi_annually",
    Annually => "annually",
});

/// 入住事实上的缴费状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentStatus {
    Paid,
    Due,
    Overdue,
}

string_enum!(PaymentStatus, "payment_status", {
    Paid => "paid",
    Due => "due",
    Overdue => "overdue",
});

/// 单元配套（固定的具名开关集合）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Utilities {
    pub electricity: bool,
    pub water: bool,
    pub wifi: bool,
}

impl Utilities {
    /// 已启用的配套名称，顺序固定。
    pub fn enabled(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.electricity {
            names.push("electricity");
        }
        if self.water {
            names.push("water");
        }
        if self.wifi {
            names.push("wifi");
        }
        names
    }
}

/// 由选中网格格子生成的可出租单元。
#[derive(Debug, Clone, PartialEq)]
pub struct UnitRecord {
    /// 来源格子索引，楼层内唯一。
    pub svg_id: u32,
    /// 持久化的矩形图元。
    pub svg_geom: String,
    pub unit_name: String,
    /// 楼层号（0 起）。
    pub floor_number: u32,
    pub area_sqm: f64,
    pub bedrooms: u32,
    pub status: UnitStatus,
    pub rent_amount: f64,
    pub payment_frequency: PaymentFrequency,
    pub utilities: Utilities,
}

/// 租户与单元的关联（由入住/缴费子系统提供，只读）。
#[derive(Debug, Clone, PartialEq)]
pub struct OccupancyFact {
    pub occupancy_id: String,
    /// 对应单元的 svg_id。
    pub unit_id: Option<u32>,
    pub unit_name: Option<String>,
    pub floor_number: Option<u32>,
    pub tenant_ref: String,
    pub rent_amount: f64,
    pub payment_status: Option<PaymentStatus>,
}
