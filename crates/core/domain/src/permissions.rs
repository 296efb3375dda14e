//! 角色与权限码。

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_LANDLORD: &str = "landlord";
pub const ROLE_TENANT: &str = "tenant";
pub const ROLE_PARTNER: &str = "partner";

pub const PROPERTY_READ: &str = "PROPERTY.READ";
pub const PROPERTY_WRITE: &str = "PROPERTY.WRITE";
pub const LAYOUT_WRITE: &str = "LAYOUT.WRITE";
pub const OCCUPANCY_READ: &str = "OCCUPANCY.READ";
pub const OCCUPANCY_WRITE: &str = "OCCUPANCY.WRITE";
pub const SYSTEM_METRICS_READ: &str = "SYSTEM.METRICS.READ";

/// 全部权限码（内置 admin 账户使用）。
pub const PERMISSION_CODES: &[&str] = &[
    PROPERTY_READ,
    PROPERTY_WRITE,
    LAYOUT_WRITE,
    OCCUPANCY_READ,
    OCCUPANCY_WRITE,
    SYSTEM_METRICS_READ,
];

/// 房东默认权限：管理自有物业、布局与入住记录。
pub const LANDLORD_PERMISSIONS: &[&str] = &[
    PROPERTY_READ,
    PROPERTY_WRITE,
    LAYOUT_WRITE,
    OCCUPANCY_READ,
    OCCUPANCY_WRITE,
];
