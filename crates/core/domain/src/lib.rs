pub mod permissions;
pub mod property;

pub use property::{
    OccupancyFact, PaymentFrequency, PaymentStatus, UnitRecord, UnitStatus, UnknownVariant,
    Utilities,
};

/// 租户上下文：所有模块共享的执行上下文。
#[derive(Debug, Clone)]
pub struct TenantContext {
    pub tenant_id: String,
    pub user_id: String,
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
    pub property_scope: Option<String>,
}

impl TenantContext {
    /// 构造显式身份与权限范围的租户上下文。
    pub fn new(
        tenant_id: impl Into<String>,
        user_id: impl Into<String>,
        roles: Vec<String>,
        permissions: Vec<String>,
        property_scope: Option<String>,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            user_id: user_id.into(),
            roles,
            permissions,
            property_scope,
        }
    }

    /// 是否持有指定权限码（admin 角色视为全部权限）。
    pub fn has_permission(&self, code: &str) -> bool {
        self.roles.iter().any(|role| role == permissions::ROLE_ADMIN)
            || self.permissions.iter().any(|item| item == code)
    }

    /// 复制上下文并绑定物业作用域。
    pub fn scoped_to(&self, property_id: &str) -> Self {
        let mut ctx = self.clone();
        ctx.property_scope = Some(property_id.to_string());
        ctx
    }
}

impl Default for TenantContext {
    /// 空上下文（仅用于测试或占位）。
    fn default() -> Self {
        Self {
            tenant_id: "".to_string(),
            user_id: "".to_string(),
            roles: Vec::new(),
            permissions: Vec::new(),
            property_scope: None,
        }
    }
}
