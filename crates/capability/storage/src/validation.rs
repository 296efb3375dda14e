//! 验证辅助函数
//!
//! - ensure_tenant：验证租户 ID 非空
//! - ensure_property_scope：验证物业归属（租户 + 物业作用域）

use crate::error::StorageError;
use domain::TenantContext;

/// 验证租户 ID 非空
pub fn ensure_tenant(ctx: &TenantContext) -> Result<(), StorageError> {
    if ctx.tenant_id.is_empty() {
        return Err(StorageError::new("tenant_id required"));
    }
    Ok(())
}

/// 验证物业作用域
///
/// 上下文绑定了物业作用域时，只允许访问该物业。
pub fn ensure_property_scope(ctx: &TenantContext, property_id: &str) -> Result<(), StorageError> {
    ensure_tenant(ctx)?;
    if let Some(scope) = ctx.property_scope.as_deref() {
        if scope != property_id {
            return Err(StorageError::new("property scope mismatch"));
        }
    }
    Ok(())
}
