//! 用户内存存储实现
//!
//! 内置 admin 账户（用户名：admin，密码：admin123，明文存储，首次登录后升级为哈希）。

use crate::error::StorageError;
use crate::models::UserRecord;
use crate::traits::UserStore;
use domain::TenantContext;
use domain::permissions::{PERMISSION_CODES, ROLE_ADMIN};
use std::collections::HashMap;
use std::sync::RwLock;

/// 用户内存存储
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl InMemoryUserStore {
    pub fn new(users: Vec<UserRecord>) -> Self {
        let users = users
            .into_iter()
            .map(|user| (user.username.clone(), user))
            .collect();
        Self {
            users: RwLock::new(users),
        }
    }

    /// 创建包含默认 admin 用户的存储。
    pub fn with_default_admin() -> Self {
        Self::new(vec![UserRecord {
            tenant_id: "tenant-1".to_string(),
            user_id: "user-1".to_string(),
            username: "admin".to_string(),
            password: "admin123".to_string(),
            roles: vec![ROLE_ADMIN.to_string()],
            permissions: PERMISSION_CODES
                .iter()
                .map(|code| (*code).to_string())
                .collect(),
        }])
    }
}

#[async_trait::async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_username(
        &self,
        ctx: &TenantContext,
        username: &str,
    ) -> Result<Option<UserRecord>, StorageError> {
        let map = self
            .users
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(map
            .get(username)
            .filter(|user| ctx.tenant_id.is_empty() || user.tenant_id == ctx.tenant_id)
            .cloned())
    }

    async fn update_password_hash(
        &self,
        ctx: &TenantContext,
        user_id: &str,
        password_hash: &str,
    ) -> Result<bool, StorageError> {
        let mut map = self
            .users
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let user = map.values_mut().find(|user| {
            user.user_id == user_id && (ctx.tenant_id.is_empty() || user.tenant_id == ctx.tenant_id)
        });
        match user {
            Some(user) => {
                user.password = password_hash.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
