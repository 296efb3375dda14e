//! Postgres 用户存储实现
//!
//! - 租户为空时按用户名全局查找（登录入口）
//! - 角色与权限通过关联表读取

use crate::error::StorageError;
use crate::models::UserRecord;
use crate::traits::UserStore;
use domain::TenantContext;
use sqlx::{PgPool, Row};

pub struct PgUserStore {
    pub pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool = crate::connection::connect_pool(database_url).await?;
        Ok(Self { pool })
    }
}

#[async_trait::async_trait]
impl UserStore for PgUserStore {
    async fn find_by_username(
        &self,
        ctx: &TenantContext,
        username: &str,
    ) -> Result<Option<UserRecord>, StorageError> {
        let row = if ctx.tenant_id.is_empty() {
            sqlx::query(
                "select user_id, tenant_id, username, password_hash \
                 from users where username = $1",
            )
            .bind(username)
            .fetch_optional(&self.pool)
            .await?
        } else {
            sqlx::query(
                "select user_id, tenant_id, username, password_hash \
                 from users where username = $1 and tenant_id = $2",
            )
            .bind(username)
            .bind(&ctx.tenant_id)
            .fetch_optional(&self.pool)
            .await?
        };
        let Some(row) = row else {
            return Ok(None);
        };

        let user_id: String = row.try_get("user_id")?;
        let tenant_id: String = row.try_get("tenant_id")?;
        let roles: Vec<String> = sqlx::query_scalar(
            "select role_code from tenant_user_roles where tenant_id = $1 and user_id = $2",
        )
        .bind(&tenant_id)
        .bind(&user_id)
        .fetch_all(&self.pool)
        .await?;
        let permissions: Vec<String> = sqlx::query_scalar(
            "select distinct permission_code \
             from tenant_role_permissions rp \
             join tenant_user_roles ur \
               on ur.tenant_id = rp.tenant_id and ur.role_code = rp.role_code \
             where ur.tenant_id = $1 and ur.user_id = $2",
        )
        .bind(&tenant_id)
        .bind(&user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(UserRecord {
            username: row.try_get("username")?,
            password: row.try_get("password_hash")?,
            tenant_id,
            user_id,
            roles,
            permissions,
        }))
    }

    async fn update_password_hash(
        &self,
        ctx: &TenantContext,
        user_id: &str,
        password_hash: &str,
    ) -> Result<bool, StorageError> {
        let result = if ctx.tenant_id.is_empty() {
            sqlx::query("update users set password_hash = $2 where user_id = $1")
                .bind(user_id)
                .bind(password_hash)
                .execute(&self.pool)
                .await?
        } else {
            sqlx::query(
                "update users set password_hash = $3 where tenant_id = $1 and user_id = $2",
            )
            .bind(&ctx.tenant_id)
            .bind(user_id)
            .bind(password_hash)
            .execute(&self.pool)
            .await?
        };
        Ok(result.rows_affected() > 0)
    }
}
