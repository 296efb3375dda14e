//! 应用运行配置加载。

use std::env;

/// 网格单边格子数上限，与布局核心一致。
pub const MAX_GRID_DIM: u32 = 256;
/// 格子像素边长上限。
pub const MAX_CELL_SIZE_PX: u32 = 1024;

/// 配置加载错误。
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required env: {0}")]
    Missing(String),
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// 存储后端。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    /// 内存存储（本地演示，进程退出即丢失）。
    Memory,
}

/// 应用运行配置。
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http_addr: String,
    pub storage: StorageBackend,
    /// `storage = Postgres` 时必填。
    pub database_url: Option<String>,
    /// 未配置时草稿保存在进程内存中。
    pub redis_url: Option<String>,
    pub draft_ttl_seconds: u64,
    pub jwt_secret: String,
    pub jwt_access_ttl_seconds: u64,
    pub grid_rows: u32,
    pub grid_cols: u32,
    pub cell_size_px: u32,
    pub require_units_on_save: bool,
}

impl AppConfig {
    /// 从环境变量读取配置。
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(|key| env::var(key).ok())
    }

    /// 从任意键值来源读取配置（测试用）。
    pub fn from_source<F>(source: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let reader = Reader { source };
        let storage = match reader.optional("PMS_STORAGE") {
            None => StorageBackend::Postgres,
            Some(value) => match value.to_ascii_lowercase().as_str() {
                "postgres" => StorageBackend::Postgres,
                "memory" => StorageBackend::Memory,
                _ => return Err(ConfigError::Invalid("PMS_STORAGE".to_string(), value)),
            },
        };
        let database_url = reader.optional("PMS_DATABASE_URL");
        if storage == StorageBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::Missing("PMS_DATABASE_URL".to_string()));
        }
        let jwt_secret = reader.required("PMS_JWT_SECRET")?;
        let jwt_access_ttl_seconds = reader.read_u64("PMS_JWT_ACCESS_TTL_SECONDS")?;
        let http_addr = reader
            .optional("PMS_HTTP_ADDR")
            .unwrap_or_else(|| "127.0.0.1:8080".to_string());
        let redis_url = reader.optional("PMS_REDIS_URL");
        let draft_ttl_seconds = reader.read_u64_with_default("PMS_DRAFT_TTL_SECONDS", 3600)?;
        let grid_rows = reader.read_bounded_u32_with_default("PMS_GRID_ROWS", 8, MAX_GRID_DIM)?;
        let grid_cols = reader.read_bounded_u32_with_default("PMS_GRID_COLS", 8, MAX_GRID_DIM)?;
        let cell_size_px =
            reader.read_bounded_u32_with_default("PMS_CELL_SIZE_PX", 60, MAX_CELL_SIZE_PX)?;
        let require_units_on_save = reader.read_bool_with_default("PMS_REQUIRE_UNITS_ON_SAVE", true);

        Ok(Self {
            http_addr,
            storage,
            database_url,
            redis_url,
            draft_ttl_seconds,
            jwt_secret,
            jwt_access_ttl_seconds,
            grid_rows,
            grid_cols,
            cell_size_px,
            require_units_on_save,
        })
    }
}

struct Reader<F> {
    source: F,
}

impl<F> Reader<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn optional(&self, key: &str) -> Option<String> {
        (self.source)(key).filter(|value| !value.is_empty())
    }

    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::Missing(key.to_string()))
    }

    fn read_u64(&self, key: &str) -> Result<u64, ConfigError> {
        let value = self.required(key)?;
        value
            .parse::<u64>()
            .map_err(|_| ConfigError::Invalid(key.to_string(), value))
    }

    fn read_u64_with_default(&self, key: &str, default: u64) -> Result<u64, ConfigError> {
        let Some(value) = self.optional(key) else {
            return Ok(default);
        };
        value
            .parse::<u64>()
            .map_err(|_| ConfigError::Invalid(key.to_string(), value))
    }

    /// 网格尺寸与像素边长必须落在 `1..=max`。
    fn read_bounded_u32_with_default(
        &self,
        key: &str,
        default: u32,
        max: u32,
    ) -> Result<u32, ConfigError> {
        let Some(value) = self.optional(key) else {
            return Ok(default);
        };
        match value.parse::<u32>() {
            Ok(parsed) if (1..=max).contains(&parsed) => Ok(parsed),
            _ => Err(ConfigError::Invalid(key.to_string(), value)),
        }
    }

    fn read_bool_with_default(&self, key: &str, default: bool) -> bool {
        match self.optional(key) {
            Some(value) => matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "on"),
            None => default,
        }
    }
}
