//! 物业楼层布局 HTTP API。
//!
//! 启动顺序：加载 .env → 读取配置 → 初始化日志 → 按存储后端构建 store →
//! 组装编辑服务与展示服务 → 挂载路由（`/` 与 `/api` 两种前缀）。

mod handlers;
mod middleware;
mod routes;
mod utils;

#[cfg(test)]
mod test_support;

use pms_auth::{AuthService, JwtManager};
use pms_config::{AppConfig, ConfigError, StorageBackend};
use pms_editor::{EditorConfig, FloorDisplayService, LayoutEditor};
use pms_storage::{
    DraftStore, FloorLayoutStore, InMemoryDraftStore, InMemoryFloorLayoutStore,
    InMemoryOccupancyStore, InMemoryPropertyStore, InMemoryUserStore, OccupancyStore,
    PgFloorLayoutStore, PgOccupancyStore, PgPropertyStore, PgUserStore, PropertyStore,
    RedisDraftStore, UserStore, connect_pool,
};
use pms_telemetry::init_tracing;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::info;

/// 请求处理所需的服务端设置。
#[derive(Debug, Clone, Copy)]
pub struct ApiSettings {
    /// 新建物业未指定网格时的默认尺寸。
    pub grid_rows: u32,
    pub grid_cols: u32,
    /// 是否拒绝保存没有单元的楼层。
    pub require_units_on_save: bool,
}

/// 应用共享状态。
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub db_pool: Option<PgPool>,
    pub property_store: Arc<dyn PropertyStore>,
    pub occupancy_store: Arc<dyn OccupancyStore>,
    pub editor: Arc<LayoutEditor>,
    pub display: Arc<FloorDisplayService>,
    pub settings: ApiSettings,
}

/// 后端无关的一组存储实现。
pub struct Stores {
    pub db_pool: Option<PgPool>,
    pub users: Arc<dyn UserStore>,
    pub properties: Arc<dyn PropertyStore>,
    pub floors: Arc<dyn FloorLayoutStore>,
    pub occupancies: Arc<dyn OccupancyStore>,
    pub drafts: Arc<dyn DraftStore>,
}

impl AppState {
    pub fn from_stores(stores: Stores, jwt: JwtManager, cell_size_px: u32, settings: ApiSettings) -> Self {
        let editor = LayoutEditor::new(
            stores.properties.clone(),
            stores.floors.clone(),
            stores.drafts,
            EditorConfig { cell_size_px },
        );
        let display = FloorDisplayService::new(
            stores.properties.clone(),
            stores.floors,
            stores.occupancies.clone(),
        );
        Self {
            auth: Arc::new(AuthService::new(stores.users, jwt)),
            db_pool: stores.db_pool,
            property_store: stores.properties,
            occupancy_store: stores.occupancies,
            editor: Arc::new(editor),
            display: Arc::new(display),
            settings,
        }
    }
}

async fn build_stores(config: &AppConfig) -> Result<Stores, Box<dyn std::error::Error>> {
    let drafts: Arc<dyn DraftStore> = match config.redis_url.as_deref() {
        Some(url) => Arc::new(RedisDraftStore::connect(url, config.draft_ttl_seconds)?),
        None => Arc::new(InMemoryDraftStore::new()),
    };
    let stores = match config.storage {
        StorageBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .ok_or_else(|| ConfigError::Missing("PMS_DATABASE_URL".to_string()))?;
            // 需先执行 migrations
            let pool = connect_pool(url).await?;
            Stores {
                db_pool: Some(pool.clone()),
                users: Arc::new(PgUserStore::new(pool.clone())),
                properties: Arc::new(PgPropertyStore::new(pool.clone())),
                floors: Arc::new(PgFloorLayoutStore::new(pool.clone())),
                occupancies: Arc::new(PgOccupancyStore::new(pool)),
                drafts,
            }
        }
        StorageBackend::Memory => Stores {
            db_pool: None,
            users: Arc::new(InMemoryUserStore::with_default_admin()),
            properties: Arc::new(InMemoryPropertyStore::with_default_property()),
            floors: Arc::new(InMemoryFloorLayoutStore::new()),
            occupancies: Arc::new(InMemoryOccupancyStore::new()),
            drafts,
        },
    };
    Ok(stores)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在）
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    init_tracing();

    let stores = build_stores(&config).await?;
    let jwt = JwtManager::new(config.jwt_secret.clone(), config.jwt_access_ttl_seconds);
    let settings = ApiSettings {
        grid_rows: config.grid_rows,
        grid_cols: config.grid_cols,
        require_units_on_save: config.require_units_on_save,
    };
    let state = AppState::from_stores(stores, jwt, config.cell_size_px, settings);
    let app = routes::build_app(state);

    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    info!(
        target: "pms.api",
        addr = %config.http_addr,
        storage = ?config.storage,
        redis_drafts = config.redis_url.is_some(),
        "listening"
    );
    axum::serve(listener, app).await?;
    Ok(())
}
