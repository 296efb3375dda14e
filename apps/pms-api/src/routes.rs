//! 路由定义
//!
//! 集中管理所有 API 路由，将路径映射到对应的 handlers。
//! 路由包括：
//! - 健康检查：/health, /livez, /readyz
//! - 认证：/login
//! - 物业：/properties/*
//! - 楼层布局与单元：/properties/{id}/floors/*
//! - 编辑会话：/properties/{id}/floors/{floor_no}/draft/*
//! - 入住叠加展示：/properties/{id}/display, …/floors/{floor_no}/display
//! - 入住记录：/properties/{id}/occupancies/*
//! - 计数器快照：/metrics

use super::AppState;
use super::handlers::*;
use crate::middleware::request_context;
use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;

/// 创建 API 路由
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/livez", get(livez))
        .route("/readyz", get(readyz))
        .route("/login", post(login))
        .route("/metrics", get(get_metrics))
        .route("/properties", get(list_properties).post(create_property))
        .route(
            "/properties/:property_id",
            get(get_property)
                .put(update_property)
                .delete(delete_property),
        )
        .route("/properties/:property_id/display", get(property_display))
        .route("/properties/:property_id/floors", get(list_floors))
        .route(
            "/properties/:property_id/floors/:floor_no",
            get(get_floor).put(put_floor).delete(delete_floor),
        )
        .route(
            "/properties/:property_id/floors/:floor_no/units/:svg_id",
            put(update_unit),
        )
        .route(
            "/properties/:property_id/floors/:floor_no/display",
            get(floor_display),
        )
        .route(
            "/properties/:property_id/floors/:floor_no/draft",
            post(open_draft).get(get_draft).delete(discard_draft),
        )
        .route(
            "/properties/:property_id/floors/:floor_no/draft/toggle",
            post(toggle_cell),
        )
        .route(
            "/properties/:property_id/floors/:floor_no/draft/add",
            post(add_cell),
        )
        .route(
            "/properties/:property_id/floors/:floor_no/draft/remove",
            post(remove_cell),
        )
        .route(
            "/properties/:property_id/floors/:floor_no/draft/clear",
            post(clear_cells),
        )
        .route(
            "/properties/:property_id/floors/:floor_no/draft/layout-type",
            put(set_layout_type),
        )
        .route(
            "/properties/:property_id/floors/:floor_no/draft/save",
            post(save_draft),
        )
        .route(
            "/properties/:property_id/occupancies",
            get(list_occupancies).post(create_occupancy),
        )
        .route(
            "/properties/:property_id/occupancies/:occupancy_id",
            axum::routing::delete(delete_occupancy),
        )
}

/// 组装完整应用：`/` 与 `/api` 双前缀、请求上下文与 HTTP 追踪
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(create_api_router())
        .nest("/api", create_api_router())
        .with_state(state)
        .layer(middleware::from_fn(request_context))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::build_app;
    use crate::test_support::memory_state;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    #[tokio::test]
    async fn responses_carry_request_ids() {
        let response = build_app(memory_state())
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let request_id = response.headers().get("x-request-id").expect("request id");
        assert!(!request_id.is_empty());
        assert!(response.headers().get("x-trace-id").is_some());
    }
}
